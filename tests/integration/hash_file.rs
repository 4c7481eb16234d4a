#![allow(missing_docs)]

use fileorg::{
    storage::{HashFile, HashOverflow, HashPlacement},
    Key, Record, Result,
};

fn product(id: impl Into<Key>) -> Record {
    Record::new(id, "Snack Foods", 141.618)
}

#[test]
fn integer_keys_land_in_modulo_bucket() -> Result<()> {
    let mut file = HashFile::new(1_000, 7)?;
    for id in 0..100_i64 {
        assert_eq!(file.insert(product(id)), HashPlacement::Home((id % 7) as usize));
    }
    for idx in 0..7 {
        let bucket = file.bucket(idx).unwrap_or_default();
        assert!(bucket
            .iter()
            .all(|r| r.key().as_int().map(|k| k % 7) == Some(idx as i64)));
    }
    assert_eq!(file.bucket_count(), 7);
    Ok(())
}

#[test]
fn hash_is_stable_across_instances() -> Result<()> {
    let a = HashFile::new(10, 13)?;
    let b = HashFile::with_overflow(3, 13, HashOverflow::Chain)?;
    for code in ["FDA15", "DRC01", "FDN15", "FDX07", "NCD19"] {
        let key = Key::from(code);
        assert_eq!(a.hash(&key), b.hash(&key));
        assert!(a.hash(&key) < 13);
    }
    Ok(())
}

#[test]
fn append_policy_grows_array_by_one_per_overflow() -> Result<()> {
    let mut file = HashFile::new(2, 10)?;
    for id in [4, 14] {
        assert_eq!(file.insert(product(id)), HashPlacement::Home(4));
    }
    assert_eq!(file.insert(product(24)), HashPlacement::Appended(10));
    assert_eq!(file.insert(product(34)), HashPlacement::Appended(11));
    assert_eq!(file.bucket_count(), 12);

    // hash(24) = 4 never reaches index 10 or 11.
    assert!(file.select(&Key::Int(24)).is_none());
    assert!(file.select(&Key::Int(34)).is_none());
    assert!(file.select(&Key::Int(14)).is_some());
    Ok(())
}

#[test]
fn appended_bucket_is_never_probed() -> Result<()> {
    // Home indices stay below num_buckets, so appended buckets sit past every home.
    let mut file = HashFile::new(1, 1)?;
    file.insert(product(0));
    assert_eq!(file.insert(product(5)), HashPlacement::Appended(1));
    assert_eq!(file.bucket(1).map(<[Record]>::len), Some(1));
    assert!(file.select(&Key::Int(5)).is_none());
    Ok(())
}

#[test]
fn chain_policy_keeps_every_record_reachable() -> Result<()> {
    let mut file = HashFile::with_overflow(2, 5, HashOverflow::Chain)?;
    for id in 0..40_i64 {
        file.insert(product(id));
    }
    for id in 0..40_i64 {
        assert!(file.select(&Key::Int(id)).is_some(), "key {id} reachable");
    }
    // 8 records per home bucket, 2 per bucket: 1 home + 3 chained each.
    assert_eq!(file.bucket_count(), 5 + 5 * 3);
    Ok(())
}

#[test]
fn text_keys_round_trip_through_buckets() -> Result<()> {
    let mut file = HashFile::new(10, 10)?;
    let codes = ["FDA15", "DRC01", "FDN15", "FDX07"];
    for code in codes {
        file.insert(product(code));
    }
    for code in codes {
        assert_eq!(
            file.select(&Key::from(code)).map(Record::key),
            Some(&Key::from(code))
        );
    }
    assert!(file.select(&Key::from("ZZZ99")).is_none());
    Ok(())
}
