#![allow(missing_docs)]

use fileorg::{
    storage::{OrderedFile, OrderedPlacement, Placement},
    Key, Record, Result,
};

fn product(id: i64) -> Record {
    Record::new(id, "Baking Goods", 55.7956)
}

fn assert_sorted_and_packed(file: &OrderedFile) {
    assert_eq!(file.extension_len(), 0);
    for block in file.blocks() {
        let keys: Vec<&Key> = block.records().map(Record::key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "block keys ordered");
        assert!(block.used() <= block.capacity(), "block within budget");
    }
    for pair in file.blocks().windows(2) {
        if let (Some(last), Some(first)) = (pair[0].last_key(), pair[1].first_key()) {
            assert!(last <= first, "blocks ordered: {last} > {first}");
        }
    }
}

#[test]
fn merge_yields_fully_sorted_sequence() -> Result<()> {
    let mut file = OrderedFile::new(4096);
    for id in [50, 10, 30, 70, 20] {
        file.insert(product(id));
    }
    file.merge_extension()?;
    assert_eq!(
        file.keys(),
        [10, 20, 30, 50, 70].map(Key::Int).to_vec()
    );
    assert_sorted_and_packed(&file);
    Ok(())
}

#[test]
fn repeated_merges_keep_invariants() -> Result<()> {
    let mut file = OrderedFile::new(256);
    let mut id = 7_i64;
    for round in 0..5 {
        for _ in 0..40 {
            id = (id * 31 + 17) % 1_009;
            file.insert(product(id));
        }
        let stats = file.merge_extension()?;
        assert_eq!(stats.records, 40 * (round + 1));
        assert_sorted_and_packed(&file);
    }
    Ok(())
}

#[test]
fn last_key_rule_only_consults_block_tail() -> Result<()> {
    let size = product(10).size_hint();
    let mut file = OrderedFile::new(size * 3);
    for id in [10, 20, 30, 40, 50, 60] {
        file.insert(product(id));
    }
    file.merge_extension()?;
    assert_eq!(file.block_count(), 2);

    // 45 is below block 1's tail (60), so it joins block 1 even though it is full.
    assert_eq!(file.insert(product(45)), Placement::Block(1));
    assert_eq!(file.blocks()[1].live_count(), 4);
    // Anything at or above the global maximum waits in the extension.
    assert_eq!(file.insert(product(60)), Placement::Extension);
    assert_eq!(file.insert(product(75)), Placement::Extension);
    assert_eq!(file.extension_len(), 2);
    assert!(file.select(&Key::Int(75)).is_some());

    let stats = file.merge_extension()?;
    assert_eq!(stats.merged, 2);
    assert_eq!(stats.records, 9);
    assert_eq!(stats.blocks, 3);
    assert_sorted_and_packed(&file);
    Ok(())
}

#[test]
fn sorted_rule_never_overfills() -> Result<()> {
    let size = product(10).size_hint();
    let mut file = OrderedFile::with_placement(size * 3, OrderedPlacement::Sorted);
    for id in [10, 20, 30, 40, 50, 60] {
        file.insert(product(id));
    }
    file.merge_extension()?;

    assert_eq!(file.insert(product(45)), Placement::Extension);
    assert!(file
        .blocks()
        .iter()
        .all(|block| block.used() <= block.capacity()));
    assert!(file.select(&Key::Int(45)).is_some());
    Ok(())
}

#[test]
fn duplicate_keys_survive_merge() -> Result<()> {
    let mut file = OrderedFile::new(4096);
    file.insert(Record::new(5, "Dairy", 1.0));
    file.insert(Record::new(5, "Meat", 2.0));
    file.merge_extension()?;
    let types: Vec<&str> = file.blocks()[0].records().map(Record::product_type).collect();
    assert_eq!(types, vec!["Dairy", "Meat"]);
    Ok(())
}
