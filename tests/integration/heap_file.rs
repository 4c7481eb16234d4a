#![allow(missing_docs)]

use fileorg::{
    storage::{HeapFile, SlotAddress},
    Key, Record, Result,
};

fn product(id: i64) -> Record {
    Record::new(id, "Fruits and Vegetables", 182.095)
        .with_weight(Some(19.2))
        .with_outlet_id("OUT010")
}

#[test]
fn select_returns_record_just_inserted() -> Result<()> {
    let mut heap = HeapFile::new(4096);
    for id in 0..200 {
        let record = product(id);
        heap.insert(record.clone())?;
        assert_eq!(heap.select(record.key()), Some(&record));
    }
    assert!(heap.block_count() > 1, "200 records overflow one 4096 block");
    Ok(())
}

#[test]
fn deleted_slot_is_reused_without_new_block() -> Result<()> {
    let mut heap = HeapFile::new(4096);
    for id in 100..300 {
        heap.insert(product(id))?;
    }
    let blocks_before = heap.block_count();
    let freed = heap.locate(&Key::Int(150)).expect("record 150 is stored");

    assert!(heap.delete(&Key::Int(150)));
    assert!(heap.select(&Key::Int(150)).is_none());
    assert!(!heap.delete(&Key::Int(150)), "second delete misses");

    let landed = heap.insert(product(999))?;
    assert_eq!(landed, freed);
    assert_eq!(heap.block_count(), blocks_before);
    assert_eq!(heap.select(&Key::Int(999)).map(Record::key), Some(&Key::Int(999)));
    Ok(())
}

#[test]
fn uniform_records_never_exceed_budget() -> Result<()> {
    let mut heap = HeapFile::new(512);
    for id in 100..600 {
        heap.insert(Record::new(id, "Canned", 12.5))?;
        if id % 7 == 0 {
            heap.delete(&Key::Int(id - 50));
        }
        for block in heap.blocks() {
            assert!(block.used() <= block.capacity());
        }
    }
    Ok(())
}

#[test]
fn freed_slot_is_taken_before_any_new_block() -> Result<()> {
    let base = product(10);
    let mut heap = HeapFile::new(base.size_hint() * 2);
    heap.insert(base)?;
    heap.insert(product(11))?;
    assert!(heap.delete(&Key::Int(10)));

    let wider = Record::new(12, "Fruits and Vegetables, Frozen", 182.095);
    let landed = heap.insert(wider)?;
    assert_eq!(landed, SlotAddress { block: 0, slot: 0 });
    assert_eq!(heap.block_count(), 1);
    assert!(heap.select(&Key::Int(12)).is_some());
    Ok(())
}

#[test]
fn block_count_never_shrinks() -> Result<()> {
    let mut heap = HeapFile::new(300);
    for id in 0..60 {
        heap.insert(product(id))?;
    }
    let peak = heap.block_count();
    for id in 0..60 {
        assert!(heap.delete(&Key::Int(id)));
    }
    assert_eq!(heap.block_count(), peak);
    assert_eq!(heap.live_records(), 0);
    assert_eq!(heap.free_slots().count(), 60);
    assert_eq!(
        heap.free_slots().next(),
        Some(&SlotAddress { block: 0, slot: 0 })
    );
    Ok(())
}

#[test]
fn three_records_fit_one_block() -> Result<()> {
    let mut heap = HeapFile::new(4096);
    let ids = [1, 2, 3];
    for id in ids {
        heap.insert(product(id))?;
    }
    for id in ids {
        assert!(heap.select(&Key::Int(id)).is_some());
    }
    for id in ids {
        assert!(heap.delete(&Key::Int(id)));
    }
    assert_eq!(heap.block_count(), 1);
    Ok(())
}

#[test]
fn text_keys_are_found() -> Result<()> {
    let mut heap = HeapFile::new(4096);
    heap.insert(Record::new("FDA15", "Dairy", 249.8092))?;
    heap.insert(Record::new("DRC01", "Soft Drinks", 48.2692))?;
    assert_eq!(
        heap.select(&Key::from("DRC01")).map(Record::product_type),
        Some("Soft Drinks")
    );
    assert!(heap.select(&Key::from("FDA16")).is_none());
    Ok(())
}
