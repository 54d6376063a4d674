//! Round-trip and capacity behavior over a small partition (128-byte
//! sectors, 4 sectors, 4-byte objects -> 15 slots/sector, capacity 45).

use ringfs::{PartitionConfig, RingFs};
use ringfs_sim::MemFlash;

const CFG: PartitionConfig = PartitionConfig {
    sector_size: 128,
    sector_offset: 0,
    sector_count: 4,
    schema_version: 1,
};

fn fresh() -> RingFs<MemFlash, 4> {
    let flash = MemFlash::new(CFG.sector_size, CFG.sector_count);
    let mut fs: RingFs<_, 4> = RingFs::new(flash, CFG);
    fs.format().unwrap();
    fs
}

#[test]
fn fresh_format_is_empty() {
    let mut fs = fresh();
    assert_eq!(fs.capacity(), 45);
    assert_eq!(fs.count_estimate(), 0);
    assert_eq!(fs.count_exact().unwrap(), 0);
    let mut out = [0u8; 4];
    assert!(!fs.fetch(&mut out).unwrap());
}

#[test]
fn append_then_fetch_round_trips_in_order() {
    let mut fs = fresh();
    for i in 0u32..10 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    assert_eq!(fs.count_estimate(), 10);

    for i in 0u32..10 {
        let mut out = [0u8; 4];
        assert!(fs.fetch(&mut out).unwrap());
        assert_eq!(u32::from_le_bytes(out), i);
    }
    let mut out = [0u8; 4];
    assert!(!fs.fetch(&mut out).unwrap());
}

#[test]
fn discard_after_fetch_shrinks_the_live_range() {
    let mut fs = fresh();
    for i in 0u32..5 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    let mut out = [0u8; 4];
    for _ in 0..3 {
        assert!(fs.fetch(&mut out).unwrap());
    }
    fs.discard().unwrap();
    assert_eq!(fs.count_estimate(), 2);
    assert_eq!(fs.count_exact().unwrap(), 2);
}

#[test]
fn rewind_re_reads_undiscarded_records() {
    let mut fs = fresh();
    for i in 0u32..3 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    let mut out = [0u8; 4];
    assert!(fs.fetch(&mut out).unwrap());
    assert_eq!(u32::from_le_bytes(out), 0);
    assert!(fs.fetch(&mut out).unwrap());
    assert_eq!(u32::from_le_bytes(out), 1);

    fs.rewind();

    assert!(fs.fetch(&mut out).unwrap());
    assert_eq!(u32::from_le_bytes(out), 0);
}

#[test]
fn discard_one_advances_read_by_exactly_one() {
    let mut fs = fresh();
    for i in 0u32..3 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    fs.discard_one().unwrap();
    assert_eq!(fs.count_estimate(), 2);
    let mut out = [0u8; 4];
    assert!(fs.fetch(&mut out).unwrap());
    assert_eq!(u32::from_le_bytes(out), 1);
}

#[test]
fn appending_past_capacity_reclaims_the_oldest_sector() {
    let mut fs = fresh();
    // Fill well past the nominal capacity of 45 records; this forces
    // several sector reclamations.
    for i in 0u32..120 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    // The oldest records were overwritten; count_estimate must never
    // exceed the partition's usable capacity.
    assert!(fs.count_estimate() <= fs.capacity());

    // Whatever remains readable must be a contiguous suffix of the
    // original sequence, oldest-first.
    let mut out = [0u8; 4];
    let mut last = None;
    let mut read_count = 0;
    while fs.fetch(&mut out).unwrap() {
        let value = u32::from_le_bytes(out);
        if let Some(prev) = last {
            assert_eq!(value, prev + 1, "records must be consumed in FIFO order");
        }
        last = Some(value);
        read_count += 1;
    }
    assert!(read_count > 0);
    assert_eq!(last, Some(119));
}

#[test]
fn stats_reports_sector_and_count_summary() {
    let mut fs = fresh();
    for i in 0u32..5 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    let stats = fs.stats().unwrap();
    assert_eq!(stats.capacity, 45);
    assert_eq!(stats.count_estimate, 5);
    assert_eq!(stats.schema_version, 1);
    assert_eq!(stats.sectors_free + stats.sectors_in_use, 4);
}

#[test]
fn scan_after_reopen_reconstructs_the_same_positions() {
    let mut fs = fresh();
    for i in 0u32..20 {
        fs.append(&i.to_le_bytes()).unwrap();
    }
    let mut out = [0u8; 4];
    for _ in 0..7 {
        fs.fetch(&mut out).unwrap();
    }
    fs.discard().unwrap();
    let before = fs.positions();

    let bytes = fs.into_flash().into_bytes();
    let flash = MemFlash::from_bytes(CFG.sector_size, CFG.sector_count, bytes);
    let mut reopened: RingFs<_, 4> = RingFs::new(flash, CFG);
    reopened.scan().unwrap();

    assert_eq!(reopened.positions(), before);
}
