//! Record-count operations: a cheap O(1) estimate and an exact O(n) scan.

use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::location::Location;
use crate::slot::slot_get_status;
use crate::status::SlotStatus;

/// `((write.sector - read.sector) mod sector_count) * slots_per_sector +
/// write.slot - read.slot`.
///
/// Counts VALID + GARBAGE + RESERVED slots within `[read, write)`; O(1).
/// May overestimate when garbage is present.
pub fn count_estimate(cfg: &PartitionConfig, slots_per_sector: u32, read: Location, write: Location) -> u32 {
    read.distance_slots(write, cfg, slots_per_sector) as u32
}

/// Iterate `[read, write)` counting only VALID slots; O(n).
pub fn count_exact<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    read: Location,
    write: Location,
) -> Result<u32, RingFsError<F::Error>> {
    let mut count = 0u32;
    let mut loc = read;
    while loc != write {
        if slot_get_status(flash, cfg, object_size, loc)? == SlotStatus::Valid {
            count += 1;
        }
        loc = loc.advance_slot(cfg, slots_per_sector);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PartitionConfig {
        PartitionConfig {
            sector_size: 128,
            sector_offset: 0,
            sector_count: 4,
            schema_version: 1,
        }
    }

    #[test]
    fn estimate_matches_slot_span() {
        let cfg = cfg();
        let read = Location::new(0, 0);
        let write = Location::new(1, 5);
        assert_eq!(count_estimate(&cfg, 15, read, write), 15 + 5);
    }

    #[test]
    fn estimate_is_zero_when_empty() {
        let cfg = cfg();
        let loc = Location::new(2, 3);
        assert_eq!(count_estimate(&cfg, 15, loc, loc), 0);
    }
}
