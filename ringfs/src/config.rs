//! Partition geometry and the sizes derived from it.

/// Size in bytes of a sector header: `{u32 status, u32 version}`.
pub const SECTOR_HEADER_SIZE: u32 = 8;

/// Size in bytes of a slot header: `{u32 status}`.
pub const SLOT_HEADER_SIZE: u32 = 4;

/// Describes the flash partition a [`crate::RingFs`] instance manages.
///
/// Borrowed by the instance for its entire lifetime: the adapter is
/// referenced, never cloned or owned away from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Bytes per sector, including its trailing header.
    pub sector_size: u32,
    /// Index of the first sector of this partition on the underlying
    /// device (sectors, not bytes).
    pub sector_offset: u32,
    /// Number of sectors in the partition.
    pub sector_count: u32,
    /// User-chosen schema version, stamped into every sector's header on
    /// format and checked at mount.
    pub schema_version: u32,
}

impl PartitionConfig {
    /// Number of slots that fit in one sector, given `object_size`.
    ///
    /// `⌊(sector_size − sizeof(sector_header)) / (sizeof(slot_header) + object_size)⌋`
    pub const fn slots_per_sector(&self, object_size: u32) -> u32 {
        (self.sector_size - SECTOR_HEADER_SIZE) / (SLOT_HEADER_SIZE + object_size)
    }

    /// Usable capacity in records: one sector is always held FREE as the
    /// rotation buffer, so only `sector_count - 1` sectors ever hold data.
    pub const fn capacity(&self, object_size: u32) -> u32 {
        self.slots_per_sector(object_size) * (self.sector_count - 1)
    }

    /// Validate the configuration against `object_size`, panicking with a
    /// descriptive message on misconfiguration.
    ///
    /// Asserts geometry invariants at construction time rather than
    /// deferring them to a fallible `scan`/`format` call.
    pub fn validate(&self, object_size: u32) {
        assert!(
            self.sector_count >= 2,
            "sector_count must be at least 2 (one FREE rotation sector plus one IN_USE sector)"
        );
        assert!(
            self.sector_size > SECTOR_HEADER_SIZE,
            "sector_size must be larger than the sector header ({SECTOR_HEADER_SIZE} bytes)"
        );
        assert!(
            self.slots_per_sector(object_size) >= 1,
            "sector_size is too small to hold even one slot of size {object_size}"
        );
    }
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
    fn matches_spec_worked_example() {
        let cfg = cfg();
        assert_eq!(cfg.slots_per_sector(4), 15);
        assert_eq!(cfg.capacity(4), 45);
    }

    #[test]
    #[should_panic(expected = "sector_count must be at least 2")]
    fn rejects_single_sector_partitions() {
        let mut cfg = cfg();
        cfg.sector_count = 1;
        cfg.validate(4);
    }

    #[test]
    #[should_panic(expected = "too small to hold even one slot")]
    fn rejects_undersized_sectors() {
        let cfg = PartitionConfig {
            sector_size: 8,
            sector_offset: 0,
            sector_count: 4,
            schema_version: 1,
        };
        cfg.validate(4);
    }
}
