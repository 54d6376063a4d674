//! The `RingFs` instance: wires the individual protocol modules together
//! into the crate's public API.

use crate::append::{self, Positions};
use crate::config::PartitionConfig;
use crate::count;
use crate::error::RingFsError;
use crate::fetch;
use crate::flash::Flash;
use crate::format;
use crate::location::Location;
use crate::scan;
use crate::sector::sector_header;
use crate::status::SectorStatus;

/// A mounted (or not-yet-mounted) ring log over one flash partition.
///
/// `OBJECT_SIZE` is the fixed record size in bytes, const-generic so the
/// caller can never pass a mis-sized payload without a compile error at
/// the call site (the runtime `assert!`s below only catch slice-based
/// entry points such as [`RingFs::append`]).
pub struct RingFs<F: Flash, const OBJECT_SIZE: usize> {
    flash: F,
    cfg: PartitionConfig,
    slots_per_sector: u32,
    positions: Positions,
    mounted: bool,
}

/// A read-only snapshot of instance and on-flash state, for diagnostics
/// and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingFsStats {
    pub sectors_free: u32,
    pub sectors_in_use: u32,
    pub count_estimate: u32,
    pub capacity: u32,
    pub schema_version: u32,
}

impl<F: Flash, const OBJECT_SIZE: usize> RingFs<F, OBJECT_SIZE> {
    /// Create an instance over `flash` described by `cfg`. Does not touch
    /// flash; call [`Self::scan`] or [`Self::format`] before using it.
    ///
    /// # Panics
    ///
    /// Panics if `cfg` and `OBJECT_SIZE` together cannot describe a valid
    /// partition (see [`PartitionConfig::validate`]).
    pub fn new(flash: F, cfg: PartitionConfig) -> Self {
        cfg.validate(OBJECT_SIZE as u32);
        let slots_per_sector = cfg.slots_per_sector(OBJECT_SIZE as u32);
        Self {
            flash,
            cfg,
            slots_per_sector,
            positions: Positions {
                read: Location::default(),
                write: Location::default(),
                cursor: Location::default(),
            },
            mounted: false,
        }
    }

    /// Consume and return the underlying flash adapter.
    pub fn into_flash(self) -> F {
        self.flash
    }

    /// Two-phase global wipe into a valid empty ring.
    pub fn format(&mut self) -> Result<(), RingFsError<F::Error>> {
        format::format(&mut self.flash, &self.cfg)?;
        self.positions = Positions {
            read: Location::default(),
            write: Location::default(),
            cursor: Location::default(),
        };
        self.mounted = true;
        Ok(())
    }

    /// Rebuild `read`/`write`/`cursor` from on-flash state alone.
    pub fn scan(&mut self) -> Result<(), RingFsError<F::Error>> {
        let result = scan::scan(&mut self.flash, &self.cfg, OBJECT_SIZE as u32, self.slots_per_sector)?;
        self.positions = Positions {
            read: result.read,
            write: result.write,
            cursor: result.cursor,
        };
        self.mounted = true;
        Ok(())
    }

    /// Append one `OBJECT_SIZE`-byte record.
    ///
    /// # Panics
    ///
    /// Panics if `payload.len() != OBJECT_SIZE`.
    pub fn append(&mut self, payload: &[u8]) -> Result<(), RingFsError<F::Error>> {
        assert_eq!(payload.len(), OBJECT_SIZE, "payload must be exactly OBJECT_SIZE bytes");
        append::append(
            &mut self.flash,
            &self.cfg,
            OBJECT_SIZE as u32,
            self.slots_per_sector,
            &mut self.positions,
            payload,
        )
    }

    /// Fetch the next record at `cursor`, advancing it.
    ///
    /// Returns `Ok(true)` and fills `out` if a record was available, or
    /// `Ok(false)` if the ring is empty (`cursor == write`). This is a
    /// normal result, not an error.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() != OBJECT_SIZE`.
    pub fn fetch(&mut self, out: &mut [u8]) -> Result<bool, RingFsError<F::Error>> {
        assert_eq!(out.len(), OBJECT_SIZE, "out must be exactly OBJECT_SIZE bytes");
        fetch::fetch(
            &mut self.flash,
            &self.cfg,
            OBJECT_SIZE as u32,
            self.slots_per_sector,
            &mut self.positions,
            out,
        )
    }

    /// Mark everything from `read` to `cursor` GARBAGE and advance `read`
    /// to `cursor`.
    pub fn discard(&mut self) -> Result<(), RingFsError<F::Error>> {
        fetch::discard(
            &mut self.flash,
            &self.cfg,
            OBJECT_SIZE as u32,
            self.slots_per_sector,
            &mut self.positions,
        )
    }

    /// Mark only the slot at `read` GARBAGE and advance by one,
    /// unconditionally.
    pub fn discard_one(&mut self) -> Result<(), RingFsError<F::Error>> {
        fetch::discard_one(
            &mut self.flash,
            &self.cfg,
            OBJECT_SIZE as u32,
            self.slots_per_sector,
            &mut self.positions,
        )
    }

    /// `cursor <- read`: re-reads from the oldest undiscarded record.
    pub fn rewind(&mut self) {
        fetch::rewind(&mut self.positions);
    }

    /// Externally-scheduled sector reclaim: a hint, not a requirement —
    /// `append` performs the same work inline if needed.
    pub fn erase_sector(&mut self, sector: u32) -> Result<(), RingFsError<F::Error>> {
        crate::sector::sector_free(&mut self.flash, &self.cfg, sector)
    }

    /// Usable capacity in records. One sector is always held FREE as the
    /// rotation buffer, so only `sector_count - 1` sectors ever hold data.
    pub const fn capacity(&self) -> u32 {
        self.cfg.capacity(OBJECT_SIZE as u32)
    }

    /// O(1) estimate of the record count in `[read, write)`.
    pub fn count_estimate(&self) -> u32 {
        count::count_estimate(&self.cfg, self.slots_per_sector, self.positions.read, self.positions.write)
    }

    /// O(n) exact count of VALID slots in `[read, write)`.
    pub fn count_exact(&mut self) -> Result<u32, RingFsError<F::Error>> {
        count::count_exact(
            &mut self.flash,
            &self.cfg,
            OBJECT_SIZE as u32,
            self.slots_per_sector,
            self.positions.read,
            self.positions.write,
        )
    }

    /// Read-only snapshot of instance and on-flash state.
    pub fn stats(&mut self) -> Result<RingFsStats, RingFsError<F::Error>> {
        let mut sectors_free = 0;
        let mut sectors_in_use = 0;
        for sector in 0..self.cfg.sector_count {
            let (status, _) = sector_header(&mut self.flash, &self.cfg, sector)?;
            match status {
                SectorStatus::Free => sectors_free += 1,
                SectorStatus::InUse => sectors_in_use += 1,
                _ => {}
            }
        }
        Ok(RingFsStats {
            sectors_free,
            sectors_in_use,
            count_estimate: self.count_estimate(),
            capacity: self.capacity(),
            schema_version: self.cfg.schema_version,
        })
    }

    /// Whether this instance has been mounted via [`Self::scan`] or
    /// [`Self::format`] since construction.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current read/write/cursor positions, mostly useful for tests and
    /// the CLI's `dump` subcommand.
    pub fn positions(&self) -> (Location, Location, Location) {
        (self.positions.read, self.positions.write, self.positions.cursor)
    }

    /// Borrow the underlying flash adapter (for the CLI's `dump`
    /// subcommand, which reads raw sector/slot headers directly).
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// The partition's geometry.
    pub fn config(&self) -> &PartitionConfig {
        &self.cfg
    }

    /// Slots per sector, derived from `OBJECT_SIZE` and `cfg`.
    pub const fn slots_per_sector(&self) -> u32 {
        self.slots_per_sector
    }
}
