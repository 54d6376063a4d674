//! Mount-time scan.
//!
//! Rebuilds `read`/`write`/`cursor` from on-flash sector and slot state
//! alone, repairing partially-erased sectors (ERASED/ERASING) along the
//! way. Sectors are visited in index order with the *previous* sector's
//! resolved status seeded from the physical predecessor of sector 0 (i.e.
//! the last sector of the partition) so that an IN_USE run that wraps
//! across the sector-0/sector-(count-1) boundary is detected correctly —
//! that wrap is a normal, reachable state once the ring has rotated past
//! the end of the partition at least once.

use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::fmt::{debug, warn};
use crate::location::Location;
use crate::sector::{sector_free, sector_header};
use crate::slot::slot_get_status;
use crate::status::{SectorStatus, SlotStatus};

/// The positions a successful scan reconstructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    pub read: Location,
    pub write: Location,
    pub cursor: Location,
}

/// Resolve a single sector's status, repairing ERASED/ERASING in place by
/// completing the erase. Returns the status the sector should be treated
/// as for the remainder of the scan (always FREE or IN_USE).
fn resolve_sector<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    sector: u32,
) -> Result<SectorStatus, RingFsError<F::Error>> {
    let (status, version) = sector_header(flash, cfg, sector)?;
    match status {
        SectorStatus::Formatting => {
            warn!("sector {} still FORMATTING at mount", sector);
            Err(RingFsError::FormatInterrupted)
        }
        SectorStatus::Erased | SectorStatus::Erasing => {
            debug!("sector {} was left {:?} by a crash, repairing", sector, status);
            sector_free(flash, cfg, sector)?;
            Ok(SectorStatus::Free)
        }
        SectorStatus::Free => Ok(SectorStatus::Free),
        SectorStatus::InUse => {
            if version != cfg.schema_version {
                warn!(
                    "sector {} version {} != configured {}",
                    sector, version, cfg.schema_version
                );
                return Err(RingFsError::VersionMismatch);
            }
            Ok(SectorStatus::InUse)
        }
    }
}

fn find_write_in_sector<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    sector: u32,
) -> Result<Location, RingFsError<F::Error>> {
    let mut loc = Location::new(sector, 0);
    for _ in 0..slots_per_sector {
        if slot_get_status(flash, cfg, object_size, loc)? == SlotStatus::Erased {
            return Ok(loc);
        }
        loc = loc.advance_slot(cfg, slots_per_sector);
    }
    // Sector is completely full; write continues at slot 0 of the next
    // sector, which the append protocol guarantees is FREE.
    Ok(loc)
}

fn find_read<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    read_sector: u32,
    write: Location,
) -> Result<Location, RingFsError<F::Error>> {
    let mut loc = Location::new(read_sector, 0);
    let max_iters = cfg.sector_count * slots_per_sector;
    for _ in 0..max_iters {
        if loc == write {
            return Ok(loc);
        }
        if slot_get_status(flash, cfg, object_size, loc)? == SlotStatus::Valid {
            return Ok(loc);
        }
        loc = loc.advance_slot(cfg, slots_per_sector);
    }
    Ok(loc)
}

/// Run the mount scan, returning the reconstructed positions.
pub fn scan<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
) -> Result<ScanResult, RingFsError<F::Error>> {
    let sector_count = cfg.sector_count;

    // Seed `previous` with the real ring-order predecessor of sector 0 so
    // an IN_USE run that wraps across the partition boundary is not
    // mistaken for two separate runs.
    let mut previous = resolve_sector(flash, cfg, sector_count - 1)?;

    let mut free_seen = false;
    let mut used_seen = false;
    let mut read_sector: Option<u32> = None;
    let mut write_sector: Option<u32> = None;

    for sector in 0..sector_count {
        let current = resolve_sector(flash, cfg, sector)?;

        match current {
            SectorStatus::Free => free_seen = true,
            SectorStatus::InUse => used_seen = true,
            _ => unreachable!("resolve_sector only returns Free or InUse"),
        }

        if previous == SectorStatus::Free && current == SectorStatus::InUse {
            read_sector = Some(sector);
        }
        if previous == SectorStatus::InUse && current == SectorStatus::Free {
            write_sector = Some((sector + sector_count - 1) % sector_count);
        }

        previous = current;
    }

    if !free_seen {
        return Err(RingFsError::NoFreeSector);
    }

    let (read_sector, write_sector) = if !used_seen {
        (0, 0)
    } else {
        (read_sector.unwrap_or(0), write_sector.unwrap_or(0))
    };

    let write = find_write_in_sector(flash, cfg, object_size, slots_per_sector, write_sector)?;
    let read = find_read(flash, cfg, object_size, slots_per_sector, read_sector, write)?;

    debug!("scan complete: read={:?} write={:?}", read, write);

    Ok(ScanResult {
        read,
        write,
        cursor: read,
    })
}
