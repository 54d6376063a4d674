//! The append protocol — the crux of crash safety: a two-phase
//! RESERVED -> VALID slot commit wrapped in forward reclamation of the
//! next sector.

use crate::addr::slot_payload_address;
use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::fmt::trace;
use crate::location::Location;
use crate::sector::{sector_free, sector_header, sector_set_status};
use crate::slot::slot_set_status;
use crate::status::{SectorStatus, SlotStatus};

/// The three positions `append` may need to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positions {
    pub read: Location,
    pub write: Location,
    pub cursor: Location,
}

/// Append one record, advancing `write` (and, if reclamation was needed,
/// `read`/`cursor`) in place.
///
/// `payload` must be exactly `object_size` bytes; the caller (`RingFs`)
/// enforces this via a const generic, so it is only asserted here.
pub fn append<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    positions: &mut Positions,
    payload: &[u8],
) -> Result<(), RingFsError<F::Error>> {
    debug_assert_eq!(payload.len(), object_size as usize);

    // 1. Guarantee the next-ahead sector is FREE.
    let next = (positions.write.sector + 1) % cfg.sector_count;
    let (next_status, _) = sector_header(flash, cfg, next)?;
    if next_status != SectorStatus::Free {
        if positions.read.sector == next {
            positions.read = positions.read.advance_sector(cfg);
            trace!("append: reclaiming sector {} pushed read forward", next);
        }
        if positions.cursor.sector == next {
            positions.cursor = positions.cursor.advance_sector(cfg);
        }
        sector_free(flash, cfg, next)?;
    }

    // 2. Promote the current write sector if needed.
    let (write_status, _) = sector_header(flash, cfg, positions.write.sector)?;
    match write_status {
        SectorStatus::Free => {
            sector_set_status(flash, cfg, positions.write.sector, SectorStatus::InUse)?;
        }
        SectorStatus::InUse => {}
        _ => return Err(RingFsError::Corrupt),
    }

    // 3. Reserve the slot.
    slot_set_status(flash, cfg, object_size, positions.write, SlotStatus::Reserved)?;

    // 4. Write payload (after RESERVED, so a torn write is inert).
    let payload_addr = slot_payload_address(cfg, object_size, positions.write);
    flash.program(payload_addr, payload)?;

    // 5. Commit.
    slot_set_status(flash, cfg, object_size, positions.write, SlotStatus::Valid)?;

    // 6. Advance.
    positions.write = positions.write.advance_slot(cfg, slots_per_sector);

    Ok(())
}
