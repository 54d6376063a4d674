//! Fetch / discard / rewind: advancing the reader's cursor, acknowledging
//! consumed records, and replaying from the oldest undiscarded one.

use crate::addr::slot_payload_address;
use crate::append::Positions;
use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::slot::{slot_get_status, slot_set_status};
use crate::status::SlotStatus;

/// Advance `cursor` forward from its current position until a VALID slot
/// is found (read into `out`, return `true`) or `cursor` meets `write`
/// (return `false`, no flash access beyond the status reads already made).
pub fn fetch<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    positions: &mut Positions,
    out: &mut [u8],
) -> Result<bool, RingFsError<F::Error>> {
    debug_assert_eq!(out.len(), object_size as usize);

    loop {
        if positions.cursor == positions.write {
            return Ok(false);
        }

        let status = slot_get_status(flash, cfg, object_size, positions.cursor)?;
        if status == SlotStatus::Valid {
            let addr = slot_payload_address(cfg, object_size, positions.cursor);
            flash.read(addr, out)?;
            positions.cursor = positions.cursor.advance_slot(cfg, slots_per_sector);
            return Ok(true);
        }

        // RESERVED (torn write) or GARBAGE: skip it.
        positions.cursor = positions.cursor.advance_slot(cfg, slots_per_sector);
    }
}

/// Mark every slot from `read` (inclusive) to `cursor` (exclusive) as
/// GARBAGE and advance `read` to `cursor`.
pub fn discard<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    positions: &mut Positions,
) -> Result<(), RingFsError<F::Error>> {
    while positions.read != positions.cursor {
        slot_set_status(flash, cfg, object_size, positions.read, SlotStatus::Garbage)?;
        positions.read = positions.read.advance_slot(cfg, slots_per_sector);
    }
    Ok(())
}

/// Mark only the slot at `read` as GARBAGE and advance by one.
///
/// Unconditional: calling this when `read == cursor == write` (the ring
/// is empty) marks an ERASED slot as GARBAGE. Callers must guard against
/// that themselves.
pub fn discard_one<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    slots_per_sector: u32,
    positions: &mut Positions,
) -> Result<(), RingFsError<F::Error>> {
    slot_set_status(flash, cfg, object_size, positions.read, SlotStatus::Garbage)?;
    positions.read = positions.read.advance_slot(cfg, slots_per_sector);
    Ok(())
}

/// `cursor <- read`: re-reads from the oldest undiscarded record.
pub fn rewind(positions: &mut Positions) {
    positions.cursor = positions.read;
}
