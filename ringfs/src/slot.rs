//! Slot lifecycle operations: reading and transitioning a slot's header
//! through its ERASED -> RESERVED -> VALID -> GARBAGE state ladder.

use crate::addr::slot_address;
use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::location::Location;
use crate::status::SlotStatus;

/// Read a slot's 4-byte status header.
pub fn slot_get_status<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    loc: Location,
) -> Result<SlotStatus, RingFsError<F::Error>> {
    let addr = slot_address(cfg, object_size, loc);
    let mut buf = [0u8; 4];
    flash.read(addr, &mut buf)?;
    let raw = u32::from_le_bytes(buf);
    SlotStatus::from_raw(raw).ok_or(RingFsError::Corrupt)
}

/// Program a new status into a slot's header. Caller's duty to only clear
/// bits relative to the slot's current status.
pub fn slot_set_status<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    object_size: u32,
    loc: Location,
    status: SlotStatus,
) -> Result<(), RingFsError<F::Error>> {
    let addr = slot_address(cfg, object_size, loc);
    flash.program(addr, &status.to_raw().to_le_bytes())?;
    Ok(())
}
