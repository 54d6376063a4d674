//! Sector lifecycle operations: reading and transitioning a sector's
//! header through its ERASED -> FREE -> IN_USE -> ERASING state ladder.

use crate::addr::sector_header_address;
use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::fmt::{debug, trace};
use crate::flash::Flash;
use crate::status::SectorStatus;

/// Read the sector header and return its status and stored version.
pub fn sector_header<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    sector: u32,
) -> Result<(SectorStatus, u32), RingFsError<F::Error>> {
    let addr = sector_header_address(cfg, sector);
    let mut buf = [0u8; 8];
    flash.read(addr, &mut buf)?;
    let raw_status = u32::from_le_bytes(buf[0..4].try_into().unwrap());
    let version = u32::from_le_bytes(buf[4..8].try_into().unwrap());
    let status = SectorStatus::from_raw(raw_status).ok_or(RingFsError::Corrupt)?;
    Ok((status, version))
}

/// Program a new status into the sector header.
///
/// It is the caller's duty to pass a status that is a bitwise-AND
/// descendant of the current one; this function does not check.
pub fn sector_set_status<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    sector: u32,
    status: SectorStatus,
) -> Result<(), RingFsError<F::Error>> {
    let addr = sector_header_address(cfg, sector);
    flash.program(addr, &status.to_raw().to_le_bytes())?;
    Ok(())
}

/// Program the version word of the sector header (the second u32).
pub fn sector_set_version<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    sector: u32,
    version: u32,
) -> Result<(), RingFsError<F::Error>> {
    let addr = sector_header_address(cfg, sector) + 4;
    flash.program(addr, &version.to_le_bytes())?;
    Ok(())
}

/// The crash-safe sector erase: ERASING -> physical erase -> version ->
/// FREE.
///
/// If power is lost at any point in this sequence, the next `scan` will
/// observe ERASED or ERASING and call this again.
pub fn sector_free<F: Flash>(
    flash: &mut F,
    cfg: &PartitionConfig,
    sector: u32,
) -> Result<(), RingFsError<F::Error>> {
    trace!("sector_free({})", sector);
    sector_set_status(flash, cfg, sector, SectorStatus::Erasing)?;
    flash.erase(crate::addr::sector_address(cfg, sector))?;
    sector_set_version(flash, cfg, sector, cfg.schema_version)?;
    sector_set_status(flash, cfg, sector, SectorStatus::Free)?;
    debug!("sector {} is now FREE", sector);
    Ok(())
}
