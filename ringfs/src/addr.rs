//! Byte address arithmetic: converts `(sector, slot)` locations to flash
//! byte addresses given partition geometry.

use crate::config::{PartitionConfig, SECTOR_HEADER_SIZE, SLOT_HEADER_SIZE};
use crate::location::Location;

/// `(sector_offset + k) * sector_size`
pub fn sector_address(cfg: &PartitionConfig, sector: u32) -> u32 {
    (cfg.sector_offset + sector) * cfg.sector_size
}

/// Byte offset of the sector header within its sector: the final 8 bytes.
pub fn sector_header_address(cfg: &PartitionConfig, sector: u32) -> u32 {
    sector_address(cfg, sector) + cfg.sector_size - SECTOR_HEADER_SIZE
}

/// `sector_address(sector) + slot * (sizeof(slot_header) + object_size)`
pub fn slot_address(cfg: &PartitionConfig, object_size: u32, loc: Location) -> u32 {
    sector_address(cfg, loc.sector) + loc.slot * (SLOT_HEADER_SIZE + object_size)
}

/// Byte offset of a slot's payload, immediately after its 4-byte header.
pub fn slot_payload_address(cfg: &PartitionConfig, object_size: u32, loc: Location) -> u32 {
    slot_address(cfg, object_size, loc) + SLOT_HEADER_SIZE
}
