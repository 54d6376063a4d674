//! Two-phase global wipe: converts arbitrary flash contents into a valid
//! empty ring.

use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;
use crate::fmt::debug;
use crate::sector::{sector_free, sector_set_status};
use crate::status::SectorStatus;

/// Convert arbitrary flash contents into a valid empty ring.
///
/// 1. Program every sector's status to FORMATTING, so a power loss during
///    the remainder of this function is unambiguously recognised at the
///    next mount and never silently produces a partial format.
/// 2. Call [`sector_free`] on each sector in order, leaving every sector
///    FREE with a freshly-written version word.
///
/// The caller is responsible for resetting its own `read`/`write`/`cursor`
/// locations to `(0, 0)` on success.
pub fn format<F: Flash>(flash: &mut F, cfg: &PartitionConfig) -> Result<(), RingFsError<F::Error>> {
    debug!("formatting {} sectors", cfg.sector_count);
    for sector in 0..cfg.sector_count {
        sector_set_status(flash, cfg, sector, SectorStatus::Formatting)?;
    }
    for sector in 0..cfg.sector_count {
        sector_free(flash, cfg, sector)?;
    }
    Ok(())
}
