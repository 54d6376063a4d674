//! `ringfs`: a crash-safe, wear-levelling FIFO log for raw NOR flash.
//!
//! Records are fixed-size and consumed oldest-first. The ring
//! automatically reclaims its oldest sector when space runs out, and
//! [`RingFs::scan`] rebuilds all in-RAM state from what is actually on
//! flash, so a crash at any point leaves the log in a state the next
//! mount can recover without a separate journal.
//!
//! ```text
//! let mut fs: RingFs<_, 4> = RingFs::new(flash, cfg);
//! fs.scan()?; // or fs.format()? on first use
//! fs.append(&42u32.to_le_bytes())?;
//! let mut out = [0u8; 4];
//! if fs.fetch(&mut out)? {
//!     fs.discard()?;
//! }
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

// Declared first: every other module reaches for the `fmt` macros.
mod fmt;

mod addr;
mod append;
mod config;
mod count;
mod error;
mod fetch;
mod flash;
mod format;
mod instance;
mod location;
mod page_cache;
mod scan;
mod sector;
mod slot;
mod status;

pub use config::PartitionConfig;
pub use error::RingFsError;
pub use flash::Flash;
pub use instance::{RingFs, RingFsStats};
pub use location::Location;
pub use page_cache::PageCache;
pub use status::{SectorStatus, SlotStatus};
