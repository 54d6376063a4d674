//! Page-coalescing buffer.
//!
//! For devices whose program granularity is one page, fills an in-RAM
//! buffer until full, then flushes it as a single [`crate::append`] call.
//! `N` is the page size and must equal the `RingFs`'s own `OBJECT_SIZE`,
//! since one flushed buffer becomes exactly one ring record.

use crate::append::{self, Positions};
use crate::config::PartitionConfig;
use crate::error::RingFsError;
use crate::flash::Flash;

/// Aggregates byte-granular writes into one `N`-byte record before handing
/// it to [`append::append`].
pub struct PageCache<const N: usize> {
    buffer: [u8; N],
    fill: usize,
}

impl<const N: usize> PageCache<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; N],
            fill: 0,
        }
    }

    /// Bytes currently buffered but not yet flushed.
    pub fn fill_level(&self) -> usize {
        self.fill
    }

    /// Append `bytes` into the buffer, flushing first if they would not
    /// otherwise fit. Returns the number of bytes accepted (always
    /// `bytes.len()` — a flush is silent backpressure, not partial
    /// acceptance).
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` exceeds the buffer capacity `N`: a single
    /// call can never be split across two flushed records.
    pub fn append_to_cache<F: Flash>(
        &mut self,
        flash: &mut F,
        cfg: &PartitionConfig,
        slots_per_sector: u32,
        positions: &mut Positions,
        bytes: &[u8],
    ) -> Result<usize, RingFsError<F::Error>> {
        assert!(
            bytes.len() <= N,
            "record of {} bytes exceeds page-coalescing buffer capacity {N}",
            bytes.len()
        );

        if self.fill + bytes.len() > N {
            self.flush(flash, cfg, slots_per_sector, positions)?;
        }

        self.buffer[self.fill..self.fill + bytes.len()].copy_from_slice(bytes);
        self.fill += bytes.len();
        Ok(bytes.len())
    }

    /// Flush any buffered bytes as a single `N`-byte object, zero-padding
    /// the unused tail. A no-op if the buffer is empty.
    pub fn flush<F: Flash>(
        &mut self,
        flash: &mut F,
        cfg: &PartitionConfig,
        slots_per_sector: u32,
        positions: &mut Positions,
    ) -> Result<(), RingFsError<F::Error>> {
        if self.fill == 0 {
            return Ok(());
        }
        self.buffer[self.fill..].fill(0);
        append::append(flash, cfg, N as u32, slots_per_sector, positions, &self.buffer)?;
        self.fill = 0;
        Ok(())
    }
}

impl<const N: usize> Default for PageCache<N> {
    fn default() -> Self {
        Self::new()
    }
}
