//! In-memory NOR flash simulator for testing [`ringfs`].
//!
//! [`MemFlash`] enforces the one rule real NOR flash enforces and most bugs
//! violate silently: `program` may only clear bits. It panics the moment a
//! caller tries to set a bit that a previous `program` left clear.
//!
//! [`MemFlash::with_crash_after`] injects power loss: after a configurable
//! budget of bytes have been written (`erase` and `program` both count),
//! every subsequent flash operation fails. This is the tool
//! `ringfs`'s crash-scenario tests use to check that `scan` can always
//! recover, no matter where in the protocol the power was cut.

use ringfs::Flash;

/// The error [`MemFlash`] returns once its crash budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerLost;

impl core::fmt::Display for PowerLost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "simulated power loss: crash budget exhausted")
    }
}

impl std::error::Error for PowerLost {}

/// An in-memory stand-in for raw NOR flash.
///
/// Backed by a `Vec<u8>` initialized to all-ones (the state of freshly
/// erased flash). Tracks a byte budget for crash injection and the total
/// number of sector erases performed, which tests can use to assert on
/// wear-leveling behavior.
pub struct MemFlash {
    data: Vec<u8>,
    sector_size: u32,
    erase_count: u64,
    budget: Option<u64>,
    crashed: bool,
}

impl MemFlash {
    /// Allocate `sector_count * sector_size` bytes of simulated flash, all
    /// erased (`0xFF`).
    pub fn new(sector_size: u32, sector_count: u32) -> Self {
        Self {
            data: vec![0xFF; (sector_size as usize) * (sector_count as usize)],
            sector_size,
            erase_count: 0,
            budget: None,
            crashed: false,
        }
    }

    /// Arm a crash budget: the `budget`-th byte written by `erase` or
    /// `program` (counting every byte touched, including bytes an `erase`
    /// resets to `0xFF`) is the last one to succeed. Every operation after
    /// that point returns [`PowerLost`], simulating power loss mid-write.
    pub fn with_crash_after(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Wrap an existing byte buffer (e.g. loaded from a flash image file) as
    /// simulated flash, rather than starting from an all-erased state.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != sector_size * sector_count`.
    pub fn from_bytes(sector_size: u32, sector_count: u32, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), (sector_size as usize) * (sector_count as usize));
        Self {
            data,
            sector_size,
            erase_count: 0,
            budget: None,
            crashed: false,
        }
    }

    /// Consume the simulator and return its backing bytes, e.g. to persist
    /// a flash image back to disk.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Borrow the backing bytes without consuming the simulator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total number of sector erases performed so far.
    pub fn erase_count(&self) -> u64 {
        self.erase_count
    }

    /// Whether the crash budget (if any) has been exhausted.
    pub fn has_crashed(&self) -> bool {
        self.crashed
    }

    fn charge(&mut self, bytes: u64) -> Result<(), PowerLost> {
        if self.crashed {
            return Err(PowerLost);
        }
        if let Some(budget) = &mut self.budget {
            if bytes >= *budget {
                *budget = 0;
                self.crashed = true;
                return Err(PowerLost);
            }
            *budget -= bytes;
        }
        Ok(())
    }
}

impl Flash for MemFlash {
    type Error = PowerLost;

    fn erase(&mut self, addr: u32) -> Result<(), Self::Error> {
        let sector = addr / self.sector_size;
        let start = (sector * self.sector_size) as usize;
        let end = start + self.sector_size as usize;
        self.charge(self.sector_size as u64)?;
        self.data[start..end].fill(0xFF);
        self.erase_count += 1;
        Ok(())
    }

    fn program(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.charge(bytes.len() as u64)?;
        let start = addr as usize;
        for (i, &b) in bytes.iter().enumerate() {
            let existing = self.data[start + i];
            let programmed = existing & b;
            assert_eq!(
                programmed, b,
                "program at {:#x}+{i} would set a bit: existing {existing:#010b}, requested {b:#010b}",
                addr
            );
            self.data[start + i] = programmed;
        }
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.crashed {
            return Err(PowerLost);
        }
        let start = addr as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erase_resets_to_all_ones() {
        let mut flash = MemFlash::new(128, 4);
        flash.program(0, &[0x00, 0x00]).unwrap();
        flash.erase(0).unwrap();
        let mut buf = [0u8; 2];
        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF]);
    }

    #[test]
    #[should_panic(expected = "would set a bit")]
    fn program_cannot_set_bits() {
        let mut flash = MemFlash::new(128, 4);
        flash.program(0, &[0x0F]).unwrap();
        flash.program(0, &[0xFF]).unwrap();
    }

    #[test]
    fn program_can_clear_further_bits() {
        let mut flash = MemFlash::new(128, 4);
        flash.program(0, &[0x0F]).unwrap();
        flash.program(0, &[0x03]).unwrap();
        let mut buf = [0u8; 1];
        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf[0], 0x03);
    }

    #[test]
    fn crash_budget_fails_subsequent_operations() {
        let mut flash = MemFlash::new(128, 4).with_crash_after(4);
        flash.program(0, &[1, 2, 3, 4]).unwrap();
        assert!(flash.program(4, &[5]).is_err());
        assert!(flash.has_crashed());
    }

    #[test]
    fn erase_count_tracks_sector_erases() {
        let mut flash = MemFlash::new(128, 4);
        flash.erase(0).unwrap();
        flash.erase(128).unwrap();
        assert_eq!(flash.erase_count(), 2);
    }
}
