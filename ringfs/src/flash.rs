//! The flash adapter contract.
//!
//! A synchronous, byte-addressed capability with an associated `Error`
//! type, taken by mutable reference and with no generic payload type on
//! its methods, so it stays object-safe and a simulator and a real driver
//! can be used behind one `dyn Flash`.

/// A capability object providing the three primitives the core needs from
/// raw NOR flash.
///
/// `program` must semantically AND `bytes` into the existing flash
/// contents at `addr..addr + bytes.len()` (bits may only move 1 -> 0).
/// Multiple programs to the same bytes are permitted provided each only
/// clears bits; the core relies on this to implement the two-phase
/// RESERVED -> VALID slot commit without re-erasing between the two
/// writes.
pub trait Flash {
    /// The adapter's own error type.
    type Error: core::fmt::Debug;

    /// Erase the whole sector containing `addr`. After this call the
    /// entire sector reads as all-ones.
    fn erase(&mut self, addr: u32) -> Result<(), Self::Error>;

    /// AND `bytes` into flash at `addr..addr + bytes.len()`.
    fn program(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes starting at `addr` into `buf`.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error>;
}
