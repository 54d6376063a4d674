//! Failure taxonomy for [`crate::RingFs`] operations.
//!
//! Grounded in the `define_adapter_error!` shape used across the wider
//! block-device ecosystem: an `Io(E)` variant wrapping the adapter's own
//! error type, plus the corruption/invariant-violation kinds a mount scan
//! or append can detect on its own.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RingFsError<E> {
    /// The flash adapter's `erase`/`program`/`read` returned an error.
    /// After this, the instance's in-RAM state is undefined; the caller
    /// must `scan` again before further use.
    Io(E),
    /// A sector status outside the known ladder, or a status value not
    /// reachable from the current state by only clearing bits.
    Corrupt,
    /// `scan` found a sector still in FORMATTING state: `format` was
    /// interrupted by a power loss and never completed.
    FormatInterrupted,
    /// An IN_USE sector's stored schema version does not match the
    /// configured version.
    VersionMismatch,
    /// No sector with status FREE was found; the "one FREE sector always
    /// exists" invariant has been destroyed on the medium.
    NoFreeSector,
}

impl<E> From<E> for RingFsError<E> {
    fn from(e: E) -> Self {
        Self::Io(e)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for RingFsError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "flash adapter error: {e}"),
            Self::Corrupt => write!(f, "sector or slot status outside the known ladder"),
            Self::FormatInterrupted => write!(f, "format was interrupted by power loss"),
            Self::VersionMismatch => write!(f, "schema version mismatch at mount"),
            Self::NoFreeSector => write!(f, "no FREE sector found on the partition"),
        }
    }
}

impl<E: core::fmt::Debug + core::fmt::Display> core::error::Error for RingFsError<E> {}
