//! Logging facade.
//!
//! Forwards to `log` or `defmt` depending on which feature is enabled, and
//! is a silent no-op when neither is. Must be the first module declared in
//! `lib.rs` so the macros are in scope for everything that follows.

#![allow(unused_macros)]
#![allow(unused_imports)]

macro_rules! trace {
    ($($x:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::trace!($($x)*);
            #[cfg(feature = "defmt")]
            ::defmt::trace!($($x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($x)*,);
        }
    };
}

macro_rules! debug {
    ($($x:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::debug!($($x)*);
            #[cfg(feature = "defmt")]
            ::defmt::debug!($($x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($x)*,);
        }
    };
}

macro_rules! warn {
    ($($x:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::warn!($($x)*);
            #[cfg(feature = "defmt")]
            ::defmt::warn!($($x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($x)*,);
        }
    };
}

macro_rules! error {
    ($($x:tt)*) => {
        {
            #[cfg(feature = "log")]
            ::log::error!($($x)*);
            #[cfg(feature = "defmt")]
            ::defmt::error!($($x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($($x)*,);
        }
    };
}

pub(crate) use debug;
pub(crate) use error;
pub(crate) use trace;
pub(crate) use warn;
