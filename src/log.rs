//! Logging facade.
//!
//! Every macro forwards to the [`log`](https://docs.rs/log) crate when the `log` feature is
//! enabled. Otherwise the arguments are only type checked, so values captured for logging are
//! still used. Only use them in statement position.
#![allow(unused, reason = "logger")]

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::trace!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        { let _ = format_args!($($tt)*); }
    };
}

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        { let _ = format_args!($($tt)*); }
    };
}

macro_rules! info {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::info!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        { let _ = format_args!($($tt)*); }
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::warn!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        { let _ = format_args!($($tt)*); }
    };
}

macro_rules! error {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::error!(target: "httpfromtcp", $($tt)*);
        #[cfg(not(feature = "log"))]
        { let _ = format_args!($($tt)*); }
    };
}

pub(crate) use {trace, debug, info, warning, error};
