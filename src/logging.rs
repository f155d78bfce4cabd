//! Logging macros.
//!
//! - `defmt` feature: forwards to defmt
//! - host unit tests (`std`): prints to stdout/stderr
//! - otherwise: no-op, arguments are still type-checked
//!
//! Only `{}` placeholders are used so the same call sites are valid for both
//! defmt and `core::fmt`.

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(test, feature = "std", not(feature = "defmt")))]
        ::std::println!("[DEBUG] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(test, feature = "std", not(feature = "defmt")))]
        ::std::println!("[INFO] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(test, feature = "std", not(feature = "defmt")))]
        ::std::println!("[WARN] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(test, feature = "std", not(feature = "defmt")))]
        ::std::eprintln!("[ERROR] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
