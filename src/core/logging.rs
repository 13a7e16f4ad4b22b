//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - `defmt` feature: Forwards to defmt for embedded hosts
//! - Host tests: Uses println!
//! - Otherwise: No-op that still type-checks its arguments
//!
//! Format strings stay within the subset defmt accepts (`{}` and `{:?}`),
//! so every call site compiles on both paths.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::info!($($arg)*);

        #[cfg(test)]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", test)))]
        {
            if false {
                let _ = format_args!($($arg)*);
            }
        }
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::warn!($($arg)*);

        #[cfg(test)]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", test)))]
        {
            if false {
                let _ = format_args!($($arg)*);
            }
        }
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::error!($($arg)*);

        #[cfg(test)]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", test)))]
        {
            if false {
                let _ = format_args!($($arg)*);
            }
        }
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::debug!($($arg)*);

        #[cfg(test)]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", test)))]
        {
            if false {
                let _ = format_args!($($arg)*);
            }
        }
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::trace!($($arg)*);

        #[cfg(test)]
        println!("[TRACE] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", test)))]
        {
            if false {
                let _ = format_args!($($arg)*);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_accept_format_arguments() {
        let stream = "Extra1";
        let count = 3u8;
        crate::log_info!("Stream {} fired {} times", stream, count);
        crate::log_warn!("Write failed on {}", stream);
        crate::log_error!("Transport error: {:?}", count);
        crate::log_debug!("Batch {}", count);
        crate::log_trace!("tick");
    }
}
