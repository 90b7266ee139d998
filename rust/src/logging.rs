//! Verbosity-gated solver logging to stderr.
//!
//! The level comes from `SolverConfig::verbosity` and is read once per
//! search. A disabled level costs one integer compare per call site.
//!
//! - 0 (silent): nothing; the default.
//! - 1 (placements): each committed candidate with its group, subject, day,
//!   hour, room and faculty, plus the final status and counters.
//! - 2 (checks): preflight failures, sessions whose candidates ran out, and
//!   complete assignments turned down by an acceptance check.
//! - 3 (trace): every rollback.

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PLACEMENTS: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Log at PLACEMENTS level (verbosity >= 1).
#[macro_export]
macro_rules! log_placements {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PLACEMENTS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at TRACE level (verbosity >= 3).
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRACE {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_PLACEMENTS);
        assert!(VERBOSITY_PLACEMENTS < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_TRACE);
    }

    #[test]
    fn test_log_macros_compile() {
        let verbosity = VERBOSITY_SILENT;
        log_placements!(verbosity, "placed {}", 1);
        log_checks!(verbosity, "checked {}", 2);
        log_trace!(verbosity, "traced {}", 3);
    }
}
