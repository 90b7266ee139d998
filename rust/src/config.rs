//! Configuration types for the timetable solver.

use std::ops::RangeInclusive;

use crate::solver::SolverError;

/// Hours covered by an occupancy bitmask; the working window may not exceed this.
pub const MAX_WINDOW_HOURS: u8 = 32;

/// Forces a division's break on one day to a single hour.
///
/// Used for divisions whose fixed midday lecture blocks leave only one break hour open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedBreak {
    pub division: String,
    pub day: u8,
    pub hour: u8,
}

impl FixedBreak {
    pub fn new(division: &str, day: u8, hour: u8) -> Self {
        Self {
            division: division.to_string(),
            day,
            hour,
        }
    }
}

/// Configuration for the backtracking search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// First teaching hour of the day (24h clock)
    pub day_start_hour: u8,
    /// Closing hour; sessions must end at or before it
    pub day_end_hour: u8,
    /// Number of days in the week, starting Monday
    pub days_per_week: u8,
    /// Maximum scheduled hours per division per day
    pub daily_load_ceiling: u8,
    /// Minimum distinct days carrying teaching for every division
    pub min_teaching_days: u8,
    /// Candidate start hours for breaks, tried in increasing order
    pub break_window: RangeInclusive<u8>,
    /// Per-(division, day) break hour overrides
    pub fixed_breaks: Vec<FixedBreak>,
    /// Verbosity level: 0=silent, 1=placements, 2=checks, 3=trace
    pub verbosity: u8,
    /// Maximum search nodes before giving up (None = exhaustive)
    pub node_limit: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 8,
            day_end_hour: 18,
            days_per_week: 5,
            daily_load_ceiling: 8,
            min_teaching_days: 3,
            break_window: 11..=13,
            fixed_breaks: Vec::new(),
            verbosity: 0,
            node_limit: None,
        }
    }
}

impl SolverConfig {
    /// Length of the working window in hours.
    pub fn window_hours(&self) -> u8 {
        self.day_end_hour.saturating_sub(self.day_start_hour)
    }

    /// Whether `[start, start + duration)` lies inside the working window.
    pub fn fits_window(&self, start: u8, duration: u8) -> bool {
        start >= self.day_start_hour
            && u16::from(start) + u16::from(duration) <= u16::from(self.day_end_hour)
    }

    /// Check internal consistency of the configuration.
    pub fn validate(&self) -> Result<(), SolverError> {
        let invalid = |msg: String| Err(SolverError::InvalidConfig(msg));

        if self.day_start_hour >= self.day_end_hour || self.day_end_hour > 24 {
            return invalid(format!(
                "working window {}..{} is empty or past midnight",
                self.day_start_hour, self.day_end_hour
            ));
        }
        if self.window_hours() > MAX_WINDOW_HOURS {
            return invalid(format!(
                "working window of {} hours exceeds {}",
                self.window_hours(),
                MAX_WINDOW_HOURS
            ));
        }
        if !(1..=7).contains(&self.days_per_week) {
            return invalid(format!(
                "days_per_week must be 1..=7, got {}",
                self.days_per_week
            ));
        }
        if self.min_teaching_days > self.days_per_week {
            return invalid(format!(
                "min_teaching_days {} exceeds days_per_week {}",
                self.min_teaching_days, self.days_per_week
            ));
        }
        let (lo, hi) = (*self.break_window.start(), *self.break_window.end());
        if lo > hi || lo < self.day_start_hour || hi >= self.day_end_hour {
            return invalid(format!(
                "break window {}..={} is outside the working window",
                lo, hi
            ));
        }
        for fixed in &self.fixed_breaks {
            if fixed.day >= self.days_per_week || !self.fits_window(fixed.hour, 1) {
                return invalid(format!(
                    "fixed break for {} on day {} at {} is outside the week",
                    fixed.division, fixed.day, fixed.hour
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.window_hours(), 10);
        assert_eq!(config.break_window, 11..=13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fits_window() {
        let config = SolverConfig::default();
        assert!(config.fits_window(8, 2));
        assert!(config.fits_window(16, 2));
        assert!(!config.fits_window(17, 2));
        assert!(!config.fits_window(7, 1));
    }

    #[test]
    fn test_invalid_configs() {
        let empty_window = SolverConfig {
            day_start_hour: 10,
            day_end_hour: 10,
            ..Default::default()
        };
        assert!(matches!(
            empty_window.validate(),
            Err(SolverError::InvalidConfig(_))
        ));

        let break_outside = SolverConfig {
            break_window: 6..=7,
            ..Default::default()
        };
        assert!(break_outside.validate().is_err());

        let too_many_days = SolverConfig {
            min_teaching_days: 6,
            ..Default::default()
        };
        assert!(too_many_days.validate().is_err());

        let bad_fixed = SolverConfig {
            fixed_breaks: vec![FixedBreak::new("A", 5, 11)],
            ..Default::default()
        };
        assert!(bad_fixed.validate().is_err());
    }
}
