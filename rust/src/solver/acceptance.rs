//! Global acceptance checks evaluated once every session has a placement.

use super::availability::Placement;

/// A rule over a complete assignment. Failing it sends the search back to try
/// a different earlier placement.
pub trait AcceptanceCheck {
    fn name(&self) -> &'static str;

    /// `placements` holds one entry per session; `division_count` bounds the division indices.
    fn accept(&self, placements: &[Placement], division_count: usize) -> bool;
}

/// Hook for rules on how breaks sit relative to teaching.
///
/// Each division already gets at most one break per day from break candidate
/// generation, so there is nothing further to enforce yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakDistribution;

impl AcceptanceCheck for BreakDistribution {
    fn name(&self) -> &'static str {
        "break_distribution"
    }

    fn accept(&self, _placements: &[Placement], _division_count: usize) -> bool {
        true
    }
}

/// Every division must teach on at least `min_days` distinct days.
#[derive(Debug, Clone, Copy)]
pub struct DayCoverage {
    pub min_days: u8,
}

impl DayCoverage {
    /// Bitmask of days with non-break sessions, per division.
    pub fn teaching_days(placements: &[Placement], division_count: usize) -> Vec<u8> {
        let mut days = vec![0u8; division_count];
        for p in placements.iter().filter(|p| !p.is_break) {
            if let Some(mask) = days.get_mut(p.division as usize) {
                *mask |= 1 << p.day;
            }
        }
        days
    }
}

impl AcceptanceCheck for DayCoverage {
    fn name(&self) -> &'static str {
        "day_coverage"
    }

    fn accept(&self, placements: &[Placement], division_count: usize) -> bool {
        Self::teaching_days(placements, division_count)
            .iter()
            .all(|mask| mask.count_ones() >= u32::from(self.min_days))
    }
}

/// The checks every search runs, in order.
pub fn default_checks(min_teaching_days: u8) -> Vec<Box<dyn AcceptanceCheck>> {
    vec![
        Box::new(BreakDistribution),
        Box::new(DayCoverage {
            min_days: min_teaching_days,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(division: u32, day: u8) -> Placement {
        Placement {
            division,
            day,
            start_hour: 9,
            duration: 1,
            room: Some(0),
            faculty: Some(0),
            is_break: false,
        }
    }

    fn brk(division: u32, day: u8) -> Placement {
        Placement {
            room: None,
            faculty: None,
            is_break: true,
            ..lecture(division, day)
        }
    }

    #[test]
    fn test_day_coverage_counts_teaching_only() {
        let check = DayCoverage { min_days: 3 };
        let mut placements = vec![lecture(0, 0), lecture(0, 1), brk(0, 2), brk(0, 3)];
        assert!(!check.accept(&placements, 1));

        placements.push(lecture(0, 4));
        assert!(check.accept(&placements, 1));
    }

    #[test]
    fn test_day_coverage_requires_every_division() {
        let check = DayCoverage { min_days: 2 };
        let placements = vec![lecture(0, 0), lecture(0, 1), lecture(1, 3), lecture(1, 3)];
        assert!(!check.accept(&placements, 2));
        // A division with no sessions at all fails
        assert!(!check.accept(&placements[..2], 2));
        assert!(check.accept(&placements[..2], 1));
    }

    #[test]
    fn test_break_distribution_accepts_everything() {
        let placements = vec![brk(0, 0), brk(0, 0)];
        assert!(BreakDistribution.accept(&placements, 1));
        assert!(BreakDistribution.accept(&[], 0));
    }

    #[test]
    fn test_default_checks_order() {
        let names: Vec<&str> = default_checks(3).iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["break_distribution", "day_coverage"]);
    }
}
