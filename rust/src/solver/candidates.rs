//! Candidate generation, one generator per session kind.
//!
//! Generators depend only on the catalog and configuration, never on the
//! occupancy state, so each call yields the same lazy, finite sequence in the
//! same order. The search filters candidates against `Availability`.

use rustc_hash::FxHashMap;

use crate::config::SolverConfig;
use crate::interner::NameId;

use super::availability::Placement;

/// Resolved (division, day) -> hour break overrides.
pub type FixedBreakHours = FxHashMap<(NameId, u8), u8>;

/// Break placements for `division`: day by day, either the fixed hour for that
/// day or every hour of the break window in increasing order.
pub fn break_candidates<'a>(
    division: NameId,
    duration: u8,
    fixed: &'a FixedBreakHours,
    config: &'a SolverConfig,
) -> impl Iterator<Item = Placement> + 'a {
    (0..config.days_per_week).flat_map(move |day| {
        let hours = match fixed.get(&(division, day)) {
            Some(&hour) => hour..=hour,
            None => config.break_window.clone(),
        };
        hours
            .filter(move |&hour| config.fits_window(hour, duration))
            .map(move |start_hour| Placement {
                division,
                day,
                start_hour,
                duration,
                room: None,
                faculty: None,
                is_break: true,
            })
    })
}

/// Teaching placements in nested order day -> start hour -> room -> faculty.
pub fn teaching_candidates<'a>(
    division: NameId,
    duration: u8,
    rooms: &'a [NameId],
    faculty: &'a [NameId],
    config: &'a SolverConfig,
) -> impl Iterator<Item = Placement> + 'a {
    let first_hour = config.day_start_hour;
    let last_hour = config.day_end_hour.saturating_sub(duration);

    (0..config.days_per_week).flat_map(move |day| {
        (first_hour..=last_hour)
            .filter(move |&hour| config.fits_window(hour, duration))
            .flat_map(move |start_hour| {
                rooms.iter().flat_map(move |&room| {
                    faculty.iter().map(move |&fac| Placement {
                        division,
                        day,
                        start_hour,
                        duration,
                        room: Some(room),
                        faculty: Some(fac),
                        is_break: false,
                    })
                })
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(p: &Placement) -> (u8, u8, Option<NameId>, Option<NameId>) {
        (p.day, p.start_hour, p.room, p.faculty)
    }

    #[test]
    fn test_teaching_order_is_day_hour_room_faculty() {
        let config = SolverConfig::default();
        let rooms = [4, 7];
        let faculty = [1, 0];
        let first: Vec<_> = teaching_candidates(0, 1, &rooms, &faculty, &config)
            .take(5)
            .map(|p| key(&p))
            .collect();
        assert_eq!(
            first,
            vec![
                (0, 8, Some(4), Some(1)),
                (0, 8, Some(4), Some(0)),
                (0, 8, Some(7), Some(1)),
                (0, 8, Some(7), Some(0)),
                (0, 9, Some(4), Some(1)),
            ]
        );
    }

    #[test]
    fn test_teaching_stays_inside_window() {
        let config = SolverConfig::default();
        let all: Vec<_> = teaching_candidates(0, 2, &[0], &[0], &config).collect();
        // 5 days, start hours 8..=16
        assert_eq!(all.len(), 5 * 9);
        assert!(all.iter().all(|p| p.start_hour + p.duration <= 18));
        assert_eq!(all.last().map(key), Some((4, 16, Some(0), Some(0))));
    }

    #[test]
    fn test_teaching_without_faculty_is_empty() {
        let config = SolverConfig::default();
        assert_eq!(teaching_candidates(0, 1, &[0, 1], &[], &config).count(), 0);
        assert_eq!(teaching_candidates(0, 1, &[], &[0], &config).count(), 0);
    }

    #[test]
    fn test_teaching_longer_than_window_is_empty() {
        let config = SolverConfig::default();
        assert_eq!(teaching_candidates(0, 11, &[0], &[0], &config).count(), 0);
    }

    #[test]
    fn test_break_window_and_fixed_override() {
        let config = SolverConfig::default();
        let mut fixed = FixedBreakHours::default();
        fixed.insert((2, 1), 11);

        let hours: Vec<(u8, u8)> = break_candidates(2, 1, &fixed, &config)
            .map(|p| (p.day, p.start_hour))
            .collect();
        assert_eq!(&hours[..4], &[(0, 11), (0, 12), (0, 13), (1, 11)]);
        assert_eq!(&hours[4..7], &[(2, 11), (2, 12), (2, 13)]);
        assert_eq!(hours.len(), 3 + 1 + 3 + 3 + 3);

        // The override belongs to division 2 only
        assert_eq!(break_candidates(0, 1, &fixed, &config).count(), 15);
        assert!(break_candidates(2, 1, &fixed, &config).all(|p| p.is_break && p.room.is_none()));
    }
}
