//! Post-hoc verification of a timetable against every hard rule.
//!
//! Independent of the search state: works purely from the named slots on the
//! sessions, so it can check solver output or a hand-edited timetable.
//!
//! Sessions of different divisions that share subject, kind, slot, room and
//! faculty are one joint block (a combined lecture) and occupy the room and
//! faculty once.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::config::SolverConfig;
use crate::models::{day_name, format_hour, Session};
use crate::solver::SolverError;

/// A broken rule found in a timetable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error(transparent)]
    InvalidConfig(#[from] SolverError),
    #[error("{0} is not assigned")]
    Unassigned(String),
    #[error("{0} lies outside the working week")]
    OutsideWindow(String),
    #[error("{0} has no room or faculty")]
    MissingResource(String),
    #[error("Division {division} is double-booked on {} at {}", weekday_name(.day), clock(.hour))]
    DivisionOverlap { division: String, day: u8, hour: u8 },
    #[error("Room {room} is double-booked on {} at {}", weekday_name(.day), clock(.hour))]
    RoomOverlap { room: String, day: u8, hour: u8 },
    #[error("Faculty {faculty} is double-booked on {} at {}", weekday_name(.day), clock(.hour))]
    FacultyOverlap { faculty: String, day: u8, hour: u8 },
    #[error("Division {division} teaches {hours}h on {}, above the ceiling", weekday_name(.day))]
    DailyLoadExceeded { division: String, day: u8, hours: u16 },
    #[error("Division {division} has more than one break on {}", weekday_name(.day))]
    DuplicateBreak { division: String, day: u8 },
    #[error("Division {division} teaches on only {days} distinct days")]
    InsufficientDays { division: String, days: u32 },
}

/// Check every session's slot against the configuration and each other.
///
/// Returns all violations found, in a stable order. An invalid `config` is
/// reported alone, before any session is looked at.
pub fn verify(sessions: &[Session], config: &SolverConfig) -> Result<(), Vec<Violation>> {
    config.validate().map_err(|e| vec![Violation::from(e)])?;

    let mut violations = Vec::new();

    let mut division_hours: FxHashMap<(&str, u8, u8), u32> = FxHashMap::default();
    let mut room_hours: FxHashMap<(&str, u8, u8), u32> = FxHashMap::default();
    let mut faculty_hours: FxHashMap<(&str, u8, u8), u32> = FxHashMap::default();
    let mut teaching_load: FxHashMap<(&str, u8), u16> = FxHashMap::default();
    let mut breaks: FxHashMap<(&str, u8), u32> = FxHashMap::default();
    let mut teaching_days: FxHashMap<&str, u8> = FxHashMap::default();
    let mut joint_blocks = FxHashSet::default();
    let mut divisions: Vec<&str> = Vec::new();

    for session in sessions {
        let division = session.division.as_str();
        if !divisions.contains(&division) {
            divisions.push(division);
        }

        let Some(slot) = &session.slot else {
            violations.push(Violation::Unassigned(session.to_string()));
            continue;
        };
        if slot.day >= config.days_per_week || !config.fits_window(slot.start_hour, session.duration)
        {
            violations.push(Violation::OutsideWindow(session.to_string()));
            continue;
        }

        let hours = slot.start_hour..slot.start_hour + session.duration;
        for hour in hours.clone() {
            *division_hours.entry((division, slot.day, hour)).or_default() += 1;
        }

        if session.kind.is_break() {
            *breaks.entry((division, slot.day)).or_default() += 1;
            continue;
        }

        *teaching_load.entry((division, slot.day)).or_default() += u16::from(session.duration);
        *teaching_days.entry(division).or_default() |= 1 << slot.day;

        let (Some(room), Some(faculty)) = (slot.room.as_deref(), slot.faculty.as_deref()) else {
            violations.push(Violation::MissingResource(session.to_string()));
            continue;
        };
        let block = (
            session.subject.as_str(),
            session.kind,
            slot.day,
            slot.start_hour,
            session.duration,
            room,
            faculty,
        );
        if !joint_blocks.insert(block) {
            continue;
        }
        for hour in hours {
            *room_hours.entry((room, slot.day, hour)).or_default() += 1;
            *faculty_hours.entry((faculty, slot.day, hour)).or_default() += 1;
        }
    }

    for ((division, day, hour), count) in sorted(division_hours) {
        if count > 1 {
            violations.push(Violation::DivisionOverlap {
                division: division.to_string(),
                day,
                hour,
            });
        }
    }
    for ((room, day, hour), count) in sorted(room_hours) {
        if count > 1 {
            violations.push(Violation::RoomOverlap {
                room: room.to_string(),
                day,
                hour,
            });
        }
    }
    for ((faculty, day, hour), count) in sorted(faculty_hours) {
        if count > 1 {
            violations.push(Violation::FacultyOverlap {
                faculty: faculty.to_string(),
                day,
                hour,
            });
        }
    }
    for ((division, day), hours) in sorted(teaching_load) {
        if hours > u16::from(config.daily_load_ceiling) {
            violations.push(Violation::DailyLoadExceeded {
                division: division.to_string(),
                day,
                hours,
            });
        }
    }
    for ((division, day), count) in sorted(breaks) {
        if count > 1 {
            violations.push(Violation::DuplicateBreak {
                division: division.to_string(),
                day,
            });
        }
    }
    for division in divisions {
        let days = teaching_days.get(division).copied().unwrap_or(0).count_ones();
        if days < u32::from(config.min_teaching_days) {
            violations.push(Violation::InsufficientDays {
                division: division.to_string(),
                days,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn weekday_name(day: &u8) -> &'static str {
    day_name(*day)
}

fn clock(hour: &u8) -> String {
    format_hour(*hour)
}

fn sorted<K: Ord, V>(map: FxHashMap<K, V>) -> Vec<(K, V)> {
    let mut entries: Vec<(K, V)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
