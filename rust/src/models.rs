//! Core data types for the timetable engine.

use chrono::{NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

/// What kind of session a [`Session`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Lecture,
    Lab,
    Tutorial,
    Break,
}

impl SessionKind {
    /// Duration in hours used when a course does not override it.
    pub fn default_duration(self) -> u8 {
        match self {
            SessionKind::Lab => 2,
            SessionKind::Lecture | SessionKind::Tutorial | SessionKind::Break => 1,
        }
    }

    /// Position in the search order; lower ranks are placed first.
    ///
    /// Breaks and labs have the tightest windows, so they go while the grid is emptiest.
    pub fn search_rank(self) -> u8 {
        match self {
            SessionKind::Break => 0,
            SessionKind::Lab => 1,
            SessionKind::Tutorial => 2,
            SessionKind::Lecture => 3,
        }
    }

    pub fn is_break(self) -> bool {
        self == SessionKind::Break
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Lecture => "Lecture",
            SessionKind::Lab => "Lab",
            SessionKind::Tutorial => "Tutorial",
            SessionKind::Break => "Break",
        }
    }

    /// Marker shown next to the subject in a rendered grid cell.
    pub fn grid_marker(self) -> &'static str {
        match self {
            SessionKind::Lecture => "(L)",
            SessionKind::Lab => "(Lab)",
            SessionKind::Tutorial => "(T)",
            SessionKind::Break => "",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown session kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown session kind: {0}")]
pub struct ParseSessionKindError(pub String);

impl FromStr for SessionKind {
    type Err = ParseSessionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lecture" => Ok(SessionKind::Lecture),
            "lab" => Ok(SessionKind::Lab),
            "tutorial" => Ok(SessionKind::Tutorial),
            "break" => Ok(SessionKind::Break),
            _ => Err(ParseSessionKindError(s.to_string())),
        }
    }
}

/// A concrete placement of a session in the week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Day index, 0 = Monday
    pub day: u8,
    /// Start hour on a 24h clock
    pub start_hour: u8,
    /// Room, absent for breaks
    pub room: Option<String>,
    /// Faculty member, absent for breaks
    pub faculty: Option<String>,
}

impl Slot {
    /// A slot with no room or faculty (the shape of a break).
    pub fn new(day: u8, start_hour: u8) -> Self {
        Self {
            day,
            start_hour,
            room: None,
            faculty: None,
        }
    }

    /// A teaching slot in `room` taught by `faculty`.
    pub fn teaching(day: u8, start_hour: u8, room: &str, faculty: &str) -> Self {
        Self {
            day,
            start_hour,
            room: Some(room.to_string()),
            faculty: Some(faculty.to_string()),
        }
    }
}

/// One schedulable unit: a lecture, lab, tutorial or break for a division.
///
/// A session that arrives with `slot` already set is pinned and never moved by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Main division label, e.g. "A"
    pub division: String,
    /// Sub-batch label for split labs/tutorials, e.g. "1" for group A1
    pub sub_batch: Option<String>,
    /// Subject code ("BREAK" for breaks)
    pub subject: String,
    pub kind: SessionKind,
    /// Duration in whole hours
    pub duration: u8,
    /// Assignment, `None` while unassigned
    pub slot: Option<Slot>,
}

impl Session {
    pub fn new(division: &str, subject: &str, kind: SessionKind, duration: u8) -> Self {
        Self {
            division: division.to_string(),
            sub_batch: None,
            subject: subject.to_string(),
            kind,
            duration,
            slot: None,
        }
    }

    /// The one-hour break a division takes each day.
    pub fn break_for(division: &str) -> Self {
        Self::new(
            division,
            "BREAK",
            SessionKind::Break,
            SessionKind::Break.default_duration(),
        )
    }

    /// Attach this session to a sub-batch of its division.
    pub fn in_sub_batch(mut self, sub_batch: &str) -> Self {
        self.sub_batch = Some(sub_batch.to_string());
        self
    }

    /// Fix this session to `slot`.
    pub fn pinned(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Display label of the group attending: division plus sub-batch ("A1"), or just "A".
    pub fn group_label(&self) -> String {
        match &self.sub_batch {
            Some(sb) => format!("{}{}", self.division, sb),
            None => self.division.clone(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.slot.is_some()
    }

    /// Hours `[start, end)` occupied, if assigned.
    pub fn hours(&self) -> Option<std::ops::Range<u8>> {
        self.slot
            .as_ref()
            .map(|s| s.start_hour..s.start_hour.saturating_add(self.duration))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(slot) = &self.slot else {
            return write!(
                f,
                "(unassigned) {} {} on Div {}",
                self.subject,
                self.kind,
                self.group_label()
            );
        };
        let end = slot.start_hour.saturating_add(self.duration);
        if self.kind.is_break() {
            return write!(
                f,
                "{} {}-{} BREAK for Div {}",
                day_name(slot.day),
                format_hour(slot.start_hour),
                format_hour(end),
                self.group_label()
            );
        }
        write!(
            f,
            "{} {}-{} {} {} @ {} by {} on Div {}",
            day_name(slot.day),
            format_hour(slot.start_hour),
            format_hour(end),
            self.subject,
            self.kind,
            slot.room.as_deref().unwrap_or("?"),
            slot.faculty.as_deref().unwrap_or("?"),
            self.group_label()
        )
    }
}

/// Weekday for a day index (0 = Monday).
pub fn weekday(day: u8) -> Option<Weekday> {
    Weekday::try_from(day).ok()
}

/// Full English name of a day index.
pub fn day_name(day: u8) -> &'static str {
    match weekday(day) {
        Some(Weekday::Mon) => "Monday",
        Some(Weekday::Tue) => "Tuesday",
        Some(Weekday::Wed) => "Wednesday",
        Some(Weekday::Thu) => "Thursday",
        Some(Weekday::Fri) => "Friday",
        Some(Weekday::Sat) => "Saturday",
        Some(Weekday::Sun) => "Sunday",
        None => "Unknown",
    }
}

/// Format a whole hour as "HH:00".
pub fn format_hour(hour: u8) -> String {
    match NaiveTime::from_hms_opt(u32::from(hour), 0, 0) {
        Some(t) => t.format("%H:%M").to_string(),
        // 24:00 closes the day but is not a valid NaiveTime
        None => format!("{:02}:00", hour),
    }
}
