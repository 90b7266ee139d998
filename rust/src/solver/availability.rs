//! Occupancy bookkeeping for the backtracking search.
//!
//! Every (entity, day) pair owns one bitmask whose bit `i` stands for hour
//! `day_start_hour + i`. `commit` and `rollback` are exact inverses for any
//! placement that `is_free` accepted.

use crate::config::SolverConfig;
use crate::interner::NameId;

/// Hour bitmask for one entity on one day.
pub type HourMask = u32;

/// A session placement resolved to catalog indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Main division
    pub division: NameId,
    pub day: u8,
    pub start_hour: u8,
    pub duration: u8,
    pub room: Option<NameId>,
    pub faculty: Option<NameId>,
    /// Breaks touch only division occupancy, load and the break-day record
    pub is_break: bool,
}

/// Division, room and faculty occupancy plus per-division daily load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    day_start_hour: u8,
    days: usize,
    divisions: Vec<HourMask>,
    rooms: Vec<HourMask>,
    faculty: Vec<HourMask>,
    load: Vec<u16>,
    /// Per division, bit `d` set when day `d` already holds a break
    break_days: Vec<u8>,
}

impl Availability {
    pub fn new(
        division_count: usize,
        room_count: usize,
        faculty_count: usize,
        config: &SolverConfig,
    ) -> Self {
        let days = config.days_per_week as usize;
        Self {
            day_start_hour: config.day_start_hour,
            days,
            divisions: vec![0; division_count * days],
            rooms: vec![0; room_count * days],
            faculty: vec![0; faculty_count * days],
            load: vec![0; division_count * days],
            break_days: vec![0; division_count],
        }
    }

    #[inline]
    fn cell(&self, entity: NameId, day: u8) -> usize {
        entity as usize * self.days + day as usize
    }

    /// Mask covering `[start, start + duration)`.
    #[inline]
    fn block(&self, start_hour: u8, duration: u8) -> HourMask {
        let offset = u32::from(start_hour - self.day_start_hour);
        let bits = (1u64 << duration) - 1;
        (bits << offset) as HourMask
    }

    /// Whether the placement's division, room and faculty are all free for its full duration.
    pub fn is_free(&self, p: &Placement) -> bool {
        if !self.is_division_free(p) {
            return false;
        }
        let block = self.block(p.start_hour, p.duration);
        if let Some(room) = p.room {
            if self.rooms[self.cell(room, p.day)] & block != 0 {
                return false;
            }
        }
        if let Some(faculty) = p.faculty {
            if self.faculty[self.cell(faculty, p.day)] & block != 0 {
                return false;
            }
        }
        true
    }

    /// Whether the placement's division is free, ignoring room and faculty.
    pub fn is_division_free(&self, p: &Placement) -> bool {
        self.divisions[self.cell(p.division, p.day)] & self.block(p.start_hour, p.duration) == 0
    }

    /// Whether adding `duration` hours keeps the division within `ceiling` on `day`.
    #[inline]
    pub fn fits_load(&self, division: NameId, day: u8, duration: u8, ceiling: u8) -> bool {
        self.load[self.cell(division, day)] + u16::from(duration) <= u16::from(ceiling)
    }

    #[inline]
    pub fn has_break(&self, division: NameId, day: u8) -> bool {
        self.break_days[division as usize] & (1 << day) != 0
    }

    /// Apply a placement to the occupancy grids and load counters.
    pub fn commit(&mut self, p: &Placement) {
        let block = self.block(p.start_hour, p.duration);
        let cell = self.cell(p.division, p.day);
        self.divisions[cell] |= block;
        self.load[cell] += u16::from(p.duration);
        if p.is_break {
            self.break_days[p.division as usize] |= 1 << p.day;
            return;
        }
        if let Some(room) = p.room {
            let cell = self.cell(room, p.day);
            self.rooms[cell] |= block;
        }
        if let Some(faculty) = p.faculty {
            let cell = self.cell(faculty, p.day);
            self.faculty[cell] |= block;
        }
    }

    /// Undo a placement previously applied with [`commit`](Self::commit).
    pub fn rollback(&mut self, p: &Placement) {
        let block = self.block(p.start_hour, p.duration);
        let cell = self.cell(p.division, p.day);
        self.divisions[cell] &= !block;
        self.load[cell] -= u16::from(p.duration);
        if p.is_break {
            self.break_days[p.division as usize] &= !(1 << p.day);
            return;
        }
        if let Some(room) = p.room {
            let cell = self.cell(room, p.day);
            self.rooms[cell] &= !block;
        }
        if let Some(faculty) = p.faculty {
            let cell = self.cell(faculty, p.day);
            self.faculty[cell] &= !block;
        }
    }

    /// Scheduled hours (breaks included) for a division on a day.
    pub fn load(&self, division: NameId, day: u8) -> u16 {
        self.load[self.cell(division, day)]
    }

    pub fn division_mask(&self, division: NameId, day: u8) -> HourMask {
        self.divisions[self.cell(division, day)]
    }

    pub fn room_mask(&self, room: NameId, day: u8) -> HourMask {
        self.rooms[self.cell(room, day)]
    }

    pub fn faculty_mask(&self, faculty: NameId, day: u8) -> HourMask {
        self.faculty[self.cell(faculty, day)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(day: u8, start_hour: u8) -> Placement {
        Placement {
            division: 1,
            day,
            start_hour,
            duration: 2,
            room: Some(2),
            faculty: Some(0),
            is_break: false,
        }
    }

    fn brk(day: u8, start_hour: u8) -> Placement {
        Placement {
            division: 1,
            day,
            start_hour,
            duration: 1,
            room: None,
            faculty: None,
            is_break: true,
        }
    }

    #[test]
    fn test_commit_marks_all_grids() {
        let mut avail = Availability::new(2, 3, 2, &SolverConfig::default());
        avail.commit(&lab(2, 9));

        assert_eq!(avail.division_mask(1, 2), 0b110);
        assert_eq!(avail.room_mask(2, 2), 0b110);
        assert_eq!(avail.faculty_mask(0, 2), 0b110);
        assert_eq!(avail.load(1, 2), 2);
        assert_eq!(avail.division_mask(0, 2), 0);
        assert_eq!(avail.division_mask(1, 3), 0);
    }

    #[test]
    fn test_commit_then_rollback_is_exact() {
        let mut avail = Availability::new(2, 3, 2, &SolverConfig::default());
        avail.commit(&lab(0, 8));
        avail.commit(&brk(0, 11));
        let before = avail.clone();

        for p in [lab(0, 12), brk(3, 13), lab(4, 16)] {
            assert!(avail.is_free(&p));
            avail.commit(&p);
            assert_ne!(avail, before);
            avail.rollback(&p);
            assert_eq!(avail, before);
        }
    }

    #[test]
    fn test_overlap_detection() {
        let mut avail = Availability::new(2, 3, 2, &SolverConfig::default());
        avail.commit(&lab(1, 10));

        // Same division, overlapping hour
        assert!(!avail.is_free(&lab(1, 11)));
        // Adjacent block is fine
        assert!(avail.is_free(&lab(1, 12)));

        // Another division in the same room is blocked
        let other_div_same_room = Placement {
            division: 0,
            faculty: Some(1),
            ..lab(1, 11)
        };
        assert!(!avail.is_free(&other_div_same_room));

        // Another division with the same faculty in a different room is blocked
        let other_div_same_faculty = Placement {
            division: 0,
            room: Some(0),
            ..lab(1, 9)
        };
        assert!(!avail.is_free(&other_div_same_faculty));
    }

    #[test]
    fn test_break_touches_only_division_state() {
        let mut avail = Availability::new(2, 3, 2, &SolverConfig::default());
        avail.commit(&brk(2, 12));

        assert!(avail.has_break(1, 2));
        assert!(!avail.has_break(1, 1));
        assert!(!avail.has_break(0, 2));
        assert_eq!(avail.load(1, 2), 1);
        assert!((0..3).all(|r| avail.room_mask(r, 2) == 0));
        assert!((0..2).all(|f| avail.faculty_mask(f, 2) == 0));
    }

    #[test]
    fn test_load_ceiling() {
        let mut avail = Availability::new(2, 3, 2, &SolverConfig::default());
        avail.commit(&lab(0, 8));
        avail.commit(&lab(0, 10));
        avail.commit(&lab(0, 12));
        assert!(avail.fits_load(1, 0, 2, 8));
        assert!(!avail.fits_load(1, 0, 3, 8));
        assert!(avail.fits_load(1, 1, 8, 8));
    }
}
