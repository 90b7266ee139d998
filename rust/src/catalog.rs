//! Immutable resource catalogs: rooms by usage class, faculty by subject, divisions.

use rustc_hash::FxHashMap;

use crate::interner::{NameId, NameIndex};
use crate::models::SessionKind;

/// Resource catalogs consumed by the solver.
///
/// Room and faculty names are interned once at build time; candidate lists keep
/// the order in which they were supplied, which is the order the search tries them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rooms: NameIndex,
    lecture_rooms: Vec<NameId>,
    tutorial_rooms: Vec<NameId>,
    lab_rooms: Vec<NameId>,
    faculty: NameIndex,
    faculty_by_subject: FxHashMap<String, Vec<NameId>>,
    divisions: NameIndex,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Rooms usable by a session of `kind`, in trial order. Breaks use no room.
    pub fn rooms_for(&self, kind: SessionKind) -> &[NameId] {
        match kind {
            SessionKind::Lecture => &self.lecture_rooms,
            SessionKind::Tutorial => &self.tutorial_rooms,
            SessionKind::Lab => &self.lab_rooms,
            SessionKind::Break => &[],
        }
    }

    /// Faculty eligible for `subject`, in trial order. Unknown subjects have none.
    pub fn eligible_faculty(&self, subject: &str) -> &[NameId] {
        self.faculty_by_subject
            .get(subject)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn room_id(&self, name: &str) -> Option<NameId> {
        self.rooms.get(name)
    }

    pub fn room_name(&self, id: NameId) -> Option<&str> {
        self.rooms.name(id)
    }

    pub fn faculty_id(&self, name: &str) -> Option<NameId> {
        self.faculty.get(name)
    }

    pub fn faculty_name(&self, id: NameId) -> Option<&str> {
        self.faculty.name(id)
    }

    pub fn division_id(&self, name: &str) -> Option<NameId> {
        self.divisions.get(name)
    }

    pub fn division_name(&self, id: NameId) -> Option<&str> {
        self.divisions.name(id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn faculty_count(&self) -> usize {
        self.faculty.len()
    }

    pub fn division_count(&self) -> usize {
        self.divisions.len()
    }

    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.divisions.names()
    }
}

/// Collects catalog entries before interning them into a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    lecture_rooms: Vec<String>,
    tutorial_rooms: Vec<String>,
    lab_rooms: Vec<String>,
    subjects: Vec<(String, Vec<String>)>,
    divisions: Vec<String>,
}

fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}

impl CatalogBuilder {
    pub fn lecture_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lecture_rooms = owned(rooms);
        self
    }

    pub fn tutorial_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tutorial_rooms = owned(rooms);
        self
    }

    pub fn lab_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lab_rooms = owned(rooms);
        self
    }

    /// Register `subject` with its eligible faculty. A later call for the same subject replaces it.
    pub fn subject<I, S>(mut self, subject: &str, faculty: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let faculty = owned(faculty);
        match self.subjects.iter_mut().find(|(s, _)| s == subject) {
            Some(entry) => entry.1 = faculty,
            None => self.subjects.push((subject.to_string(), faculty)),
        }
        self
    }

    pub fn divisions<I, S>(mut self, divisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.divisions = owned(divisions);
        self
    }

    pub fn build(self) -> Catalog {
        // Rooms shared between usage classes get a single index
        let mut rooms = NameIndex::with_capacity(
            self.lecture_rooms.len() + self.tutorial_rooms.len() + self.lab_rooms.len(),
        );
        let mut intern_all = |names: &[String]| -> Vec<NameId> {
            names.iter().map(|n| rooms.insert(n)).collect()
        };
        let lecture_rooms = intern_all(&self.lecture_rooms);
        let tutorial_rooms = intern_all(&self.tutorial_rooms);
        let lab_rooms = intern_all(&self.lab_rooms);

        let mut faculty = NameIndex::default();
        let mut faculty_by_subject = FxHashMap::default();
        for (subject, names) in &self.subjects {
            let ids: Vec<NameId> = names.iter().map(|n| faculty.insert(n)).collect();
            faculty_by_subject.insert(subject.clone(), ids);
        }

        let divisions = self.divisions.iter().map(|d| d.as_str()).collect();

        Catalog {
            rooms,
            lecture_rooms,
            tutorial_rooms,
            lab_rooms,
            faculty,
            faculty_by_subject,
            divisions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::builder()
            .lecture_rooms(["Room101", "Room104"])
            .tutorial_rooms(["Room214", "Room104"])
            .lab_rooms(["105Lab"])
            .subject("CN", ["NNS", "VAMI"])
            .subject("AI", ["LAB"])
            .subject("SMSS", ["LAB", "VKK"])
            .divisions(["A", "B"])
            .build()
    }

    #[test]
    fn test_shared_room_has_one_index() {
        let catalog = sample();
        assert_eq!(catalog.room_count(), 4);
        let r104 = catalog.room_id("Room104").unwrap();
        assert!(catalog.rooms_for(SessionKind::Lecture).contains(&r104));
        assert!(catalog.rooms_for(SessionKind::Tutorial).contains(&r104));
        assert!(catalog.rooms_for(SessionKind::Break).is_empty());
    }

    #[test]
    fn test_faculty_order_and_sharing() {
        let catalog = sample();
        // LAB teaches two subjects but is one faculty member
        assert_eq!(catalog.faculty_count(), 4);
        let names: Vec<&str> = catalog
            .eligible_faculty("SMSS")
            .iter()
            .filter_map(|&id| catalog.faculty_name(id))
            .collect();
        assert_eq!(names, vec!["LAB", "VKK"]);
        assert!(catalog.eligible_faculty("BIDA").is_empty());
    }

    #[test]
    fn test_subject_replacement() {
        let catalog = Catalog::builder()
            .subject("CN", ["NNS", "VAMI"])
            .subject("CN", Vec::<String>::new())
            .build();
        assert!(catalog.eligible_faculty("CN").is_empty());
    }

    #[test]
    fn test_divisions() {
        let catalog = sample();
        assert_eq!(catalog.division_count(), 2);
        assert_eq!(catalog.division_id("B"), Some(1));
        assert_eq!(catalog.division_name(0), Some("A"));
        assert_eq!(catalog.divisions().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
