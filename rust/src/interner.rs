//! Name interning for rooms, faculty and divisions.
//!
//! The catalog keeps one [`NameIndex`] per entity kind, so a [`NameId`] is
//! only meaningful together with its kind: room 0 and faculty 0 are unrelated.
//! Ids are dense from zero, which lets the availability grids store each kind
//! as a flat `entity * days + day` vector. A room listed under several usage
//! classes (e.g. Room104 as both lecture and tutorial room) is interned once
//! and therefore shares a single occupancy row.

use rustc_hash::FxHashMap;

/// Dense index of an interned name.
pub type NameId = u32;

/// Bidirectional map between names and dense indices, in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    ids: FxHashMap<String, NameId>,
    names: Vec<String>,
}

impl NameIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Insert a name, returning its index. Re-inserting returns the existing index.
    pub fn insert(&mut self, name: &str) -> NameId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as NameId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<NameId> {
        self.ids.get(name).copied()
    }

    #[inline]
    pub fn name(&self, id: NameId) -> Option<&str> {
        self.names.get(id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

impl<'a> FromIterator<&'a str> for NameIndex {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut index = NameIndex::default();
        for name in iter {
            index.insert(name);
        }
        index
    }
}
