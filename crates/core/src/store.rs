//! # Record store abstraction
//!
//! The core never owns persistence. Workflows talk to whatever holds the records through
//! [`RecordStore`]; [`InMemoryRecordStore`] is the reference implementation and is what
//! file-backed stores wrap.

use crate::record::Record;

/// Interface the workflows need from a record collection.
pub trait RecordStore {
    /// True if a record that is the same client as `record` is already stored.
    fn contains(&self, record: &Record) -> bool;

    /// Appends `record`. Callers check [`RecordStore::contains`] first.
    fn insert(&mut self, record: Record);

    /// Replaces the stored record equal to `target` with `edited`, keeping its position.
    /// Returns false if `target` is not stored.
    fn replace(&mut self, target: &Record, edited: Record) -> bool;

    /// All stored records in insertion order.
    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_>;

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `Vec`-backed store using [`Record::is_same_record`] as its equality predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryRecordStore {
    records: Vec<Record>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Looks a record up by its name.
    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.name().as_str() == name)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl From<Vec<Record>> for InMemoryRecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn contains(&self, record: &Record) -> bool {
        self.records.iter().any(|stored| stored.is_same_record(record))
    }

    fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    fn replace(&mut self, target: &Record, edited: Record) -> bool {
        match self.records.iter_mut().find(|stored| **stored == *target) {
            Some(slot) => {
                *slot = edited;
                true
            }
            None => false,
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(self.records.iter())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;

    #[test]
    fn contains_uses_same_record_predicate() {
        let mut store = InMemoryRecordStore::new();
        store.insert(record("Alex Yeoh", "", "", "", ""));

        assert!(store.contains(&record("Alex Yeoh", "2020-01-01 00:00", "", "", "")));
        assert!(!store.contains(&record("Bernice Yu", "", "", "", "")));
    }

    #[test]
    fn replace_keeps_position() {
        let alex = record("Alex Yeoh", "", "", "", "");
        let bernice = record("Bernice Yu", "", "", "", "");
        let mut store = InMemoryRecordStore::from(vec![alex.clone(), bernice.clone()]);

        let edited = record("Alex Yeoh", "2021-01-01 00:00", "", "", "");
        assert!(store.replace(&alex, edited.clone()));
        assert_eq!(store.records(), &[edited, bernice]);
    }

    #[test]
    fn replace_missing_target_is_noop() {
        let mut store = InMemoryRecordStore::from(vec![record("Alex Yeoh", "", "", "", "")]);
        let before = store.clone();
        assert!(!store.replace(
            &record("Charlotte Oliveiro", "", "", "", ""),
            record("Charlotte Oliveiro", "2021-01-01 00:00", "", "", ""),
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn find_by_name_and_len() {
        let store = InMemoryRecordStore::from(vec![
            record("Alex Yeoh", "", "", "", ""),
            record("Bernice Yu", "", "", "", ""),
        ]);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert!(store.find_by_name("Bernice Yu").is_some());
        assert!(store.find_by_name("bernice yu").is_none());
    }
}
