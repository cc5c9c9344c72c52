//! Record ordering for display.
//!
//! Records are sorted by exactly one visit field, chosen with [`SortKey`]. Sorting uses
//! [`Visit::compare`](crate::visit::Visit::compare), so records without a date (or with an
//! unreadable one) come last, and it is stable: records with equal keys keep their order.

use crate::constants::MESSAGE_INVALID_SORT_FLAG;
use crate::record::Record;
use crate::store::RecordStore;
use crate::{RecordError, RecordResult};
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Comparator over records.
pub type RecordComparator = fn(&Record, &Record) -> Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    ByLastVisit,
    ByNextVisit,
}

impl SortKey {
    /// Resolves the caller's flags into a key.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::SortConfiguration`] if both or neither flags are set.
    pub fn from_flags(by_last_visit: bool, by_next_visit: bool) -> RecordResult<Self> {
        match (by_last_visit, by_next_visit) {
            (true, false) => Ok(Self::ByLastVisit),
            (false, true) => Ok(Self::ByNextVisit),
            _ => Err(RecordError::SortConfiguration(
                MESSAGE_INVALID_SORT_FLAG.into(),
            )),
        }
    }
}

fn by_last_visit(a: &Record, b: &Record) -> Ordering {
    a.last_visit().compare(b.last_visit())
}

fn by_next_visit(a: &Record, b: &Record) -> Ordering {
    a.next_visit().compare(b.next_visit())
}

pub fn comparator_for(key: SortKey) -> RecordComparator {
    match key {
        SortKey::ByLastVisit => by_last_visit,
        SortKey::ByNextVisit => by_next_visit,
    }
}

/// Stable in-place sort of `records` by `key`, ascending.
pub fn sort_records(records: &mut [Record], key: SortKey) {
    tracing::debug!(?key, count = records.len(), "sorting records");
    records.sort_by(comparator_for(key));
}

/// A sorted copy of everything in `store`. The store itself is untouched.
pub fn sorted_view<S: RecordStore + ?Sized>(store: &S, key: SortKey) -> Vec<Record> {
    let mut records: Vec<Record> = store.iter().cloned().collect();
    sort_records(&mut records, key);
    records
}

/// Records whose next visit is overdue at `now`, soonest first.
pub fn overdue_records<S: RecordStore + ?Sized>(store: &S, now: NaiveDateTime) -> Vec<Record> {
    let mut records: Vec<Record> = store
        .iter()
        .filter(|record| record.next_visit().is_overdue(now))
        .cloned()
        .collect();
    sort_records(&mut records, SortKey::ByNextVisit);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;
    use crate::store::InMemoryRecordStore;
    use chrono::NaiveDate;

    fn last_visits(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.last_visit().as_str()).collect()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name().as_str()).collect()
    }

    #[test]
    fn from_flags_requires_exactly_one_key() {
        assert_eq!(SortKey::from_flags(true, false).expect("last"), SortKey::ByLastVisit);
        assert_eq!(SortKey::from_flags(false, true).expect("next"), SortKey::ByNextVisit);

        for (last, next) in [(true, true), (false, false)] {
            let err = SortKey::from_flags(last, next).expect_err("should reject");
            assert!(matches!(err, RecordError::SortConfiguration(_)));
        }
    }

    #[test]
    fn sorts_by_last_visit_with_absent_last() {
        let mut records = vec![
            record("A", "", "", "", ""),
            record("B", "2021-01-01 00:00", "", "", ""),
            record("C", "2020-01-01 00:00", "", "", ""),
        ];
        sort_records(&mut records, SortKey::ByLastVisit);
        assert_eq!(
            last_visits(&records),
            vec!["2020-01-01 00:00", "2021-01-01 00:00", ""]
        );
    }

    #[test]
    fn sorts_by_next_visit() {
        let mut records = vec![
            record("A", "2019-01-01 00:00", "2022-05-01 09:00", "", ""),
            record("B", "", "not a date", "", ""),
            record("C", "2018-01-01 00:00", "2021-05-01 09:00", "", ""),
        ];
        sort_records(&mut records, SortKey::ByNextVisit);
        assert_eq!(names(&records), vec!["C", "A", "B"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut records = vec![
            record("A", "", "", "", ""),
            record("B", "2021-01-01 00:00", "", "", ""),
            record("C", "junk", "", "", ""),
            record("D", "2021-01-01 00:00", "", "", ""),
            record("E", "", "", "", ""),
        ];
        sort_records(&mut records, SortKey::ByLastVisit);
        assert_eq!(names(&records), vec!["B", "D", "A", "C", "E"]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut records = vec![
            record("A", "2021-06-01 00:00", "", "", ""),
            record("B", "", "", "", ""),
            record("C", "2020-06-01 00:00", "", "", ""),
            record("D", "2021-06-01 00:00", "", "", ""),
        ];
        sort_records(&mut records, SortKey::ByLastVisit);
        let once = records.clone();
        sort_records(&mut records, SortKey::ByLastVisit);
        assert_eq!(records, once);
    }

    #[test]
    fn sorted_view_leaves_store_untouched() {
        let store = InMemoryRecordStore::from(vec![
            record("A", "2021-01-01 00:00", "", "", ""),
            record("B", "2020-01-01 00:00", "", "", ""),
        ]);
        let view = sorted_view(&store, SortKey::ByLastVisit);
        assert_eq!(names(&view), vec!["B", "A"]);
        assert_eq!(names(store.records()), vec!["A", "B"]);
    }

    #[test]
    fn overdue_records_filters_and_orders() {
        let now = NaiveDate::from_ymd_opt(2021, 12, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let store = InMemoryRecordStore::from(vec![
            record("A", "", "2021-11-30 18:30", "", ""),
            record("B", "", "2022-01-01 09:00", "", ""),
            record("C", "", "", "", ""),
            record("D", "", "2021-06-01 08:00", "", ""),
            record("E", "", "garbage", "", ""),
        ]);
        assert_eq!(names(&overdue_records(&store, now)), vec!["D", "A"]);
    }
}
