//! # Visitbook Core
//!
//! Core scheduling logic for the visit book client record system.
//!
//! This crate contains pure, in-memory operations:
//! - Visit dates with a total ordering that places missing dates last
//! - Recurring schedules (frequency × occurrence) and the rules tying them to a next visit
//! - Ordered schedule validation applied before a record is admitted
//! - Add and edit workflows over any [`RecordStore`]
//! - Sorting records by last or next visit
//!
//! **No I/O concerns**: command-line parsing and persistence belong in `visitbook-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod ordering;
pub mod record;
pub mod recurrence;
pub mod store;
pub mod validation;
pub mod visit;
pub mod workflow;

pub use config::CoreConfig;
pub use error::{RecordError, RecordResult, ScheduleViolation};
pub use ordering::{
    comparator_for, overdue_records, sort_records, sorted_view, RecordComparator, SortKey,
};
pub use record::{Record, RecordFields, RecordInput};
pub use recurrence::{Frequency, FrequencyUnit, Interval, Occurrence, RecurrenceRule};
pub use store::{InMemoryRecordStore, RecordStore};
pub use validation::{validate, ValidationOutcome};
pub use visit::Visit;
pub use workflow::{add_record, edit_record, SuccessSummary};

// Re-export the text primitives records are built from.
pub use visitbook_types::{NonEmptyText, PhoneNumber, TextError};
