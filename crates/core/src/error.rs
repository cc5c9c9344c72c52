use crate::constants::{MESSAGE_INVALID_FREQUENCY_FOR_OCCURRENCE, MESSAGE_INVALID_VISIT_FOR_RECURRENCE};

/// Which cross-field schedule rule a record broke.
///
/// Variants are listed in the priority the validator checks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleViolation {
    /// A frequency or more than one occurrence was given without a next visit to anchor it.
    NoVisitForRecurrence,
    /// More than one occurrence was given without a frequency.
    NoFrequencyForMultipleOccurrence,
}

impl std::fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVisitForRecurrence => f.write_str(MESSAGE_INVALID_VISIT_FOR_RECURRENCE),
            Self::NoFrequencyForMultipleOccurrence => {
                f.write_str(MESSAGE_INVALID_FREQUENCY_FOR_OCCURRENCE)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("this record already exists in the visit book")]
    DuplicateRecord,
    #[error("invalid schedule: {0}")]
    InvalidSchedule(ScheduleViolation),
    #[error("visit date should be of the format yyyy-MM-dd HH:mm, got '{0}'")]
    UnparsableDate(String),
    #[error("invalid sort configuration: {0}")]
    SortConfiguration(String),
    #[error("no record named '{0}' in the visit book")]
    RecordNotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text field: {0}")]
    Text(#[from] visitbook_types::TextError),
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
