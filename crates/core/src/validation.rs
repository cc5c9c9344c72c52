//! Schedule validation.
//!
//! A candidate record's next visit, frequency and occurrence are checked together before the
//! record is admitted. The rules live in [`SCHEDULE_RULES`] and are evaluated in order; the
//! first broken rule decides the outcome, so a record with no next visit *and* several
//! occurrences without a frequency is reported as missing its visit.

use crate::error::ScheduleViolation;
use crate::recurrence::RecurrenceRule;
use crate::record::Record;
use crate::{RecordError, RecordResult};

/// Result of running the schedule rules over a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    RejectedNoVisitForRecurrence,
    RejectedNoFrequencyForMultipleOccurrence,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn violation(&self) -> Option<ScheduleViolation> {
        match self {
            Self::Accepted => None,
            Self::RejectedNoVisitForRecurrence => Some(ScheduleViolation::NoVisitForRecurrence),
            Self::RejectedNoFrequencyForMultipleOccurrence => {
                Some(ScheduleViolation::NoFrequencyForMultipleOccurrence)
            }
        }
    }

    /// Converts a rejection into [`RecordError::InvalidSchedule`].
    pub fn into_result(self) -> RecordResult<()> {
        match self.violation() {
            Some(violation) => Err(RecordError::InvalidSchedule(violation)),
            None => Ok(()),
        }
    }
}

impl From<Option<ScheduleViolation>> for ValidationOutcome {
    fn from(violation: Option<ScheduleViolation>) -> Self {
        match violation {
            None => Self::Accepted,
            Some(ScheduleViolation::NoVisitForRecurrence) => Self::RejectedNoVisitForRecurrence,
            Some(ScheduleViolation::NoFrequencyForMultipleOccurrence) => {
                Self::RejectedNoFrequencyForMultipleOccurrence
            }
        }
    }
}

/// One cross-field rule: the violation it reports and the predicate that detects it.
pub struct ScheduleRule {
    violation: ScheduleViolation,
    is_broken: fn(has_next_visit: bool, recurrence: &RecurrenceRule) -> bool,
}

impl ScheduleRule {
    pub fn violation(&self) -> ScheduleViolation {
        self.violation
    }

    pub fn is_broken(&self, has_next_visit: bool, recurrence: &RecurrenceRule) -> bool {
        (self.is_broken)(has_next_visit, recurrence)
    }
}

/// Schedule rules in priority order.
pub const SCHEDULE_RULES: [ScheduleRule; 2] = [
    // Without a next visit there is nothing to repeat from.
    ScheduleRule {
        violation: ScheduleViolation::NoVisitForRecurrence,
        is_broken: |has_next_visit, recurrence| !has_next_visit && recurrence.is_recurring(),
    },
    ScheduleRule {
        violation: ScheduleViolation::NoFrequencyForMultipleOccurrence,
        is_broken: |_, recurrence| {
            recurrence.occurrence().is_more_than(1) && recurrence.frequency().is_empty()
        },
    },
];

/// The first rule in [`SCHEDULE_RULES`] that `recurrence` breaks, if any.
pub(crate) fn first_violation(
    has_next_visit: bool,
    recurrence: &RecurrenceRule,
) -> Option<ScheduleViolation> {
    SCHEDULE_RULES
        .iter()
        .find(|rule| rule.is_broken(has_next_visit, recurrence))
        .map(ScheduleRule::violation)
}

/// Runs the schedule rules over `record`.
pub fn validate(record: &Record) -> ValidationOutcome {
    let outcome = ValidationOutcome::from(first_violation(
        record.next_visit().is_present(),
        &record.recurrence(),
    ));
    tracing::debug!(record = %record.name(), ?outcome, "schedule validated");
    outcome
}
