//! Add and edit workflows.
//!
//! Both workflows run every check before touching the store, so a rejected record never
//! leaves a partial change behind.

use crate::constants::{MESSAGE_ADD_SUCCESS, MESSAGE_EDIT_SUCCESS};
use crate::record::Record;
use crate::store::RecordStore;
use crate::validation::validate;
use crate::{RecordError, RecordResult};

/// What a successful workflow reports back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessSummary {
    /// The record as stored.
    pub record: Record,
    /// Human-readable outcome, including the record's display form.
    pub message: String,
}

/// Admits `candidate` into `store`.
///
/// # Errors
///
/// - [`RecordError::DuplicateRecord`] if the store already holds the same client.
/// - [`RecordError::InvalidSchedule`] if the schedule rules reject the record; the violation
///   names the first broken rule.
pub fn add_record<S: RecordStore + ?Sized>(
    candidate: Record,
    store: &mut S,
) -> RecordResult<SuccessSummary> {
    if store.contains(&candidate) {
        tracing::warn!(record = %candidate.name(), "rejected duplicate record");
        return Err(RecordError::DuplicateRecord);
    }

    if let Err(err) = validate(&candidate).into_result() {
        tracing::warn!(record = %candidate.name(), error = %err, "rejected record schedule");
        return Err(err);
    }

    let message = format!("{}: {}", MESSAGE_ADD_SUCCESS, candidate);
    store.insert(candidate.clone());
    tracing::info!(record = %candidate.name(), "record added");

    Ok(SuccessSummary {
        record: candidate,
        message,
    })
}

/// Replaces `target` in `store` with `edited`.
///
/// # Errors
///
/// - [`RecordError::RecordNotFound`] if `target` is not stored.
/// - [`RecordError::DuplicateRecord`] if `edited` is a different client from `target` and that
///   client is already stored.
/// - [`RecordError::InvalidSchedule`] if the schedule rules reject `edited`.
pub fn edit_record<S: RecordStore + ?Sized>(
    target: &Record,
    edited: Record,
    store: &mut S,
) -> RecordResult<SuccessSummary> {
    if !store.iter().any(|stored| stored == target) {
        return Err(RecordError::RecordNotFound(target.name().to_string()));
    }

    if !target.is_same_record(&edited) && store.contains(&edited) {
        tracing::warn!(record = %edited.name(), "rejected edit onto existing record");
        return Err(RecordError::DuplicateRecord);
    }

    if let Err(err) = validate(&edited).into_result() {
        tracing::warn!(record = %edited.name(), error = %err, "rejected edited schedule");
        return Err(err);
    }

    let message = format!("{}: {}", MESSAGE_EDIT_SUCCESS, edited);
    if !store.replace(target, edited.clone()) {
        return Err(RecordError::RecordNotFound(target.name().to_string()));
    }
    tracing::info!(record = %edited.name(), "record edited");

    Ok(SuccessSummary {
        record: edited,
        message,
    })
}
