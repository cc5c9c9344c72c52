//! Constants used throughout the visit book core crate.
//!
//! Date patterns and user-facing messages live here so the parser boundary, the validator and
//! the workflows agree on them.

/// Input pattern for visit dates (`yyyy-MM-dd HH:mm`).
pub const VISIT_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Exact length of a visit date written in [`VISIT_INPUT_FORMAT`].
pub const VISIT_INPUT_LEN: usize = 16;

/// Default chrono format used when displaying a visit.
pub const DEFAULT_DISPLAY_FORMAT: &str = "%a, %d %b %Y %H:%M";

/// Shown in place of an absent visit, frequency or occurrence.
pub const ABSENT_PLACEHOLDER: &str = "-";

pub const MESSAGE_ADD_SUCCESS: &str = "New record added";

pub const MESSAGE_EDIT_SUCCESS: &str = "Edited record";

pub const MESSAGE_INVALID_VISIT_FOR_RECURRENCE: &str =
    "visit required: next visit cannot be empty for a non-empty frequency or multiple occurrence";

pub const MESSAGE_INVALID_FREQUENCY_FOR_OCCURRENCE: &str =
    "frequency required: frequency cannot be empty for multiple occurrence";

pub const MESSAGE_INVALID_SORT_FLAG: &str =
    "exactly one of the last-visit or next-visit sort keys must be given";
