//! Recurring visit schedules.
//!
//! A [`RecurrenceRule`] pairs a [`Frequency`] (how far apart visits are) with an [`Occurrence`]
//! (how many visits are planned). Both carry an explicit "nothing given" state:
//! [`Frequency::Empty`] and [`Occurrence::Unset`]. `Occurrence::Unset` is distinct from
//! `Occurrence::Count(0)`.
//!
//! Accepted frequency text (case-insensitive):
//! - blank or `-` for no frequency
//! - `daily`, `weekly`, `fortnightly` / `biweekly`, `monthly`, `yearly` / `annually`
//! - `<n> <unit>` where unit is `day`, `week`, `month` or `year`, optionally plural (`2 weeks`)

use crate::constants::ABSENT_PLACEHOLDER;
use crate::error::ScheduleViolation;
use crate::validation;
use crate::{RecordError, RecordResult};
use chrono::{Duration, Months, NaiveDateTime};
use std::fmt;

/// Calendar unit of a visit interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
    Year,
}

impl FrequencyUnit {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "day" | "days" => Some(Self::Day),
            "week" | "weeks" => Some(Self::Week),
            "month" | "months" => Some(Self::Month),
            "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// A positive number of calendar units between two visits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    amount: u32,
    unit: FrequencyUnit,
}

impl Interval {
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if `amount` is zero.
    pub fn new(amount: u32, unit: FrequencyUnit) -> RecordResult<Self> {
        if amount == 0 {
            return Err(RecordError::InvalidInput(
                "frequency interval must be at least 1".into(),
            ));
        }
        Ok(Self { amount, unit })
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Steps `from` forward by one interval. Months and years clamp to the last day of the
    /// target month. Returns `None` if the result is out of range.
    pub fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            FrequencyUnit::Day => from.checked_add_signed(Duration::days(self.amount.into())),
            FrequencyUnit::Week => from.checked_add_signed(Duration::weeks(self.amount.into())),
            FrequencyUnit::Month => from.checked_add_months(Months::new(self.amount)),
            FrequencyUnit::Year => self
                .amount
                .checked_mul(12)
                .and_then(|months| from.checked_add_months(Months::new(months))),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount, self.unit) {
            (1, FrequencyUnit::Day) => f.write_str("daily"),
            (1, FrequencyUnit::Week) => f.write_str("weekly"),
            (1, FrequencyUnit::Month) => f.write_str("monthly"),
            (1, FrequencyUnit::Year) => f.write_str("yearly"),
            (amount, unit) => write!(f, "{} {}s", amount, unit.name()),
        }
    }
}

/// How often a recurring visit repeats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// No interval given.
    #[default]
    Empty,
    Every(Interval),
}

impl Frequency {
    /// Parses frequency text as described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] for unrecognised text or a zero interval.
    pub fn parse(input: &str) -> RecordResult<Self> {
        let normalised = input.trim().to_ascii_lowercase();
        let interval = |amount, unit| Interval::new(amount, unit).map(Self::Every);

        match normalised.as_str() {
            "" | ABSENT_PLACEHOLDER => return Ok(Self::Empty),
            "daily" => return interval(1, FrequencyUnit::Day),
            "weekly" => return interval(1, FrequencyUnit::Week),
            "fortnightly" | "biweekly" => return interval(2, FrequencyUnit::Week),
            "monthly" => return interval(1, FrequencyUnit::Month),
            "yearly" | "annually" => return interval(1, FrequencyUnit::Year),
            _ => {}
        }

        let mut parts = normalised.split_whitespace();
        let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid_frequency(input));
        };
        let amount: u32 = amount.parse().map_err(|_| invalid_frequency(input))?;
        let unit = FrequencyUnit::parse(unit).ok_or_else(|| invalid_frequency(input))?;
        interval(amount, unit)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn interval(&self) -> Option<Interval> {
        match self {
            Self::Empty => None,
            Self::Every(interval) => Some(*interval),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(ABSENT_PLACEHOLDER),
            Self::Every(interval) => interval.fmt(f),
        }
    }
}

fn invalid_frequency(input: &str) -> RecordError {
    RecordError::InvalidInput(format!(
        "frequency '{}' should be daily, weekly, fortnightly, monthly, yearly or '<n> <days|weeks|months|years>'",
        input.trim()
    ))
}

/// How many visits a recurring schedule covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occurrence {
    /// No count given.
    #[default]
    Unset,
    Count(u32),
}

impl Occurrence {
    /// Parses a non-negative count. Blank input or `-` yields [`Occurrence::Unset`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if the text is not a non-negative integer.
    pub fn parse(input: &str) -> RecordResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == ABSENT_PLACEHOLDER {
            return Ok(Self::Unset);
        }
        let invalid = || {
            RecordError::InvalidInput(format!(
                "occurrence '{}' should be a non-negative integer",
                trimmed
            ))
        };
        if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        trimmed.parse::<u32>().map(Self::Count).map_err(|_| invalid())
    }

    /// True iff a count is set and exceeds `n`. Unset is never more than anything.
    pub fn is_more_than(&self, n: u32) -> bool {
        matches!(self, Self::Count(count) if *count > n)
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Unset => None,
            Self::Count(count) => Some(*count),
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str(ABSENT_PLACEHOLDER),
            Self::Count(count) => write!(f, "{}", count),
        }
    }
}

/// A frequency and occurrence considered together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    frequency: Frequency,
    occurrence: Occurrence,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, occurrence: Occurrence) -> Self {
        Self {
            frequency,
            occurrence,
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn occurrence(&self) -> Occurrence {
        self.occurrence
    }

    /// Whether the rule describes anything beyond a single visit.
    pub fn is_recurring(&self) -> bool {
        self.occurrence.is_more_than(1) || !self.frequency.is_empty()
    }

    /// Checks the rule against whether the record has a next visit to anchor it.
    ///
    /// Runs the same ordered rules as [`crate::validation::validate`], so a rule broken both
    /// ways reports the missing visit first.
    pub fn is_consistent_with(&self, has_next_visit: bool) -> Result<(), ScheduleViolation> {
        match validation::first_violation(has_next_visit, self) {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Planned visit instants starting at `anchor`.
    ///
    /// Yields `max(count, 1)` instants one interval apart, or just `anchor` when there is no
    /// frequency. The series is produced lazily and stops early if stepping leaves chrono's
    /// representable range.
    pub fn visit_dates(&self, anchor: NaiveDateTime) -> impl Iterator<Item = NaiveDateTime> {
        let interval = self.frequency.interval();
        let total = match interval {
            Some(_) => self.occurrence.count().unwrap_or(1).max(1),
            None => 1,
        };

        std::iter::successors(Some(anchor), move |date| {
            interval.and_then(|interval| interval.advance(*date))
        })
        .take(usize::try_from(total).unwrap_or(usize::MAX))
    }
}
