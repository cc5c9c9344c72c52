//! Visit dates.
//!
//! A [`Visit`] wraps the raw `yyyy-MM-dd HH:mm` text of a last or next visit. The text may be
//! empty, meaning the record has no such visit.
//!
//! Ordering is total: absent or unparsable visits resolve to [`NaiveDateTime::MAX`] so they sort
//! after every real date, and they are never overdue. Strict format checking belongs to the
//! parsing boundary ([`Visit::parse`]); [`Visit::new`] accepts any text so values read back from
//! a store never fail to load.

use crate::constants::{ABSENT_PLACEHOLDER, VISIT_INPUT_FORMAT, VISIT_INPUT_LEN};
use crate::{RecordError, RecordResult};
use chrono::{Local, NaiveDateTime};
use std::cmp::Ordering;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Visit {
    value: String,
}

impl Visit {
    /// Wraps `text` without checking its format.
    pub fn new(text: impl Into<String>) -> Self {
        Self { value: text.into() }
    }

    /// A visit with no date.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Parses user input at the parsing boundary.
    ///
    /// Blank input yields an absent visit. Anything else must match `yyyy-MM-dd HH:mm` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnparsableDate`] if the trimmed input is non-empty and is not a
    /// valid visit date.
    pub fn parse(input: &str) -> RecordResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::absent());
        }
        if !Self::is_valid_visit(trimmed) {
            return Err(RecordError::UnparsableDate(trimmed.to_string()));
        }
        Ok(Self::new(trimmed))
    }

    /// Renders `date_time` in the canonical input format.
    pub fn from_date_time(date_time: NaiveDateTime) -> Self {
        Self::new(date_time.format(VISIT_INPUT_FORMAT).to_string())
    }

    /// Returns true if `text` is a zero-padded `yyyy-MM-dd HH:mm` date that exists.
    pub fn is_valid_visit(text: &str) -> bool {
        // chrono accepts signs, unpadded fields and extra spaces, so the parsed value must
        // render back to exactly the same text.
        text.len() == VISIT_INPUT_LEN
            && parse_input(text)
                .is_some_and(|date_time| date_time.format(VISIT_INPUT_FORMAT).to_string() == text)
    }

    pub fn is_present(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The parsed instant, or `None` when absent or malformed.
    pub fn try_date_time(&self) -> Option<NaiveDateTime> {
        if !self.is_present() {
            return None;
        }
        parse_input(&self.value)
    }

    /// The parsed instant, with absent and malformed visits mapped to [`NaiveDateTime::MAX`].
    pub fn date_time(&self) -> NaiveDateTime {
        self.try_date_time().unwrap_or(NaiveDateTime::MAX)
    }

    /// True iff the visit is present, parsable and strictly before `now`.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match self.try_date_time() {
            Some(visit_time) => visit_time < now,
            None => false,
        }
    }

    /// [`Visit::is_overdue`] against the local wall clock.
    pub fn is_overdue_now(&self) -> bool {
        self.is_overdue(Local::now().naive_local())
    }

    /// Total order by instant. Two absent or malformed visits compare equal.
    pub fn compare(&self, other: &Visit) -> Ordering {
        self.date_time().cmp(&other.date_time())
    }

    /// Display form: `-` when absent, the raw text when malformed, otherwise `display_format`.
    pub fn formatted(&self, display_format: &str) -> String {
        if !self.is_present() {
            return ABSENT_PLACEHOLDER.to_string();
        }
        match self.try_date_time() {
            Some(date_time) => date_time.format(display_format).to_string(),
            None => self.value.clone(),
        }
    }
}

impl std::fmt::Display for Visit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_present() {
            f.write_str(&self.value)
        } else {
            f.write_str(ABSENT_PLACEHOLDER)
        }
    }
}

fn parse_input(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, VISIT_INPUT_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DISPLAY_FORMAT;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test date")
    }

    #[test]
    fn presence_follows_text() {
        assert!(!Visit::absent().is_present());
        assert!(!Visit::new("").is_present());
        assert!(Visit::new("2021-11-30 18:30").is_present());
        assert!(Visit::new("garbage").is_present());
    }

    #[test]
    fn date_time_parses_valid_text() {
        let visit = Visit::new("2021-11-30 18:30");
        assert_eq!(visit.date_time(), at(2021, 11, 30, 18, 30));
    }

    #[test]
    fn absent_and_malformed_resolve_to_sentinel() {
        assert_eq!(Visit::absent().date_time(), NaiveDateTime::MAX);
        assert_eq!(Visit::new("30/11/2021").date_time(), NaiveDateTime::MAX);
        assert_eq!(Visit::new("2021-02-30 10:00").date_time(), NaiveDateTime::MAX);
    }

    #[test]
    fn overdue_only_for_past_parsable_visits() {
        let now = at(2021, 12, 1, 0, 0);
        assert!(Visit::new("2021-11-30 18:30").is_overdue(now));
        assert!(!Visit::new("2021-12-01 00:00").is_overdue(now));
        assert!(!Visit::new("2022-01-01 09:00").is_overdue(now));
        assert!(!Visit::absent().is_overdue(now));
        assert!(!Visit::new("not a date").is_overdue(NaiveDateTime::MAX));
    }

    #[test]
    fn compare_places_absent_and_malformed_last() {
        let early = Visit::new("2020-01-01 00:00");
        let late = Visit::new("9999-12-31 23:59");
        let absent = Visit::absent();
        let malformed = Visit::new("soon");

        assert_eq!(early.compare(&late), Ordering::Less);
        assert_eq!(late.compare(&absent), Ordering::Less);
        assert_eq!(absent.compare(&early), Ordering::Greater);
        assert_eq!(absent.compare(&malformed), Ordering::Equal);
        assert_eq!(early.compare(&early.clone()), Ordering::Equal);
    }

    #[test]
    fn parse_accepts_blank_as_absent() {
        let visit = Visit::parse("   ").expect("blank is absent");
        assert!(!visit.is_present());
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for input in [
            "2021-11-30",
            "2021-1-5 1:00",
            "2021-13-01 10:00",
            "tomorrow",
            "+2021-11-30 8:30",
            "2021-11-30  8:30",
            "2021-11- 3 08:30",
        ] {
            let err = Visit::parse(input).expect_err("should reject malformed date");
            assert!(matches!(err, RecordError::UnparsableDate(text) if text == input));
        }
    }

    #[test]
    fn parse_trims_valid_input() {
        let visit = Visit::parse(" 2021-07-28 12:00 ").expect("valid");
        assert_eq!(visit.as_str(), "2021-07-28 12:00");
    }

    #[test]
    fn from_date_time_round_trips_through_input_format() {
        let visit = Visit::from_date_time(at(2022, 3, 4, 5, 6));
        assert_eq!(visit.as_str(), "2022-03-04 05:06");
    }

    #[test]
    fn formatted_uses_placeholder_and_display_format() {
        assert_eq!(Visit::absent().formatted(DEFAULT_DISPLAY_FORMAT), "-");
        assert_eq!(
            Visit::new("2021-11-30 18:30").formatted(DEFAULT_DISPLAY_FORMAT),
            "Tue, 30 Nov 2021 18:30"
        );
        assert_eq!(Visit::new("soon").formatted(DEFAULT_DISPLAY_FORMAT), "soon");
    }
}
