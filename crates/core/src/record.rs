//! Client records.
//!
//! A [`Record`] is immutable once built. To change one, take its [`RecordFields`] with
//! [`Record::to_fields`], modify them, build a new record and hand it to
//! [`crate::workflow::edit_record`], which re-validates before replacing the stored value.
//!
//! Construction does **not** check the cross-field schedule rules; that happens once, at
//! admission, in [`crate::validation::validate`].

use crate::config::CoreConfig;
use crate::recurrence::{Frequency, Occurrence, RecurrenceRule};
use crate::visit::Visit;
use crate::RecordResult;
use std::collections::BTreeSet;
use std::fmt;
use visitbook_types::{NonEmptyText, PhoneNumber};

/// Field values for building a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordFields {
    pub name: NonEmptyText,
    pub phone: PhoneNumber,
    pub language: NonEmptyText,
    pub address: NonEmptyText,
    pub last_visit: Visit,
    pub next_visit: Visit,
    pub frequency: Frequency,
    pub occurrence: Occurrence,
    /// Health conditions and other free-form labels.
    pub tags: BTreeSet<NonEmptyText>,
}

/// Raw, already tokenised field text as supplied by a command parser.
///
/// Optional fields that were not given are `None`; given-but-blank dates, frequencies and
/// occurrences are treated the same as not given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordInput {
    pub name: String,
    pub phone: String,
    pub language: String,
    pub address: String,
    pub last_visit: Option<String>,
    pub next_visit: Option<String>,
    pub frequency: Option<String>,
    pub occurrence: Option<String>,
    pub tags: Vec<String>,
}

impl RecordInput {
    /// Parses every field strictly.
    ///
    /// # Errors
    ///
    /// Returns the first field error: [`crate::RecordError::Text`] for blank text or a bad phone
    /// number, [`crate::RecordError::UnparsableDate`] for malformed visits and
    /// [`crate::RecordError::InvalidInput`] for bad frequency or occurrence text.
    pub fn parse(&self) -> RecordResult<RecordFields> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        let tags = self
            .tags
            .iter()
            .map(NonEmptyText::new)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(RecordFields {
            name: NonEmptyText::new(&self.name)?,
            phone: PhoneNumber::parse(&self.phone)?,
            language: NonEmptyText::new(&self.language)?,
            address: NonEmptyText::new(&self.address)?,
            last_visit: Visit::parse(&optional(&self.last_visit))?,
            next_visit: Visit::parse(&optional(&self.next_visit))?,
            frequency: Frequency::parse(&optional(&self.frequency))?,
            occurrence: Occurrence::parse(&optional(&self.occurrence))?,
            tags,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    name: NonEmptyText,
    phone: PhoneNumber,
    language: NonEmptyText,
    address: NonEmptyText,
    last_visit: Visit,
    next_visit: Visit,
    recurrence: RecurrenceRule,
    tags: BTreeSet<NonEmptyText>,
}

impl Record {
    pub fn new(fields: RecordFields) -> Self {
        Self {
            name: fields.name,
            phone: fields.phone,
            language: fields.language,
            address: fields.address,
            last_visit: fields.last_visit,
            next_visit: fields.next_visit,
            recurrence: RecurrenceRule::new(fields.frequency, fields.occurrence),
            tags: fields.tags,
        }
    }

    /// Parses `input` and builds a record from it.
    pub fn from_input(input: &RecordInput) -> RecordResult<Self> {
        input.parse().map(Self::new)
    }

    pub fn to_fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            language: self.language.clone(),
            address: self.address.clone(),
            last_visit: self.last_visit.clone(),
            next_visit: self.next_visit.clone(),
            frequency: self.recurrence.frequency(),
            occurrence: self.recurrence.occurrence(),
            tags: self.tags.clone(),
        }
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn language(&self) -> &NonEmptyText {
        &self.language
    }

    pub fn address(&self) -> &NonEmptyText {
        &self.address
    }

    pub fn last_visit(&self) -> &Visit {
        &self.last_visit
    }

    pub fn next_visit(&self) -> &Visit {
        &self.next_visit
    }

    pub fn recurrence(&self) -> RecurrenceRule {
        self.recurrence
    }

    pub fn frequency(&self) -> Frequency {
        self.recurrence.frequency()
    }

    pub fn occurrence(&self) -> Occurrence {
        self.recurrence.occurrence()
    }

    pub fn tags(&self) -> &BTreeSet<NonEmptyText> {
        &self.tags
    }

    /// Weaker notion of equality used for duplicate detection: records with the same name are
    /// the same client.
    pub fn is_same_record(&self, other: &Record) -> bool {
        self.name == other.name
    }

    /// One-line summary with visits rendered using the configured display format.
    pub fn display_with(&self, cfg: &CoreConfig) -> String {
        self.render(
            &self.last_visit.formatted(cfg.display_format()),
            &self.next_visit.formatted(cfg.display_format()),
        )
    }

    fn render(&self, last_visit: &str, next_visit: &str) -> String {
        let mut out = format!(
            "{}; Phone: {}; Language: {}; Address: {}; Last Visit: {}; Visit: {}; Frequency: {}; Occurrence: {}",
            self.name,
            self.phone,
            self.language,
            self.address,
            last_visit,
            next_visit,
            self.frequency(),
            self.occurrence(),
        );
        if !self.tags.is_empty() {
            out.push_str("; Tags: ");
            for tag in &self.tags {
                out.push_str(&format!("[{}]", tag));
            }
        }
        out
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(
            &self.last_visit.to_string(),
            &self.next_visit.to_string(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a record named `name` with placeholder contact details.
    pub(crate) fn record(
        name: &str,
        last_visit: &str,
        next_visit: &str,
        frequency: &str,
        occurrence: &str,
    ) -> Record {
        Record::new(RecordFields {
            name: NonEmptyText::new(name).expect("name"),
            phone: PhoneNumber::parse("98765432").expect("phone"),
            language: NonEmptyText::new("English").expect("language"),
            address: NonEmptyText::new("311, Clementi Ave 2, #02-25").expect("address"),
            last_visit: Visit::new(last_visit),
            next_visit: Visit::new(next_visit),
            frequency: Frequency::parse(frequency).expect("frequency"),
            occurrence: Occurrence::parse(occurrence).expect("occurrence"),
            tags: BTreeSet::new(),
        })
    }
}
