//! YAML-file record store.
//!
//! The whole visit book lives in one YAML file:
//!
//! ```yaml
//! records:
//!   - name: Alex Yeoh
//!     phone: "87438807"
//!     language: English
//!     address: "Blk 30 Geylang Street 29, #06-40"
//!     last_visit: "2021-07-28 12:00"
//!     visit: "2021-11-30 18:30"
//!     frequency: weekly
//!     occurrence: 3
//!     tags: [diabetes]
//! ```
//!
//! Unknown keys are rejected and the failing path is reported. Stored visit dates are loaded
//! leniently so an old, hand-edited file still opens; everything else must parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use visitbook_core::{
    Frequency, InMemoryRecordStore, NonEmptyText, Occurrence, PhoneNumber, Record, RecordError,
    RecordFields, RecordStore, Visit,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read records file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write records file: {0}")]
    FileWrite(std::io::Error),
    #[error("records file schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
    #[error("invalid record #{index} in records file: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: RecordError,
    },
    #[error("failed to serialize records: {0}")]
    Serialization(serde_yaml::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A [`RecordStore`] backed by a YAML file. Changes stay in memory until [`YamlRecordStore::save`].
#[derive(Debug)]
pub struct YamlRecordStore {
    path: PathBuf,
    inner: InMemoryRecordStore,
}

impl YamlRecordStore {
    /// Loads `path`, or starts empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(StoreError::FileRead)?;
            InMemoryRecordStore::from(parse_records(&text)?)
        } else {
            tracing::debug!(path = %path.display(), "records file not found, starting empty");
            InMemoryRecordStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.inner.find_by_name(name)
    }

    pub fn save(&self) -> StoreResult<()> {
        let text = render_records(self.inner.records())?;
        std::fs::write(&self.path, text).map_err(StoreError::FileWrite)?;
        tracing::debug!(path = %self.path.display(), count = self.inner.len(), "records saved");
        Ok(())
    }
}

impl RecordStore for YamlRecordStore {
    fn contains(&self, record: &Record) -> bool {
        self.inner.contains(record)
    }

    fn insert(&mut self, record: Record) {
        self.inner.insert(record);
    }

    fn replace(&mut self, target: &Record, edited: Record) -> bool {
        self.inner.replace(target, edited)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        self.inner.iter()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RecordsFileWire {
    #[serde(default)]
    records: Vec<RecordWire>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RecordWire {
    name: String,
    phone: String,
    language: String,
    address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occurrence: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

fn parse_records(yaml_text: &str) -> StoreResult<Vec<Record>> {
    if yaml_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let wire: RecordsFileWire = serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        StoreError::Schema {
            path,
            message: err.into_inner().to_string(),
        }
    })?;

    wire.records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            wire_to_domain(record).map_err(|source| StoreError::InvalidRecord { index, source })
        })
        .collect()
}

fn render_records(records: &[Record]) -> StoreResult<String> {
    let wire = RecordsFileWire {
        records: records.iter().map(domain_to_wire).collect(),
    };
    serde_yaml::to_string(&wire).map_err(StoreError::Serialization)
}

fn wire_to_domain(wire: RecordWire) -> Result<Record, RecordError> {
    let tags = wire
        .tags
        .iter()
        .map(NonEmptyText::new)
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Record::new(RecordFields {
        name: NonEmptyText::new(&wire.name)?,
        phone: PhoneNumber::parse(&wire.phone)?,
        language: NonEmptyText::new(&wire.language)?,
        address: NonEmptyText::new(&wire.address)?,
        last_visit: Visit::new(wire.last_visit.unwrap_or_default()),
        next_visit: Visit::new(wire.visit.unwrap_or_default()),
        frequency: Frequency::parse(wire.frequency.as_deref().unwrap_or_default())?,
        occurrence: wire.occurrence.map_or(Occurrence::Unset, Occurrence::Count),
        tags,
    }))
}

fn domain_to_wire(record: &Record) -> RecordWire {
    let present = |visit: &Visit| visit.is_present().then(|| visit.as_str().to_string());

    RecordWire {
        name: record.name().to_string(),
        phone: record.phone().to_string(),
        language: record.language().to_string(),
        address: record.address().to_string(),
        last_visit: present(record.last_visit()),
        visit: present(record.next_visit()),
        frequency: (!record.frequency().is_empty()).then(|| record.frequency().to_string()),
        occurrence: record.occurrence().count(),
        tags: record.tags().iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visitbook_core::add_record;

    const SAMPLE: &str = r#"records:
  - name: Alex Yeoh
    phone: "87438807"
    language: English
    address: "Blk 30 Geylang Street 29, #06-40"
    last_visit: "2021-07-28 12:00"
    visit: "2021-11-30 18:30"
    frequency: 2 weeks
    occurrence: 3
    tags: [diabetes, dementia]
  - name: Bernice Yu
    phone: "99272758"
    language: Malay
    address: "Blk 30 Lorong 3 Serangoon Gardens, #07-18"
"#;

    #[test]
    fn parses_sample_file() {
        let records = parse_records(SAMPLE).expect("parse sample");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frequency().to_string(), "2 weeks");
        assert_eq!(records[0].occurrence(), Occurrence::Count(3));
        assert!(!records[1].next_visit().is_present());
        assert_eq!(records[1].occurrence(), Occurrence::Unset);
    }

    #[test]
    fn empty_file_has_no_records() {
        assert!(parse_records("").expect("empty").is_empty());
        assert!(parse_records("records: []\n").expect("empty list").is_empty());
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let input = SAMPLE.replace("    language: Malay", "    language: Malay\n    pager: 1");
        let err = parse_records(&input).expect_err("should reject unknown key");
        match err {
            StoreError::Schema { path, message } => {
                assert!(path.contains("records[1]"), "path: {path}");
                assert!(message.contains("pager"));
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_frequency_with_index() {
        let input = SAMPLE.replace("frequency: 2 weeks", "frequency: sometimes");
        let err = parse_records(&input).expect_err("should reject frequency");
        assert!(matches!(
            err,
            StoreError::InvalidRecord {
                index: 0,
                source: RecordError::InvalidInput(_)
            }
        ));
    }

    #[test]
    fn keeps_malformed_stored_visits() {
        let input = SAMPLE.replace("\"2021-07-28 12:00\"", "last summer");
        let records = parse_records(&input).expect("lenient visit");
        assert_eq!(records[0].last_visit().as_str(), "last summer");
        assert!(!records[0].last_visit().is_overdue_now());
    }

    #[test]
    fn save_and_reopen_preserves_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("records.yaml");
        std::fs::write(&path, SAMPLE).expect("write sample");

        let mut store = YamlRecordStore::open(&path).expect("open");
        let bernice = store.find_by_name("Bernice Yu").cloned().expect("bernice");
        let mut fields = bernice.to_fields();
        fields.name = NonEmptyText::new("Charlotte Oliveiro").expect("name");
        add_record(Record::new(fields), &mut store).expect("add");
        store.save().expect("save");

        let reopened = YamlRecordStore::open(&path).expect("reopen");
        assert_eq!(reopened.len(), 3);
        let originals: Vec<_> = store.iter().cloned().collect();
        let reloaded: Vec<_> = reopened.iter().cloned().collect();
        assert_eq!(originals, reloaded);
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = YamlRecordStore::open(dir.path().join("absent.yaml")).expect("open");
        assert!(store.is_empty());
    }
}
