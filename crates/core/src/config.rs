//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core operations. Nothing in the core reads environment variables itself; the
//! binary resolves raw values and hands them to the helpers here.

use crate::constants::DEFAULT_DISPLAY_FORMAT;
use crate::{RecordError, RecordResult};
use chrono::format::{Item, StrftimeItems};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    display_format: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`, rejecting display formats chrono cannot render.
    pub fn new(display_format: impl Into<String>) -> RecordResult<Self> {
        let display_format = display_format.into();
        validate_display_format(&display_format)?;
        Ok(Self { display_format })
    }

    /// The chrono strftime pattern used to render present visits.
    pub fn display_format(&self) -> &str {
        &self.display_format
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            display_format: DEFAULT_DISPLAY_FORMAT.to_string(),
        }
    }
}

/// Parse the display format from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default display format.
pub fn display_format_from_env_value(value: Option<String>) -> RecordResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(format) => {
            validate_display_format(&format)?;
            Ok(format)
        }
        None => Ok(DEFAULT_DISPLAY_FORMAT.to_string()),
    }
}

fn validate_display_format(format: &str) -> RecordResult<()> {
    if format.trim().is_empty() {
        return Err(RecordError::InvalidInput(
            "display format cannot be empty".into(),
        ));
    }

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RecordError::InvalidInput(format!(
            "display format '{}' contains an unsupported specifier",
            format
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_display_format() {
        assert_eq!(CoreConfig::default().display_format(), DEFAULT_DISPLAY_FORMAT);
    }

    #[test]
    fn new_rejects_unknown_specifier() {
        let err = CoreConfig::new("%Y-%Q").expect_err("should reject %Q");
        assert!(matches!(err, RecordError::InvalidInput(msg) if msg.contains("unsupported")));
    }

    #[test]
    fn new_rejects_blank_format() {
        let err = CoreConfig::new("  ").expect_err("should reject blank");
        assert!(matches!(err, RecordError::InvalidInput(msg) if msg.contains("cannot be empty")));
    }

    #[test]
    fn env_value_falls_back_to_default() {
        assert_eq!(
            display_format_from_env_value(None).expect("default"),
            DEFAULT_DISPLAY_FORMAT
        );
        assert_eq!(
            display_format_from_env_value(Some("   ".into())).expect("default"),
            DEFAULT_DISPLAY_FORMAT
        );
    }

    #[test]
    fn env_value_is_trimmed_and_validated() {
        assert_eq!(
            display_format_from_env_value(Some(" %d/%m/%Y ".into())).expect("valid"),
            "%d/%m/%Y"
        );
        assert!(display_format_from_env_value(Some("%Q".into())).is_err());
    }
}
