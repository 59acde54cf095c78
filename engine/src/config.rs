//! Engine configuration: the defaults used when nodes are created.

use crate::{error::Result, Error, MAX_SPAN};
use serde::{Deserialize, Serialize};

/// Defaults applied by the insertion operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Name given to a freshly created form.
    pub default_form_name: String,
    /// Title used when `add_section` receives an empty title.
    pub default_section_title: String,
    /// Column spans a new row is seeded with, left to right.
    pub default_row_spans: Vec<u8>,
    /// New fields are named `<prefix>_<n>`.
    pub field_name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_form_name: "Untitled form".to_string(),
            default_section_title: "New section".to_string(),
            default_row_spans: vec![MAX_SPAN],
            field_name_prefix: "field".to_string(),
        }
    }
}

impl EngineConfig {
    /// Override the default section title.
    pub fn with_section_title(mut self, title: impl Into<String>) -> Self {
        self.default_section_title = title.into();
        self
    }

    /// Override the default row layout.
    pub fn with_row_spans(mut self, spans: Vec<u8>) -> Self {
        self.default_row_spans = spans;
        self
    }

    /// Check the configuration before an engine uses it.
    pub fn validate(&self) -> Result<()> {
        if self.default_section_title.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "default section title must not be empty".into(),
            ));
        }
        if self.field_name_prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "field name prefix must not be empty".into(),
            ));
        }
        if self.default_row_spans.is_empty() {
            return Err(Error::InvalidConfig(
                "a row needs at least one column".into(),
            ));
        }
        if let Some(span) = self
            .default_row_spans
            .iter()
            .find(|s| !(1..=MAX_SPAN).contains(*s))
        {
            return Err(Error::InvalidConfig(format!(
                "column span {span} outside 1..={MAX_SPAN}"
            )));
        }
        let total: u32 = self.default_row_spans.iter().map(|s| u32::from(*s)).sum();
        if total > u32::from(MAX_SPAN) {
            return Err(Error::InvalidConfig(format!(
                "row spans add up to {total}, more than {MAX_SPAN}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_row_spans, vec![4]);
    }

    #[test]
    fn rejects_bad_layouts() {
        let empty = EngineConfig::default().with_row_spans(vec![]);
        assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));

        let zero = EngineConfig::default().with_row_spans(vec![0, 4]);
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));

        let too_wide = EngineConfig::default().with_row_spans(vec![2, 2, 1]);
        assert!(matches!(too_wide.validate(), Err(Error::InvalidConfig(_))));

        let halves = EngineConfig::default().with_row_spans(vec![2, 2]);
        assert!(halves.validate().is_ok());
    }

    #[test]
    fn rejects_blank_section_title() {
        let config = EngineConfig::default().with_section_title("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"defaultSectionTitle": "Part"}"#).unwrap();
        assert_eq!(config.default_section_title, "Part");
        assert_eq!(config.default_row_spans, vec![4]);
    }
}
