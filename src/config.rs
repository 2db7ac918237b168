//! Build configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult, ValidationError};
use crate::record_stream::{ReaderOptions, DEFAULT_MAX_RECORD_BYTES};
use crate::source::NdjsonSource;

/// Where the feeds live and how tolerant reading is.
///
/// Every field has a default, so a JSON config only needs the keys it changes:
///
/// ```
/// use pubgraph::GraphConfig;
///
/// let config = GraphConfig::from_json(r#"{ "strict": true }"#).unwrap();
/// assert!(config.strict);
/// assert!(config.personnel_path.ends_with("personnel.ndjson"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Personnel NDJSON file.
    pub personnel_path: PathBuf,
    /// Publications NDJSON file.
    pub publications_path: PathBuf,
    /// Collect diagnostics for discarded input.
    pub strict: bool,
    /// Upper bound for one buffered record (bytes).
    pub max_record_bytes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            personnel_path: PathBuf::from("data/personnel.ndjson"),
            publications_path: PathBuf::from("data/publications.ndjson"),
            strict: false,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

impl GraphConfig {
    const MIN_RECORD_BYTES: usize = 1024; // 1 KiB; anything smaller drops ordinary records

    /// Checks the configuration, returning it unchanged when valid.
    ///
    /// # Errors
    /// [`ValidationError::InvalidConfig`] for an empty path or a record limit
    /// below 1 KiB.
    pub fn validate(self) -> GraphResult<Self> {
        if self.personnel_path.as_os_str().is_empty() {
            return Err(ValidationError::config("personnel_path must not be empty").into());
        }
        if self.publications_path.as_os_str().is_empty() {
            return Err(ValidationError::config("publications_path must not be empty").into());
        }
        if self.max_record_bytes < Self::MIN_RECORD_BYTES {
            return Err(GraphError::from(ValidationError::config(format!(
                "max_record_bytes must be at least {} bytes (got {})",
                Self::MIN_RECORD_BYTES,
                self.max_record_bytes
            ))));
        }
        Ok(self)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Malformed JSON, unknown keys, or a failed [`Self::validate`].
    pub fn from_json(text: &str) -> GraphResult<Self> {
        serde_json::from_str::<Self>(text)?.validate()
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    /// I/O failure reading `path`, or any [`Self::from_json`] error.
    pub fn from_json_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reader options derived from this configuration.
    #[must_use]
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            strict: self.strict,
            max_record_bytes: self.max_record_bytes,
        }
    }

    /// Personnel feed as configured.
    #[must_use]
    pub fn personnel_source(&self) -> NdjsonSource {
        NdjsonSource::open(&self.personnel_path).with_options(self.reader_options())
    }

    /// Publication feed as configured.
    #[must_use]
    pub fn publication_source(&self) -> NdjsonSource {
        NdjsonSource::open(&self.publications_path).with_options(self.reader_options())
    }
}
