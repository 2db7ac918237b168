//! Typed personnel and publication records.
//!
//! Records are coerced defensively out of raw JSON objects: the only hard
//! requirement is a non-empty `id`, and every other field falls back to a
//! default instead of failing. Fields the graph does not consume are kept
//! verbatim in `metadata` for downstream consumers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::record_stream::Record;

const PERSON_FIELDS: [&str; 2] = ["id", "name"];
const PUBLICATION_FIELDS: [&str; 4] = ["id", "title", "short_title", "authors"];

/// Coerces a scalar to text. Null counts as missing.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn string_field(record: &Record, key: &str) -> String {
    record.get(key).and_then(coerce_string).unwrap_or_default()
}

fn required_id(record: &Record) -> Result<String, ValidationError> {
    let id = string_field(record, "id");
    if id.is_empty() {
        return Err(ValidationError::missing("id"));
    }
    Ok(id)
}

fn coerce_authors(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn split_metadata(record: Record, consumed: &[&str]) -> Map<String, Value> {
    record
        .into_iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .collect()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn metadata_str<'a>(metadata: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str).and_then(non_blank)
}

/// A member of the personnel feed.
///
/// # Examples
///
/// ```
/// use pubgraph::Person;
///
/// let person = Person::new("p1", "Alice Smith");
/// assert_eq!(person.label(), "Alice Smith");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique key within the personnel feed.
    pub id: String,

    /// Display name, possibly empty.
    #[serde(default)]
    pub name: String,

    /// Passthrough fields (`PI`, `subteam`, `active`, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Person {
    /// Creates a person with no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Adds a passthrough field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Coerces a raw record.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] when `id` is absent or empty.
    pub fn from_record(record: Record) -> Result<Self, ValidationError> {
        let id = required_id(&record)?;
        let name = string_field(&record, "name");
        Ok(Self {
            id,
            name,
            metadata: split_metadata(record, &PERSON_FIELDS),
        })
    }

    /// Name when present, otherwise the id.
    #[must_use]
    pub fn label(&self) -> &str {
        non_blank(&self.name).map_or(self.id.as_str(), |_| self.name.as_str())
    }

    /// Whether the `PI` flag is set.
    #[must_use]
    pub fn is_pi(&self) -> bool {
        self.metadata.get("PI").is_some_and(truthy)
    }

    /// Whether the `active` flag is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.metadata.get("active").is_some_and(truthy)
    }

    /// Subteam, if recorded.
    #[must_use]
    pub fn subteam(&self) -> Option<&str> {
        metadata_str(&self.metadata, "subteam")
    }
}

/// An entry in the publication feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Unique key within the publication feed.
    pub id: String,

    /// Full title, possibly empty.
    #[serde(default)]
    pub title: String,

    /// Abbreviated title, possibly empty.
    #[serde(default)]
    pub short_title: String,

    /// Raw author tokens in feed order. Each is a person id or a free-form name.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Passthrough fields (`team`, `type`, `date`, `year`, `doi`, `venue`, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Publication {
    /// Creates a publication with no authors.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_title: String::new(),
            authors: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Replaces the author list.
    #[must_use]
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the short title.
    #[must_use]
    pub fn with_short_title(mut self, short_title: impl Into<String>) -> Self {
        self.short_title = short_title.into();
        self
    }

    /// Adds a passthrough field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Coerces a raw record.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] when `id` is absent or empty.
    pub fn from_record(record: Record) -> Result<Self, ValidationError> {
        let id = required_id(&record)?;
        let title = string_field(&record, "title");
        let short_title = string_field(&record, "short_title");
        let authors = coerce_authors(record.get("authors"));
        Ok(Self {
            id,
            title,
            short_title,
            authors,
            metadata: split_metadata(record, &PUBLICATION_FIELDS),
        })
    }

    /// Trimmed short title, else title, else id.
    #[must_use]
    pub fn label(&self) -> &str {
        non_blank(&self.short_title)
            .or_else(|| non_blank(&self.title).map(|_| self.title.as_str()))
            .unwrap_or(self.id.as_str())
    }

    /// Team, if recorded.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        metadata_str(&self.metadata, "team")
    }

    /// Publication type (the `type` field).
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        metadata_str(&self.metadata, "type")
    }

    /// DOI, if recorded.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        metadata_str(&self.metadata, "doi")
    }

    /// Venue, if recorded.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        metadata_str(&self.metadata, "venue")
    }

    /// The `date` field parsed as `YYYY-MM-DD`.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = metadata_str(&self.metadata, "date")?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Year from `project_year`, then `year`, then the leading digits of `date`.
    #[must_use]
    pub fn year(&self) -> Option<String> {
        for key in ["project_year", "year"] {
            let value = self.metadata.get(key).and_then(coerce_string);
            if let Some(year) = value.as_deref().and_then(non_blank) {
                return Some(year.to_string());
            }
        }

        if let Some(date) = self.date() {
            return Some(date.year().to_string());
        }
        let raw = metadata_str(&self.metadata, "date")?;
        let prefix = raw.get(..4)?;
        prefix
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| prefix.to_string())
    }
}
