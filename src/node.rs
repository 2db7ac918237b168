//! Graph node identifiers.
//!
//! People and publications share one raw id space, so every node id carries
//! its kind as a prefix: `"person:<rawid>"` or `"pub:<rawid>"`. Downstream
//! consumers split on the first colon to recover the raw id.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The namespace a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A person, indexed from personnel or synthesized from an author token.
    Person,
    /// A publication.
    #[serde(rename = "pub")]
    Publication,
}

impl NodeKind {
    /// The id prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Publication => "pub",
        }
    }

    /// Parses an id prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "person" => Some(Self::Person),
            "pub" => Some(Self::Publication),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Composite `"<kind>:<rawid>"` node identifier.
///
/// # Examples
///
/// ```
/// use pubgraph::{NodeId, NodeKind};
///
/// let id = NodeId::person("p1");
/// assert_eq!(id.as_str(), "person:p1");
/// assert_eq!(id.kind(), Some(NodeKind::Person));
/// assert_eq!(id.raw_id(), "p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Builds the id for a node of `kind` with the given raw id.
    #[must_use]
    pub fn new(kind: NodeKind, raw: &str) -> Self {
        Self(format!("{}:{raw}", kind.prefix()))
    }

    /// Person node id.
    #[must_use]
    pub fn person(raw: &str) -> Self {
        Self::new(NodeKind::Person, raw)
    }

    /// Publication node id.
    #[must_use]
    pub fn publication(raw: &str) -> Self {
        Self::new(NodeKind::Publication, raw)
    }

    /// The full composite string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits on the first colon into `(prefix, raw id)`.
    ///
    /// Ids without a colon have an empty prefix.
    #[must_use]
    pub fn split(&self) -> (&str, &str) {
        self.0.split_once(':').unwrap_or(("", &self.0))
    }

    /// The kind encoded in the prefix, if it is a known one.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_prefix(self.split().0)
    }

    /// Everything after the first colon.
    #[must_use]
    pub fn raw_id(&self) -> &str {
        self.split().1
    }

    /// Consumes the id, returning the composite string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
