//! Author token resolution.
//!
//! An [`AuthorIndex`] lives for exactly one build. It maps person ids and
//! normalized names onto person nodes, and resolves a raw author token with a
//! fixed fallback chain: exact id, then normalized name, then a synthesized
//! placeholder node keyed by the token itself.

use std::collections::HashMap;

use crate::model::Person;
use crate::node::NodeId;

/// Normalizes a name for lookup: trimmed and lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// How an author token was matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token equals a person's id.
    ById(NodeId),
    /// The normalized token equals a person's normalized name.
    ByName(NodeId),
    /// Nothing matched; the token becomes its own person node.
    Synthesized(NodeId),
}

impl Resolution {
    /// The person node the token resolved to.
    #[must_use]
    pub fn node(&self) -> &NodeId {
        match self {
            Self::ById(node) | Self::ByName(node) | Self::Synthesized(node) => node,
        }
    }

    /// Consumes the resolution, returning the node.
    #[must_use]
    pub fn into_node(self) -> NodeId {
        match self {
            Self::ById(node) | Self::ByName(node) | Self::Synthesized(node) => node,
        }
    }

    /// Returns true if the node was not backed by a personnel record.
    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        matches!(self, Self::Synthesized(_))
    }
}

/// Construction-local id and name index over the personnel feed.
#[derive(Debug, Default)]
pub struct AuthorIndex {
    by_id: HashMap<String, NodeId>,
    by_name: HashMap<String, NodeId>,
}

impl AuthorIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a person and returns their node id.
    ///
    /// Both maps are last-write-wins. An empty name is not indexed; a name of
    /// only whitespace is, under the empty key.
    pub fn insert(&mut self, person: &Person) -> NodeId {
        let node = NodeId::person(&person.id);
        self.by_id.insert(person.id.clone(), node.clone());

        if !person.name.is_empty() {
            let key = normalize_name(&person.name);
            if let Some(previous) = self.by_name.insert(key, node.clone()) {
                if previous != node {
                    tracing::debug!(
                        name = %person.name,
                        replaced = %previous,
                        by = %node,
                        "duplicate normalized name, later person wins"
                    );
                }
            }
        }
        node
    }

    /// Number of distinct person ids indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no person has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolves a raw author token.
    ///
    /// Synthesized nodes are never added back into the index, so they take
    /// no part in resolving later tokens.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Resolution {
        if let Some(node) = self.by_id.get(token) {
            return Resolution::ById(node.clone());
        }
        if let Some(node) = self.by_name.get(&normalize_name(token)) {
            return Resolution::ByName(node.clone());
        }
        Resolution::Synthesized(NodeId::person(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(people: &[Person]) -> AuthorIndex {
        let mut index = AuthorIndex::new();
        for person in people {
            index.insert(person);
        }
        index
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Alice SMITH \t"), "alice smith");
        assert_eq!(normalize_name("ÉMILE"), "émile");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_resolve_by_id() {
        let index = index(&[Person::new("p1", "Alice")]);
        assert_eq!(index.resolve("p1"), Resolution::ById(NodeId::person("p1")));
    }

    #[test]
    fn test_resolve_by_name() {
        let index = index(&[Person::new("p1", "Alice Smith")]);
        assert_eq!(
            index.resolve("  alice smith "),
            Resolution::ByName(NodeId::person("p1"))
        );
    }

    #[test]
    fn test_id_beats_name() {
        // "bob" is p2's id and also p1's name.
        let index = index(&[Person::new("p1", "Bob"), Person::new("bob", "Robert")]);
        assert_eq!(index.resolve("bob"), Resolution::ById(NodeId::person("bob")));
        assert_eq!(index.resolve("BOB"), Resolution::ByName(NodeId::person("p1")));
    }

    #[test]
    fn test_id_match_is_exact() {
        let index = index(&[Person::new("P1", "")]);
        let resolved = index.resolve("p1");
        assert!(resolved.is_synthesized());
        assert_eq!(resolved.node().as_str(), "person:p1");
    }

    #[test]
    fn test_unresolved_is_synthesized_and_not_indexed() {
        let index = index(&[]);
        let first = index.resolve("Ghost");
        assert_eq!(first, Resolution::Synthesized(NodeId::person("Ghost")));
        // A differently-cased token does not match the earlier synthesis.
        assert_eq!(index.resolve("ghost").into_node().as_str(), "person:ghost");
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let index = index(&[Person::new("p1", "Sam Lee"), Person::new("p2", "sam lee")]);
        assert_eq!(index.resolve("Sam Lee"), Resolution::ByName(NodeId::person("p2")));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_names_are_not_indexed() {
        let index = index(&[Person::new("p1", "")]);
        assert!(index.resolve("").is_synthesized());
        assert!(index.resolve("  ").is_synthesized());
    }

    #[test]
    fn test_whitespace_names_index_under_empty_key() {
        let index = index(&[Person::new("p1", "   ")]);
        assert_eq!(index.resolve(" "), Resolution::ByName(NodeId::person("p1")));
        assert_eq!(index.resolve(""), Resolution::ByName(NodeId::person("p1")));
    }
}
