//! # pubgraph - People and publications as one graph
//!
//! pubgraph ingests two independent NDJSON feeds, personnel and publications,
//! and materializes an undirected graph linking people to the publications
//! they authored.
//!
//! ## Core Concepts
//!
//! - **RecordStream**: Tolerant line-buffering parser that reconstructs whole
//!   JSON objects, even when a record spans several physical lines
//! - **Sources**: Typed adapters producing [`Person`] and [`Publication`] values
//! - **GraphBuilder**: Resolves every author token to a person node by exact
//!   id, then normalized name, then a synthesized placeholder
//! - **Graph**: Adjacency-set undirected graph keyed by `"<kind>:<rawid>"` ids
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubgraph::{GraphBuilder, NdjsonSource};
//!
//! let people = NdjsonSource::open("data/personnel.ndjson");
//! let publications = NdjsonSource::open("data/publications.ndjson");
//! let graph = GraphBuilder::new(&people, &publications).build();
//!
//! for node in graph.nodes() {
//!     println!("{node}: {} neighbors", graph.degree(node.as_str()));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod model;
pub mod node;
pub mod record_stream;
pub mod resolver;
pub mod source;

// Re-export primary types at crate root for convenience
pub use builder::{build_graph, BuildReport, GraphBuilder};
pub use config::GraphConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{GraphError, GraphResult, ValidationError};
pub use graph::Graph;
pub use model::{Person, Publication};
pub use node::{NodeId, NodeKind};
pub use record_stream::{ReaderOptions, Record, RecordStream, DEFAULT_MAX_RECORD_BYTES};
pub use resolver::{normalize_name, AuthorIndex, Resolution};
pub use source::{NdjsonSource, PersonnelSource, PublicationSource};
