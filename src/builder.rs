//! Graph construction with author entity resolution.
//!
//! A build runs in two phases. Phase one registers every person as a node and
//! indexes them by id and normalized name. Phase two registers every
//! publication and wires each author token to the person node it resolves to,
//! synthesizing a placeholder person node when nothing matches.
//!
//! Nothing in a build fails: unresolvable or malformed input degrades to
//! placeholder nodes and dropped records.

use tracing::{debug, info};

use crate::config::GraphConfig;
use crate::diagnostics::Diagnostic;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::resolver::{AuthorIndex, Resolution};
use crate::source::{PersonnelSource, PublicationSource};

/// Counters and diagnostics from one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Personnel records indexed.
    pub people: usize,
    /// Publication records walked.
    pub publications: usize,
    /// Author tokens matched by person id.
    pub resolved_by_id: usize,
    /// Author tokens matched by normalized name.
    pub resolved_by_name: usize,
    /// Author tokens that matched nothing.
    pub unresolved: usize,
    /// Distinct placeholder person nodes created.
    pub synthesized_nodes: usize,
    /// Discarded-input diagnostics (strict sources only).
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Total author tokens seen.
    #[must_use]
    pub fn author_tokens(&self) -> usize {
        self.resolved_by_id + self.resolved_by_name + self.unresolved
    }
}

/// Builds a [`Graph`] from a personnel feed and a publication feed.
///
/// # Examples
///
/// ```
/// use pubgraph::{GraphBuilder, Person, Publication};
///
/// let people = vec![Person::new("p1", "Alice Smith")];
/// let publications = vec![Publication::new("pb1", "T").with_authors(["alice smith"])];
///
/// let graph = GraphBuilder::new(&people, &publications).build();
/// assert!(graph.neighbors("person:p1").contains("pub:pb1"));
/// assert_eq!(graph.node_count(), 2);
/// ```
pub struct GraphBuilder<'a, P: ?Sized, Q: ?Sized> {
    personnel: &'a P,
    publications: &'a Q,
}

impl<'a, P, Q> GraphBuilder<'a, P, Q>
where
    P: PersonnelSource + ?Sized,
    Q: PublicationSource + ?Sized,
{
    /// Creates a builder over two sources.
    #[must_use]
    pub fn new(personnel: &'a P, publications: &'a Q) -> Self {
        Self {
            personnel,
            publications,
        }
    }

    /// Builds the graph.
    #[must_use]
    pub fn build(&self) -> Graph {
        self.build_with_report().0
    }

    /// Builds the graph and reports what happened.
    #[must_use]
    pub fn build_with_report(&self) -> (Graph, BuildReport) {
        let mut graph = Graph::new();
        let mut report = BuildReport::default();
        let mut index = AuthorIndex::new();

        for person in self.personnel.people() {
            graph.add_node(index.insert(&person));
            report.people += 1;
        }

        for publication in self.publications.publications() {
            let pub_node = NodeId::publication(&publication.id);
            graph.add_node(pub_node.clone());
            report.publications += 1;

            for token in &publication.authors {
                let resolution = index.resolve(token);
                match &resolution {
                    Resolution::ById(_) => report.resolved_by_id += 1,
                    Resolution::ByName(_) => report.resolved_by_name += 1,
                    Resolution::Synthesized(node) => {
                        report.unresolved += 1;
                        if graph.add_node(node.clone()) {
                            report.synthesized_nodes += 1;
                            debug!(token = %token, publication = %publication.id, "unresolved author, synthesized node");
                        }
                    }
                }
                graph.add_edge(resolution.into_node(), pub_node.clone());
            }
        }

        report.diagnostics = self.personnel.take_diagnostics();
        report
            .diagnostics
            .extend(self.publications.take_diagnostics());

        info!(
            people = report.people,
            publications = report.publications,
            by_id = report.resolved_by_id,
            by_name = report.resolved_by_name,
            synthesized = report.synthesized_nodes,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            diagnostics = report.diagnostics.len(),
            "graph built"
        );

        (graph, report)
    }
}

/// Validates `config`, opens both NDJSON feeds and builds the graph.
///
/// # Errors
/// Only configuration validation fails; missing or malformed feeds do not.
pub fn build_graph(config: GraphConfig) -> GraphResult<(Graph, BuildReport)> {
    let config = config.validate()?;
    let personnel = config.personnel_source();
    let publications = config.publication_source();
    Ok(GraphBuilder::new(&personnel, &publications).build_with_report())
}
