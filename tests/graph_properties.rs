//! Property tests for the graph ADT and the builder.

use std::collections::BTreeSet;

use proptest::prelude::*;
use pubgraph::{Graph, GraphBuilder, NodeId, Person, Publication};

fn node_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c]{1,2}".prop_map(|raw| format!("person:{raw}")),
        "[a-c]{1,2}".prop_map(|raw| format!("pub:{raw}")),
    ]
}

fn author_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "p[0-3]",
        "(Ann|Bo|Cy) ?(Lee|Ng)?",
        " ?(ANN|bo|ghost)[0-1]? ?",
    ]
}

fn people() -> impl Strategy<Value = Vec<Person>> {
    prop::collection::vec(("p[0-3]", "(Ann|Bo|Cy) ?(Lee|Ng)?"), 0..6)
        .prop_map(|rows| rows.into_iter().map(|(id, name)| Person::new(id, name)).collect())
}

fn publications() -> impl Strategy<Value = Vec<Publication>> {
    prop::collection::vec(
        ("b[0-4]", prop::collection::vec(author_token(), 0..6)),
        0..6,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, authors)| Publication::new(id, "").with_authors(authors))
            .collect()
    })
}

proptest! {
    #[test]
    fn edges_are_symmetric(edges in prop::collection::vec((node_name(), node_name()), 0..40)) {
        let mut graph = Graph::new();
        for (a, b) in &edges {
            graph.add_edge(a.as_str(), b.as_str());
        }
        for (a, b) in &edges {
            prop_assert!(graph.neighbors(a).contains(b.as_str()));
            prop_assert!(graph.neighbors(b).contains(a.as_str()));
        }
    }

    #[test]
    fn adjacency_only_references_known_nodes(edges in prop::collection::vec((node_name(), node_name()), 0..40)) {
        let mut graph = Graph::new();
        for (a, b) in &edges {
            graph.add_edge(a.as_str(), b.as_str());
        }
        for node in graph.nodes() {
            for neighbor in graph.neighbors(node.as_str()) {
                prop_assert!(graph.contains(neighbor.as_str()));
            }
        }
    }

    #[test]
    fn repeated_inserts_change_nothing(edges in prop::collection::vec((node_name(), node_name()), 0..40)) {
        let mut graph = Graph::new();
        for (a, b) in &edges {
            graph.add_edge(a.as_str(), b.as_str());
        }
        let nodes_before = graph.node_count();
        let degrees_before: Vec<usize> = graph.nodes().map(|n| graph.degree(n.as_str())).collect();

        for (a, b) in &edges {
            prop_assert!(!graph.add_node(a.as_str()));
            prop_assert!(!graph.add_edge(a.as_str(), b.as_str()));
        }

        let degrees_after: Vec<usize> = graph.nodes().map(|n| graph.degree(n.as_str())).collect();
        prop_assert_eq!(graph.node_count(), nodes_before);
        prop_assert_eq!(degrees_before, degrees_after);
    }

    #[test]
    fn every_person_is_a_node(people in people(), publications in publications()) {
        let graph = GraphBuilder::new(&people, &publications).build();
        for person in &people {
            prop_assert!(graph.contains(NodeId::person(&person.id).as_str()));
        }
        for publication in &publications {
            prop_assert!(graph.contains(NodeId::publication(&publication.id).as_str()));
        }
    }

    #[test]
    fn builder_never_links_same_kind(people in people(), publications in publications()) {
        let graph = GraphBuilder::new(&people, &publications).build();
        for (a, b) in graph.edges() {
            prop_assert_ne!(a.kind(), b.kind());
        }
    }

    #[test]
    fn publication_degree_counts_distinct_authors(people in people(), publications in publications()) {
        let graph = GraphBuilder::new(&people, &publications).build();
        let mut index = pubgraph::AuthorIndex::new();
        for person in &people {
            index.insert(person);
        }

        // Publications may repeat ids; their author sets merge onto one node.
        let mut expected: std::collections::HashMap<String, BTreeSet<NodeId>> = Default::default();
        for publication in &publications {
            let entry = expected.entry(publication.id.clone()).or_default();
            for token in &publication.authors {
                entry.insert(index.resolve(token).into_node());
            }
        }

        for (id, authors) in expected {
            let node = NodeId::publication(&id);
            prop_assert_eq!(graph.degree(node.as_str()), authors.len());
        }
    }

    #[test]
    fn id_match_wins_over_name_match(name_owner in "p[0-3]", id_owner in "q[0-3]") {
        // id_owner's id doubles as name_owner's name.
        let people = vec![Person::new(name_owner, id_owner.clone()), Person::new(id_owner.clone(), "Someone")];
        let publications = vec![Publication::new("b", "").with_authors([id_owner.clone()])];

        let graph = GraphBuilder::new(&people, &publications).build();
        let expected = NodeId::person(&id_owner);
        prop_assert!(graph.neighbors("pub:b").contains(expected.as_str()));
        prop_assert_eq!(graph.degree("pub:b"), 1);
    }
}
