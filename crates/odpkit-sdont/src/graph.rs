//! Graph data model: nodes wrap entities, edges connect them under a
//! relation label.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use odpkit_owl::{vocab, Entity, EntityKind, Iri};

// ============================================================================
// Nodes
// ============================================================================

/// A displayable wrapper around one entity.
///
/// Identity is the entity IRI alone; the literal flag and the layout
/// coordinates do not participate in `Eq`/`Hash`/`Ord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdNode {
    entity: Entity,
    is_literal: bool,
    x: f64,
    y: f64,
}

impl SdNode {
    pub fn new(entity: Entity, is_literal: bool) -> Self {
        Self {
            entity,
            is_literal,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Node for an entity; datatypes are literal nodes.
    pub fn for_entity(entity: Entity) -> Self {
        let is_literal = entity.kind == EntityKind::Datatype;
        Self::new(entity, is_literal)
    }

    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::for_entity(Entity::class(iri))
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn iri(&self) -> &Iri {
        &self.entity.iri
    }

    pub fn short_name(&self) -> &str {
        self.entity.iri.short_form()
    }

    pub fn is_literal(&self) -> bool {
        self.is_literal
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl PartialEq for SdNode {
    fn eq(&self, other: &Self) -> bool {
        self.entity.iri == other.entity.iri
    }
}

impl Eq for SdNode {}

impl Hash for SdNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.iri.hash(state);
    }
}

impl PartialOrd for SdNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SdNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entity.iri.cmp(&other.entity.iri)
    }
}

// ============================================================================
// Edges
// ============================================================================

/// A relation between two nodes.
///
/// `directed` is derived from the label: it is true exactly for the built-in
/// `rdfs:subClassOf` relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SdEdge {
    source: SdNode,
    label: Entity,
    target: SdNode,
    directed: bool,
}

impl SdEdge {
    pub fn new(source: SdNode, label: Entity, target: SdNode) -> Self {
        let directed = label.iri.as_str() == vocab::RDFS_SUBCLASS_OF;
        Self {
            source,
            label,
            target,
            directed,
        }
    }

    /// `sub is-a sup`
    pub fn subclass(sub: SdNode, sup: SdNode) -> Self {
        Self::new(sub, Entity::object_property(vocab::RDFS_SUBCLASS_OF), sup)
    }

    pub fn source(&self) -> &SdNode {
        &self.source
    }

    pub fn target(&self) -> &SdNode {
        &self.target
    }

    pub fn label(&self) -> &Entity {
        &self.label
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Same relation, with endpoints swapped for the given nodes.
    pub(crate) fn with_endpoints(&self, source: SdNode, target: SdNode) -> Self {
        Self::new(source, self.label.clone(), target)
    }
}

#[derive(Serialize)]
struct EdgeView<'a> {
    source: &'a Iri,
    label: &'a Entity,
    target: &'a Iri,
    directed: bool,
}

impl Serialize for SdEdge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EdgeView {
            source: self.source.iri(),
            label: &self.label,
            target: self.target.iri(),
            directed: self.directed,
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge {label} references node {missing} which is not in the node set")]
    DanglingEdge { label: Iri, missing: Iri },
}

/// A node set plus an edge set over it.
///
/// Nodes are keyed by IRI (the first node for an IRI wins); duplicate edges
/// collapse. After construction only node coordinates may change.
#[derive(Debug, Clone, Default)]
pub struct SdGraph {
    nodes: BTreeMap<Iri, SdNode>,
    edges: Vec<SdEdge>,
}

impl SdGraph {
    pub fn new(
        nodes: impl IntoIterator<Item = SdNode>,
        edges: impl IntoIterator<Item = SdEdge>,
    ) -> Result<Self, GraphError> {
        let mut node_map = BTreeMap::new();
        for node in nodes {
            node_map.entry(node.iri().clone()).or_insert(node);
        }

        let mut seen = HashSet::new();
        let mut edge_list = Vec::new();
        for edge in edges {
            for endpoint in [edge.source(), edge.target()] {
                if !node_map.contains_key(endpoint.iri()) {
                    return Err(GraphError::DanglingEdge {
                        label: edge.label().iri.clone(),
                        missing: endpoint.iri().clone(),
                    });
                }
            }
            if seen.insert(edge.clone()) {
                edge_list.push(edge);
            }
        }

        Ok(Self {
            nodes: node_map,
            edges: edge_list,
        })
    }

    /// Nodes in IRI order.
    pub fn nodes(&self) -> impl Iterator<Item = &SdNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[SdEdge] {
        &self.edges
    }

    pub fn node(&self, iri: &Iri) -> Option<&SdNode> {
        self.nodes.get(iri)
    }

    /// Mutable access for layout; identity cannot change through it.
    pub fn node_mut(&mut self, iri: &Iri) -> Option<&mut SdNode> {
        self.nodes.get_mut(iri)
    }

    pub fn contains_node(&self, iri: &Iri) -> bool {
        self.nodes.contains_key(iri)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Serialize)]
struct GraphView<'a> {
    nodes: Vec<&'a SdNode>,
    edges: &'a [SdEdge],
}

impl Serialize for SdGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphView {
            nodes: self.nodes.values().collect(),
            edges: &self.edges,
        }
        .serialize(serializer)
    }
}
