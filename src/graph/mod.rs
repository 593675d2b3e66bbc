//! The editable node/edge representation handed to the canvas.
//!
//! Field names and shapes follow what a flow canvas consumes directly: nodes carry a
//! `type`, a `position`, an optional `parentId` for nodes nested in a container,
//! and the block payload as `data`.

use crate::definition::Block;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node, derived from the label path of its block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Top-level blocks use their label; nested blocks are prefixed by their container.
    ///
    /// `%`, `/` and `>` in labels are percent-encoded, so an id never contains the
    /// path separator or the `->` of an edge id except where this crate puts them.
    pub fn for_block(parent: Option<&NodeId>, label: &str) -> Self {
        let label = escape_label(label);
        match parent {
            Some(parent) => Self(format!("{}/{}", parent.0, label)),
            None => Self(label),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '>' => escaped.push_str("%3E"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canvas position. Nested nodes are positioned relative to their container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// The block this node stands for, minus anything laid out as child nodes.
    pub data: Block,
}

/// Execution order between two nodes of the same container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    /// Ids built by [`NodeId::for_block`] never contain `>`, so the edge id is unique
    /// per ordered pair of nodes.
    pub fn between(source: NodeId, target: NodeId) -> Self {
        Self {
            id: format!("{}->{}", source, target),
            source,
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Nodes whose container is `parent` (`None` for the top level), in graph order.
    pub fn children<'a>(&'a self, parent: Option<&'a NodeId>) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_ref() == parent)
    }

    /// Snapshot of every node position, keyed by node id.
    pub fn positions(&self) -> AHashMap<NodeId, Position> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect()
    }

    /// Restores cached positions. Ids absent from the cache keep their computed layout.
    pub fn apply_positions(&mut self, positions: &AHashMap<NodeId, Position>) {
        for node in &mut self.nodes {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
        }
    }

    /// Removes a node together with everything nested inside it, and reconnects its
    /// predecessor to its successor so the surrounding chain stays intact.
    ///
    /// Returns `false` if no node has the given id.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }

        let mut doomed = vec![id.clone()];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor].clone();
            let nested: Vec<NodeId> = self
                .nodes
                .iter()
                .filter(|n| n.parent_id.as_ref() == Some(&current) && !doomed.contains(&n.id))
                .map(|n| n.id.clone())
                .collect();
            doomed.extend(nested);
            cursor += 1;
        }

        let predecessor = self
            .edges
            .iter()
            .find(|e| &e.target == id)
            .map(|e| e.source.clone());
        let successor = self
            .edges
            .iter()
            .find(|e| &e.source == id)
            .map(|e| e.target.clone());

        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.edges
            .retain(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target));

        if let (Some(source), Some(target)) = (predecessor, successor) {
            self.edges.push(Edge::between(source, target));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_ids_carry_their_container() {
        let parent = NodeId::for_block(None, "loop");
        assert_eq!(parent.as_str(), "loop");
        assert_eq!(NodeId::for_block(Some(&parent), "visit").as_str(), "loop/visit");
    }

    #[test]
    fn separators_in_labels_are_escaped() {
        let parent = NodeId::for_block(None, "a");
        assert_eq!(NodeId::for_block(None, "a/b").as_str(), "a%2Fb");
        assert_eq!(NodeId::for_block(Some(&parent), "b").as_str(), "a/b");
        assert_eq!(NodeId::for_block(None, "50%->done").as_str(), "50%25-%3Edone");
    }

    #[test]
    fn removal_terminates_on_parent_cycles() {
        let node = |id: &str, parent: &str| Node {
            id: id.into(),
            node_type: "task".to_string(),
            position: Position::default(),
            parent_id: Some(parent.into()),
            data: Block::new(id, "task"),
        };
        let mut graph = Graph {
            nodes: vec![node("b", "c"), node("c", "b")],
            edges: Vec::new(),
        };
        assert!(graph.remove_node(&NodeId::from("b")));
        assert!(graph.is_empty());
    }

    #[test]
    fn edge_id_names_both_ends() {
        let edge = Edge::between("a".into(), "b".into());
        assert_eq!(edge.id, "a->b");
    }
}
