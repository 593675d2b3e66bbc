use super::shape::BlockShape;
use crate::definition::Block;
use crate::error::{ConversionError, GraphError};
use crate::graph::{Graph, Node, NodeId};
use ahash::{AHashMap, AHashSet};
use std::cell::RefCell;

pub(super) const ROOT_SCOPE: &str = "<root>";

/// Walks an edited graph back into an ordered, nested block list.
pub(super) struct GraphWalker<'a> {
    registry: &'a AHashMap<String, Box<dyn BlockShape>>,
    nodes: AHashMap<&'a NodeId, &'a Node>,
    scopes: AHashMap<Option<&'a NodeId>, Vec<&'a Node>>,
    successors: AHashMap<&'a NodeId, &'a NodeId>,
    has_predecessor: AHashSet<&'a NodeId>,
    walked: RefCell<AHashSet<&'a NodeId>>,
}

impl<'a> GraphWalker<'a> {
    pub(super) fn new(
        graph: &'a Graph,
        registry: &'a AHashMap<String, Box<dyn BlockShape>>,
    ) -> Result<Self, GraphError> {
        let mut nodes = AHashMap::new();
        let mut scopes: AHashMap<Option<&NodeId>, Vec<&Node>> = AHashMap::new();
        for node in &graph.nodes {
            if nodes.insert(&node.id, node).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id.to_string()));
            }
            scopes.entry(node.parent_id.as_ref()).or_default().push(node);
        }

        for node in &graph.nodes {
            if let Some(parent) = &node.parent_id {
                if !nodes.contains_key(parent) {
                    return Err(GraphError::UnknownParent {
                        node_id: node.id.to_string(),
                        parent_id: parent.to_string(),
                    });
                }
            }
        }

        for node in &graph.nodes {
            let mut ancestors = AHashSet::new();
            let mut current = node;
            while let Some(parent) = &current.parent_id {
                if !ancestors.insert(parent) {
                    return Err(GraphError::ParentCycle(node.id.to_string()));
                }
                match nodes.get(parent).copied() {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }

        let mut successors = AHashMap::new();
        let mut has_predecessor = AHashSet::new();
        for edge in &graph.edges {
            let source = Self::endpoint(&nodes, &edge.id, &edge.source)?;
            let target = Self::endpoint(&nodes, &edge.id, &edge.target)?;
            if source.parent_id != target.parent_id {
                return Err(GraphError::CrossScopeEdge {
                    edge_id: edge.id.clone(),
                });
            }
            if successors.insert(&edge.source, &edge.target).is_some() {
                return Err(GraphError::Branching(edge.source.to_string()));
            }
            has_predecessor.insert(&edge.target);
        }

        Ok(Self {
            registry,
            nodes,
            scopes,
            successors,
            has_predecessor,
            walked: RefCell::new(AHashSet::new()),
        })
    }

    /// Walks the whole graph. Every node must end up in exactly one block.
    pub(super) fn walk(&self) -> Result<Vec<Block>, ConversionError> {
        let blocks = self.walk_scope(None)?;

        let walked = self.walked.borrow();
        if walked.len() < self.nodes.len() {
            if let Some(stray) = self.nodes.keys().find(|id| !walked.contains(*id)) {
                return Err(GraphError::UnreachableNode(stray.to_string()).into());
            }
        }
        Ok(blocks)
    }

    /// Collects the blocks of one container in execution order, recursing into bodies.
    fn walk_scope(&self, parent: Option<&'a NodeId>) -> Result<Vec<Block>, ConversionError> {
        let Some(members) = self.scopes.get(&parent) else {
            return Ok(Vec::new());
        };
        let scope_name = parent.map_or(ROOT_SCOPE, NodeId::as_str);

        let entries: Vec<&Node> = members
            .iter()
            .copied()
            .filter(|n| !self.has_predecessor.contains(&n.id))
            .collect();
        let entry = match entries.as_slice() {
            [entry] => *entry,
            [] => {
                return Err(GraphError::MissingEntry {
                    scope: scope_name.to_string(),
                }
                .into());
            }
            many => {
                return Err(GraphError::AmbiguousEntry {
                    scope: scope_name.to_string(),
                    candidates: many.iter().map(|n| n.id.to_string()).collect(),
                }
                .into());
            }
        };

        let mut visited = AHashSet::new();
        let mut ordered = Vec::with_capacity(members.len());
        let mut current = entry;
        loop {
            if !visited.insert(&current.id) {
                return Err(GraphError::CycleDetected(current.id.to_string()).into());
            }
            ordered.push(current);
            match self
                .successors
                .get(&current.id)
                .and_then(|next| self.nodes.get(next).copied())
            {
                Some(next) => current = next,
                None => break,
            }
        }

        if let Some(stray) = members.iter().find(|n| !visited.contains(&n.id)) {
            return Err(GraphError::UnreachableNode(stray.id.to_string()).into());
        }
        self.walked
            .borrow_mut()
            .extend(ordered.iter().copied().map(|node| &node.id));

        ordered
            .into_iter()
            .map(|node| {
                let shape = self.registry.get(&node.data.block_type).ok_or_else(|| {
                    ConversionError::UnsupportedBlockKind {
                        label: node.data.label.clone(),
                        block_type: node.data.block_type.clone(),
                    }
                })?;
                let children = self.walk_scope(Some(&node.id))?;
                shape.collapse(node.data.clone(), children)
            })
            .collect()
    }

    fn endpoint(
        nodes: &AHashMap<&'a NodeId, &'a Node>,
        edge_id: &str,
        id: &NodeId,
    ) -> Result<&'a Node, GraphError> {
        nodes
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::DanglingEdge {
                edge_id: edge_id.to_string(),
                node_id: id.to_string(),
            })
    }
}
