//! Conversion between an ordered block list and the editor graph.
//!
//! Each `block_type` is handled by a registered [`BlockShape`]. The converter folds
//! the block list through those shapes: one node per block, edges between
//! consecutive blocks of the same container, and container bodies laid out as
//! nested nodes. [`Converter::to_blocks`] walks a graph back into the same list.

use crate::definition::Block;
use crate::error::ConversionError;
use crate::graph::{Edge, Graph, Node, NodeId, Position};
use ahash::AHashMap;
use itertools::Itertools;

mod layout;
mod shape;
mod walk;

pub use layout::LayoutOptions;
pub use shape::{BlockShape, Expansion, ForLoopShape, LOOP_BLOCKS};

use shape::{create_shape_by_name, register_default_shapes};
use walk::{GraphWalker, ROOT_SCOPE};

/// Tracing target for conversion events.
pub const TRACING_TARGET: &str = "flowdraft::converter";

pub struct Converter {
    registry: AHashMap<String, Box<dyn BlockShape>>,
    layout: LayoutOptions,
}

pub struct ConverterBuilder {
    registry: AHashMap<String, Box<dyn BlockShape>>,
    layout: LayoutOptions,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        let mut registry: AHashMap<String, Box<dyn BlockShape>> = AHashMap::new();
        register_default_shapes(&mut registry);
        Self {
            registry,
            layout: LayoutOptions::default(),
        }
    }

    /// Treats blocks of `user_block_type` like the built-in `builtin_block_type`.
    pub fn with_kind_mapping(mut self, user_block_type: &str, builtin_block_type: &str) -> Self {
        if let Some(shape) = create_shape_by_name(builtin_block_type) {
            self.registry.insert(user_block_type.to_string(), shape);
        }
        self
    }

    pub fn with_custom_shape(mut self, shape: Box<dyn BlockShape>) -> Self {
        self.registry.insert(shape.block_type().to_string(), shape);
        self
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> Converter {
        Converter {
            registry: self.registry,
            layout: self.layout,
        }
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Converter {
    fn default() -> Self {
        ConverterBuilder::new().build()
    }
}

impl Converter {
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn supports(&self, block_type: &str) -> bool {
        self.registry.contains_key(block_type)
    }

    /// Builds the editor graph for an ordered block list.
    ///
    /// Node ids are derived from block labels, so converting the same list twice
    /// yields the same ids. Any unsupported kind, duplicate label or malformed
    /// container aborts the whole conversion.
    pub fn to_graph(&self, blocks: &[Block]) -> Result<Graph, ConversionError> {
        let mut graph = Graph::default();
        self.lay_out_scope(blocks, None, &mut graph)?;

        tracing::debug!(
            target: TRACING_TARGET,
            blocks = blocks.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Built editor graph"
        );
        Ok(graph)
    }

    /// Recovers the ordered block list from an edited graph.
    pub fn to_blocks(&self, graph: &Graph) -> Result<Vec<Block>, ConversionError> {
        let walker = GraphWalker::new(graph, &self.registry)?;
        let blocks = walker.walk()?;

        tracing::debug!(
            target: TRACING_TARGET,
            nodes = graph.nodes.len(),
            blocks = blocks.len(),
            "Recovered blocks from editor graph"
        );
        Ok(blocks)
    }

    /// Adds the nodes and edges for one container and returns the height it occupies.
    fn lay_out_scope(
        &self,
        blocks: &[Block],
        parent: Option<&NodeId>,
        graph: &mut Graph,
    ) -> Result<f64, ConversionError> {
        if let Some(label) = blocks.iter().map(|b| b.label.as_str()).duplicates().next() {
            return Err(ConversionError::DuplicateBlockLabel {
                label: label.to_string(),
                scope: parent.map_or(ROOT_SCOPE, NodeId::as_str).to_string(),
            });
        }

        let start = self.layout.scope_start(parent.is_some());
        let mut cursor = start.y;
        let mut ids = Vec::with_capacity(blocks.len());

        for block in blocks {
            let shape = self.registry.get(&block.block_type).ok_or_else(|| {
                ConversionError::UnsupportedBlockKind {
                    label: block.label.clone(),
                    block_type: block.block_type.clone(),
                }
            })?;
            let Expansion { payload, children } = shape.expand(block)?;

            let id = NodeId::for_block(parent, &block.label);
            graph.nodes.push(Node {
                id: id.clone(),
                node_type: block.block_type.clone(),
                position: Position::new(start.x, cursor),
                parent_id: parent.cloned(),
                data: payload,
            });

            let inner_height = self.lay_out_scope(&children, Some(&id), graph)?;
            cursor += self.layout.extent(inner_height);
            ids.push(id);
        }

        graph.edges.extend(
            ids.into_iter()
                .tuple_windows()
                .map(|(source, target)| Edge::between(source, target)),
        );
        Ok(cursor - start.y)
    }
}
