//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load, convert, edit and save a workflow.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowdraft::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let record = std::fs::read_to_string("path/to/workflow.json")?;
//! let workflow = Workflow::from_json(&record)?;
//!
//! let converter = Converter::default();
//! let graph = converter.to_graph(workflow.blocks())?;
//! let editable = editable_parameters(workflow.parameters());
//!
//! let blocks = converter.to_blocks(&graph)?;
//! let update = reconcile_editable(&workflow, editable, blocks, workflow.title.clone())?;
//! println!("{}", update.to_yaml()?);
//! # Ok(())
//! # }
//! ```

// Data model
pub use crate::definition::{
    Block, Parameter, ParameterType, Workflow, WorkflowDefinition, WorkflowParameterType,
    WorkflowRecord,
};

// Classification
pub use crate::taxonomy::{
    EditableParameter, Ownership, classify, editable_parameters, extract_system_managed,
    to_editable_view,
};

// Conversion
pub use crate::converter::{BlockShape, Converter, Expansion, LayoutOptions};
pub use crate::graph::{Edge, Graph, Node, NodeId, Position};

// Saving
pub use crate::persister::{
    ClientConfig, DefinitionPersister, HttpWorkflowStore, Invalidation, WorkflowStore,
};
pub use crate::reconciler::{WorkflowDefinitionUpdate, reconcile, reconcile_editable};
pub use crate::session::EditorSession;

// Error types
pub use crate::error::{
    ConversionError, DefinitionError, GraphError, TransportError, WorkflowError,
};
