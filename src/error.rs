use crate::definition::ParameterType;
use thiserror::Error;

/// Errors raised while decoding, classifying or reconciling workflow parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Parameter '{key}' has an unknown parameter type: '{parameter_type}'")]
    UnknownParameterType { key: String, parameter_type: String },

    #[error("Parameter '{key}' could not be decoded: {message}")]
    InvalidParameter { key: String, message: String },

    #[error("Parameter key '{key}' is used more than once")]
    ParameterKeyCollision { key: String },

    #[error("Parameter '{key}' of type '{parameter_type}' is managed by the system and cannot be edited")]
    NotUserEditable {
        key: String,
        parameter_type: ParameterType,
    },

    #[error("Failed to parse workflow record: {0}")]
    RecordParseError(String),
}

/// Errors raised when walking a graph back into an ordered block list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Edge '{edge_id}' references node '{node_id}', which is not in the graph")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("Edge '{edge_id}' connects nodes that live in different containers")]
    CrossScopeEdge { edge_id: String },

    #[error("Node '{node_id}' is nested in '{parent_id}', which is not in the graph")]
    UnknownParent { node_id: String, parent_id: String },

    #[error("Node id '{0}' appears more than once")]
    DuplicateNodeId(String),

    #[error("No entry node found in scope '{scope}'")]
    MissingEntry { scope: String },

    #[error("Scope '{scope}' has more than one entry node: {candidates:?}")]
    AmbiguousEntry {
        scope: String,
        candidates: Vec<String>,
    },

    #[error("Node '{0}' has more than one outgoing edge")]
    Branching(String),

    #[error("Cycle detected at node '{0}'")]
    CycleDetected(String),

    #[error("Node '{0}' is nested inside itself through its parent chain")]
    ParentCycle(String),

    #[error("Node '{0}' is not reachable from its scope's entry node")]
    UnreachableNode(String),
}

/// Errors raised while converting between blocks and the editor graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Block '{label}' has an unregistered or unsupported block type: '{block_type}'")]
    UnsupportedBlockKind { label: String, block_type: String },

    #[error("Block label '{label}' is used more than once in scope '{scope}'")]
    DuplicateBlockLabel { label: String, scope: String },

    #[error("Block '{label}' has invalid configuration: {message}")]
    InvalidBlockConfig { label: String, message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failures talking to the remote workflow store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err.to_string())
    }
}

/// Top-level error for operations that span several components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to encode save payload: {0}")]
    Encode(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<GraphError> for WorkflowError {
    fn from(err: GraphError) -> Self {
        WorkflowError::Conversion(ConversionError::Graph(err))
    }
}
