use super::block::Block;
use super::parameter::Parameter;
use crate::error::DefinitionError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The serializable unit: ordered blocks plus the parameter set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub parameters: Vec<Parameter>,
    pub blocks: Vec<Block>,
}

/// The aggregate root of one editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub workflow_permanent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub proxy_location: Option<String>,
    pub webhook_callback_url: Option<String>,
    pub totp_verification_url: Option<String>,
    pub is_saved_task: bool,
    pub workflow_definition: WorkflowDefinition,
}

/// A workflow exactly as the backend returns it.
///
/// Parameters stay untyped here; converting into [`Workflow`] classifies each one
/// and rejects unknown parameter types.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRecord {
    #[serde(default)]
    pub workflow_permanent_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proxy_location: Option<String>,
    #[serde(default)]
    pub webhook_callback_url: Option<String>,
    #[serde(default)]
    pub totp_verification_url: Option<String>,
    #[serde(default)]
    pub is_saved_task: bool,
    pub workflow_definition: RawDefinition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDefinition {
    #[serde(default)]
    pub parameters: Vec<Value>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Workflow {
    /// Parses and validates a workflow record received as JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let record: WorkflowRecord = serde_json::from_str(json)
            .map_err(|e| DefinitionError::RecordParseError(e.to_string()))?;
        Self::try_from(record)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.workflow_definition.parameters
    }

    pub fn blocks(&self) -> &[Block] {
        &self.workflow_definition.blocks
    }
}

impl TryFrom<WorkflowRecord> for Workflow {
    type Error = DefinitionError;

    fn try_from(record: WorkflowRecord) -> Result<Self, Self::Error> {
        let parameters = record
            .workflow_definition
            .parameters
            .into_iter()
            .map(Parameter::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique_keys(&parameters)?;

        Ok(Self {
            workflow_permanent_id: record.workflow_permanent_id,
            title: record.title,
            description: record.description,
            proxy_location: record.proxy_location,
            webhook_callback_url: record.webhook_callback_url,
            totp_verification_url: record.totp_verification_url,
            is_saved_task: record.is_saved_task,
            workflow_definition: WorkflowDefinition {
                parameters,
                blocks: record.workflow_definition.blocks,
            },
        })
    }
}

/// Fails on the first parameter key seen twice.
pub(crate) fn ensure_unique_keys<'a>(
    parameters: impl IntoIterator<Item = &'a Parameter>,
) -> Result<(), DefinitionError> {
    let mut seen = AHashSet::new();
    for parameter in parameters {
        if !seen.insert(parameter.key()) {
            return Err(DefinitionError::ParameterKeyCollision {
                key: parameter.key().to_string(),
            });
        }
    }
    Ok(())
}
