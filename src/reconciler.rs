//! The save transaction: merges edited user parameters with the system-managed
//! parameters of the last-known definition.

use crate::definition::workflow::ensure_unique_keys;
use crate::definition::{Block, Parameter, Workflow, WorkflowDefinition};
use crate::error::DefinitionError;
use crate::taxonomy::{EditableParameter, Ownership, classify, extract_system_managed};
use serde::Serialize;

/// Tracing target for reconciliation events.
pub const TRACING_TARGET: &str = "flowdraft::reconciler";

/// The payload that replaces the remote workflow on save.
///
/// Field order is the wire order of the save body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDefinitionUpdate {
    pub title: String,
    pub description: Option<String>,
    pub proxy_location: Option<String>,
    pub webhook_callback_url: Option<String>,
    pub totp_verification_url: Option<String>,
    pub workflow_definition: WorkflowDefinition,
    pub is_saved_task: bool,
}

/// Builds the update payload for a save.
///
/// Output parameters are the system-managed parameters of `prior`, in their original
/// order, followed by `edited_parameters`. Every other top-level setting comes from
/// `prior` unchanged. Fails without producing anything if an edited parameter is of
/// a system-managed type or reuses a key already taken.
pub fn reconcile(
    prior: &Workflow,
    edited_parameters: Vec<Parameter>,
    edited_blocks: Vec<Block>,
    title: impl Into<String>,
) -> Result<WorkflowDefinitionUpdate, DefinitionError> {
    if let Some(parameter) = edited_parameters
        .iter()
        .find(|p| classify(p) == Ownership::SystemManaged)
    {
        return Err(DefinitionError::NotUserEditable {
            key: parameter.key().to_string(),
            parameter_type: parameter.parameter_type(),
        });
    }

    let system_managed = extract_system_managed(prior.parameters());
    ensure_unique_keys(system_managed.iter().chain(edited_parameters.iter()))?;

    tracing::debug!(
        target: TRACING_TARGET,
        workflow = %prior.workflow_permanent_id,
        system_managed = system_managed.len(),
        edited = edited_parameters.len(),
        blocks = edited_blocks.len(),
        "Reconciled save payload"
    );

    let mut parameters = system_managed;
    parameters.extend(edited_parameters);

    Ok(WorkflowDefinitionUpdate {
        title: title.into(),
        description: prior.description.clone(),
        proxy_location: prior.proxy_location.clone(),
        webhook_callback_url: prior.webhook_callback_url.clone(),
        totp_verification_url: prior.totp_verification_url.clone(),
        workflow_definition: WorkflowDefinition {
            parameters,
            blocks: edited_blocks,
        },
        is_saved_task: prior.is_saved_task,
    })
}

/// [`reconcile`] for parameters coming straight from the parameter editor.
pub fn reconcile_editable(
    prior: &Workflow,
    edited_parameters: Vec<EditableParameter>,
    edited_blocks: Vec<Block>,
    title: impl Into<String>,
) -> Result<WorkflowDefinitionUpdate, DefinitionError> {
    let materialized = edited_parameters
        .into_iter()
        .map(EditableParameter::materialize)
        .collect();
    reconcile(prior, materialized, edited_blocks, title)
}

impl WorkflowDefinitionUpdate {
    /// Encodes the update as the YAML save body.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
