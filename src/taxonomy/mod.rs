//! Parameter classification.
//!
//! Every parameter type belongs to exactly one ownership regime. User-editable
//! parameters are projected into [`EditableParameter`]s for the parameter editor;
//! system-managed ones are never shown and are carried through saves verbatim.

use crate::definition::{Parameter, ParameterType};
use crate::error::DefinitionError;
use itertools::{Either, Itertools};

mod editable;

pub use editable::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    UserEditable,
    SystemManaged,
}

impl ParameterType {
    pub const fn ownership(self) -> Ownership {
        match self {
            ParameterType::Workflow | ParameterType::BitwardenLoginCredential => {
                Ownership::UserEditable
            }
            ParameterType::AwsSecret
            | ParameterType::BitwardenSensitiveInformation
            | ParameterType::Context => Ownership::SystemManaged,
        }
    }
}

pub fn classify(parameter: &Parameter) -> Ownership {
    parameter.parameter_type().ownership()
}

/// Classifies a raw `parameter_type` tag, failing on anything outside the closed set.
pub fn classify_tag(key: &str, parameter_type: &str) -> Result<Ownership, DefinitionError> {
    parameter_type
        .parse::<ParameterType>()
        .map(ParameterType::ownership)
        .map_err(|_| DefinitionError::UnknownParameterType {
            key: key.to_string(),
            parameter_type: parameter_type.to_string(),
        })
}

/// Splits parameters into `(system_managed, user_editable)`, preserving order within each side.
pub fn partition(parameters: &[Parameter]) -> (Vec<&Parameter>, Vec<&Parameter>) {
    parameters
        .iter()
        .partition_map(|parameter| match classify(parameter) {
            Ownership::SystemManaged => Either::Left(parameter),
            Ownership::UserEditable => Either::Right(parameter),
        })
}

/// Returns exactly the system-managed parameters, in their original order.
pub fn extract_system_managed(parameters: &[Parameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .filter(|parameter| classify(parameter) == Ownership::SystemManaged)
        .cloned()
        .collect()
}

pub fn to_editable_view(parameter: &Parameter) -> Result<EditableParameter, DefinitionError> {
    project(parameter).ok_or_else(|| DefinitionError::NotUserEditable {
        key: parameter.key().to_string(),
        parameter_type: parameter.parameter_type(),
    })
}

/// Filters to the user-editable parameters and projects each one for the editor.
pub fn editable_parameters(parameters: &[Parameter]) -> Vec<EditableParameter> {
    parameters.iter().filter_map(project).collect()
}

/// The editor view of a user-editable parameter, `None` for system-managed kinds.
fn project(parameter: &Parameter) -> Option<EditableParameter> {
    match parameter {
        Parameter::Workflow(p) => Some(EditableParameter::Workflow {
            key: p.key.clone(),
            data_type: p.workflow_parameter_type,
            default_value: p.default_value.clone(),
            description: p.description.clone(),
        }),
        Parameter::BitwardenLoginCredential(p) => Some(EditableParameter::Credential {
            key: p.key.clone(),
            collection_id: p.bitwarden_collection_id.clone(),
            url_parameter_key: p.url_parameter_key.clone(),
            description: p.description.clone(),
        }),
        Parameter::AwsSecret(_)
        | Parameter::BitwardenSensitiveInformation(_)
        | Parameter::Context(_) => None,
    }
}
