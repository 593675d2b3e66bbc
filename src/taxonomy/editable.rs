use crate::definition::{BitwardenLoginCredentialParameter, Parameter, WorkflowParameter, WorkflowParameterType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Secret names a newly materialized login credential resolves its Bitwarden
/// client id, client secret and master password from.
pub const BITWARDEN_CLIENT_ID_AWS_SECRET_KEY: &str = "SKYVERN_BITWARDEN_CLIENT_ID";
pub const BITWARDEN_CLIENT_SECRET_AWS_SECRET_KEY: &str = "SKYVERN_BITWARDEN_CLIENT_SECRET";
pub const BITWARDEN_MASTER_PASSWORD_AWS_SECRET_KEY: &str = "SKYVERN_BITWARDEN_MASTER_PASSWORD";

/// The projection of a user-editable parameter shown in the parameter editor.
///
/// Serializes with the camelCase field names and the `parameterType` tag the canvas
/// expects (`"workflow"` or `"credential"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "parameterType", rename_all = "camelCase")]
pub enum EditableParameter {
    #[serde(rename_all = "camelCase")]
    Workflow {
        key: String,
        data_type: WorkflowParameterType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Credential {
        key: String,
        collection_id: Option<String>,
        url_parameter_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl EditableParameter {
    /// A workflow input with no default value or description.
    pub fn workflow(key: impl Into<String>, data_type: WorkflowParameterType) -> Self {
        EditableParameter::Workflow {
            key: key.into(),
            data_type,
            default_value: None,
            description: None,
        }
    }

    pub fn credential(
        key: impl Into<String>,
        collection_id: Option<String>,
        url_parameter_key: Option<String>,
    ) -> Self {
        EditableParameter::Credential {
            key: key.into(),
            collection_id,
            url_parameter_key,
            description: None,
        }
    }

    /// Sets the default value of a workflow input. Credentials are returned unchanged.
    pub fn with_default_value(mut self, value: Value) -> Self {
        if let EditableParameter::Workflow { default_value, .. } = &mut self {
            *default_value = Some(value);
        }
        self
    }

    pub fn key(&self) -> &str {
        match self {
            EditableParameter::Workflow { key, .. } | EditableParameter::Credential { key, .. } => {
                key
            }
        }
    }

    /// Turns the edited view back into a full parameter ready to be persisted.
    pub fn materialize(self) -> Parameter {
        match self {
            EditableParameter::Workflow {
                key,
                data_type,
                default_value,
                description,
            } => Parameter::Workflow(WorkflowParameter {
                key,
                description,
                workflow_parameter_type: data_type,
                default_value,
            }),
            EditableParameter::Credential {
                key,
                collection_id,
                url_parameter_key,
                description,
            } => Parameter::BitwardenLoginCredential(BitwardenLoginCredentialParameter {
                key,
                description,
                bitwarden_client_id_aws_secret_key: BITWARDEN_CLIENT_ID_AWS_SECRET_KEY.to_string(),
                bitwarden_client_secret_aws_secret_key: BITWARDEN_CLIENT_SECRET_AWS_SECRET_KEY
                    .to_string(),
                bitwarden_master_password_aws_secret_key:
                    BITWARDEN_MASTER_PASSWORD_AWS_SECRET_KEY.to_string(),
                bitwarden_collection_id: collection_id,
                url_parameter_key,
            }),
        }
    }
}
