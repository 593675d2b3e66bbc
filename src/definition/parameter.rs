use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, IntoStaticStr};

/// The closed set of parameter type tags a workflow definition may carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParameterType {
    Workflow,
    BitwardenLoginCredential,
    AwsSecret,
    BitwardenSensitiveInformation,
    Context,
}

/// Data type of a user-declared workflow input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowParameterType {
    String,
    Integer,
    Float,
    Boolean,
    Json,
    FileUrl,
}

/// A user-declared, typed input of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub workflow_parameter_type: WorkflowParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// A login credential looked up in a Bitwarden collection, optionally matched by URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitwardenLoginCredentialParameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bitwarden_client_id_aws_secret_key: String,
    pub bitwarden_client_secret_aws_secret_key: String,
    pub bitwarden_master_password_aws_secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitwarden_collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_parameter_key: Option<String>,
}

/// A secret resolved from AWS at run time. System-managed: fields this crate does
/// not model are kept in `extra` and echoed back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsSecretParameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub aws_key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitwardenSensitiveInformationParameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bitwarden_client_id_aws_secret_key: String,
    pub bitwarden_client_secret_aws_secret_key: String,
    pub bitwarden_master_password_aws_secret_key: String,
    pub bitwarden_collection_id: String,
    pub bitwarden_identity_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bitwarden_identity_fields: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A value produced at run time by another parameter or block output.
///
/// The source is referenced either by `source_parameter_key` or by a nested
/// `source` object, which stays in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextParameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_parameter_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named value consumed by blocks at run time, tagged by `parameter_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "parameter_type", rename_all = "snake_case")]
pub enum Parameter {
    Workflow(WorkflowParameter),
    BitwardenLoginCredential(BitwardenLoginCredentialParameter),
    AwsSecret(AwsSecretParameter),
    BitwardenSensitiveInformation(BitwardenSensitiveInformationParameter),
    Context(ContextParameter),
}

impl Parameter {
    pub fn key(&self) -> &str {
        match self {
            Parameter::Workflow(p) => &p.key,
            Parameter::BitwardenLoginCredential(p) => &p.key,
            Parameter::AwsSecret(p) => &p.key,
            Parameter::BitwardenSensitiveInformation(p) => &p.key,
            Parameter::Context(p) => &p.key,
        }
    }

    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Parameter::Workflow(_) => ParameterType::Workflow,
            Parameter::BitwardenLoginCredential(_) => ParameterType::BitwardenLoginCredential,
            Parameter::AwsSecret(_) => ParameterType::AwsSecret,
            Parameter::BitwardenSensitiveInformation(_) => {
                ParameterType::BitwardenSensitiveInformation
            }
            Parameter::Context(_) => ParameterType::Context,
        }
    }

    /// Decodes one parameter from its raw record form.
    ///
    /// The type tag is checked against the closed set before the variant fields are
    /// decoded, so an unrecognized tag is reported as such instead of as a generic
    /// decoding failure.
    pub fn from_value(value: Value) -> Result<Self, DefinitionError> {
        let key = value
            .get("key")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tag = value
            .get("parameter_type")
            .and_then(Value::as_str)
            .ok_or_else(|| DefinitionError::InvalidParameter {
                key: key.clone(),
                message: "missing 'parameter_type' tag".to_string(),
            })?;

        if tag.parse::<ParameterType>().is_err() {
            return Err(DefinitionError::UnknownParameterType {
                key,
                parameter_type: tag.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| DefinitionError::InvalidParameter {
            key,
            message: e.to_string(),
        })
    }
}
