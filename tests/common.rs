//! Common test utilities for building workflow records and an in-memory store.
use async_trait::async_trait;
use flowdraft::error::TransportError;
use flowdraft::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Record with blocks `[A, B]`, one workflow input `k1` and one AWS secret `secret1`.
#[allow(dead_code)]
pub fn scenario_record() -> Value {
    json!({
        "workflow_permanent_id": "wpid_1",
        "workflow_id": "w_1",
        "title": "Scenario",
        "description": "Two tasks in a row",
        "proxy_location": "RESIDENTIAL",
        "webhook_callback_url": "https://hooks.example.com/done",
        "totp_verification_url": null,
        "is_saved_task": false,
        "workflow_definition": {
            "parameters": [
                {
                    "key": "k1",
                    "parameter_type": "workflow",
                    "workflow_parameter_type": "string",
                    "workflow_parameter_id": "wp_1",
                    "created_at": "2024-06-01T00:00:00"
                },
                {
                    "key": "secret1",
                    "parameter_type": "aws_secret",
                    "aws_key": "prod/api-token",
                    "aws_secret_parameter_id": "asp_1"
                }
            ],
            "blocks": [
                {
                    "label": "A",
                    "block_type": "task",
                    "url": "https://example.com",
                    "navigation_goal": "Open the form",
                    "parameter_keys": ["k1"]
                },
                {
                    "label": "B",
                    "block_type": "task",
                    "continue_on_failure": true,
                    "data_extraction_goal": "Read the confirmation number"
                }
            ]
        }
    })
}

#[allow(dead_code)]
pub fn scenario_workflow() -> Workflow {
    Workflow::from_json(&scenario_record().to_string()).expect("scenario record is valid")
}

#[allow(dead_code)]
pub fn task(label: &str) -> Block {
    Block::new(label, "task").with_config("navigation_goal", json!(format!("do {}", label)))
}

#[allow(dead_code)]
pub fn for_loop(label: &str, body: Vec<Block>) -> Block {
    Block::new(label, "for_loop")
        .with_config("loop_over_parameter_key", json!("urls"))
        .with_config("loop_blocks", serde_json::to_value(body).unwrap())
}

/// A workflow whose parameters cover every parameter type.
#[allow(dead_code)]
pub fn mixed_parameters() -> Vec<Parameter> {
    let values = vec![
        json!({"key": "ctx", "parameter_type": "context", "source_parameter_key": "urls"}),
        json!({"key": "urls", "parameter_type": "workflow", "workflow_parameter_type": "json",
               "default_value": ["https://a.example", "https://b.example"]}),
        json!({"key": "login", "parameter_type": "bitwarden_login_credential",
               "bitwarden_client_id_aws_secret_key": "SKYVERN_BITWARDEN_CLIENT_ID",
               "bitwarden_client_secret_aws_secret_key": "SKYVERN_BITWARDEN_CLIENT_SECRET",
               "bitwarden_master_password_aws_secret_key": "SKYVERN_BITWARDEN_MASTER_PASSWORD",
               "bitwarden_collection_id": "col_1", "url_parameter_key": "urls"}),
        json!({"key": "secret1", "parameter_type": "aws_secret", "aws_key": "prod/api-token"}),
        json!({"key": "card", "parameter_type": "bitwarden_sensitive_information",
               "bitwarden_client_id_aws_secret_key": "id", "bitwarden_client_secret_aws_secret_key": "secret",
               "bitwarden_master_password_aws_secret_key": "password", "bitwarden_collection_id": "col_2",
               "bitwarden_identity_key": "card", "bitwarden_identity_fields": ["number", "cvv"]}),
    ];
    values
        .into_iter()
        .map(|v| Parameter::from_value(v).expect("fixture parameter is valid"))
        .collect()
}

/// An in-memory [`WorkflowStore`] that applies save bodies to its stored records.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Value>>,
    saves: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<TransportError>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn with_record(id: &str, record: Value) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .insert(id.to_string(), record);
        store
    }

    /// Makes every following `replace` fail with `error`.
    pub fn fail_with(&self, error: TransportError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn record(&self, id: &str) -> Option<Value> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Every accepted save body, in order.
    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn fetch(&self, workflow_permanent_id: &str) -> Result<WorkflowRecord, TransportError> {
        let record = self.record(workflow_permanent_id).ok_or(TransportError::Status {
            status: 404,
            body: "workflow not found".to_string(),
        })?;
        serde_json::from_value(record).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn replace(
        &self,
        workflow_permanent_id: &str,
        body: String,
    ) -> Result<Value, TransportError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let update: Value = serde_yaml::from_str(&body).map_err(|e| TransportError::Status {
            status: 422,
            body: e.to_string(),
        })?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry(workflow_permanent_id.to_string())
            .or_insert_with(|| json!({"workflow_permanent_id": workflow_permanent_id}));
        if let (Some(record), Some(update)) = (record.as_object_mut(), update.as_object()) {
            for (field, value) in update {
                record.insert(field.clone(), value.clone());
            }
        }
        self.saves
            .lock()
            .unwrap()
            .push((workflow_permanent_id.to_string(), body));
        Ok(record.clone())
    }
}
