use crate::definition::WorkflowRecord;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// The remote workflow store the persister talks to.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn fetch(&self, workflow_permanent_id: &str) -> Result<WorkflowRecord, TransportError>;

    /// Replaces the stored definition with an encoded save body, all or nothing.
    async fn replace(&self, workflow_permanent_id: &str, body: String)
    -> Result<Value, TransportError>;
}
