//! Loading workflows from and saving definitions to the remote store.
//!
//! A save is a single full replace of the remote definition. On success the persister
//! broadcasts [`Invalidation`] signals so whoever caches the workflow, or the
//! workflow listing, knows to refetch. On failure nothing is broadcast and nothing is
//! retried.

use crate::definition::Workflow;
use crate::error::WorkflowError;
use crate::reconciler::WorkflowDefinitionUpdate;
use serde_json::Value;
use tokio::sync::broadcast;

mod config;
mod http;
mod store;

pub use config::{API_KEY_HEADER, ClientConfig, DEFAULT_TIMEOUT};
pub use http::HttpWorkflowStore;
pub use store::WorkflowStore;

/// Tracing target for persister events.
pub const TRACING_TARGET: &str = "flowdraft::persister";

const INVALIDATION_CAPACITY: usize = 64;

/// A cached view that is out of date after a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Invalidation {
    Workflow(String),
    WorkflowList,
}

pub struct DefinitionPersister<S> {
    store: S,
    invalidations: broadcast::Sender<Invalidation>,
}

impl<S: WorkflowStore> DefinitionPersister<S> {
    pub fn new(store: S) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            store,
            invalidations,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.invalidations.subscribe()
    }

    pub async fn load(&self, workflow_permanent_id: &str) -> Result<Workflow, WorkflowError> {
        let record = self.store.fetch(workflow_permanent_id).await?;
        let mut workflow = Workflow::try_from(record)?;
        if workflow.workflow_permanent_id.is_empty() {
            workflow.workflow_permanent_id = workflow_permanent_id.to_string();
        }

        tracing::info!(
            target: TRACING_TARGET,
            workflow = workflow_permanent_id,
            parameters = workflow.parameters().len(),
            blocks = workflow.blocks().len(),
            "Loaded workflow"
        );
        Ok(workflow)
    }

    /// Encodes `update` as YAML and replaces the remote definition with it.
    pub async fn save(
        &self,
        workflow_permanent_id: &str,
        update: &WorkflowDefinitionUpdate,
    ) -> Result<Value, WorkflowError> {
        let body = update
            .to_yaml()
            .map_err(|e| WorkflowError::Encode(e.to_string()))?;

        match self.store.replace(workflow_permanent_id, body).await {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    workflow = workflow_permanent_id,
                    "Saved workflow definition"
                );
                // No subscribers is not an error.
                let _ = self
                    .invalidations
                    .send(Invalidation::Workflow(workflow_permanent_id.to_string()));
                let _ = self.invalidations.send(Invalidation::WorkflowList);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    workflow = workflow_permanent_id,
                    error = %err,
                    "Failed to save workflow definition"
                );
                Err(err.into())
            }
        }
    }
}
