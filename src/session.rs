//! One editing session over one workflow.
//!
//! The session owns the loaded [`Workflow`], the editor [`Graph`] derived from it and
//! the editable parameter view. Saving takes `&mut self`, so a session can never
//! have two saves in flight at once.

use crate::converter::Converter;
use crate::definition::{Block, Workflow};
use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::persister::{DefinitionPersister, Invalidation, WorkflowStore};
use crate::reconciler::reconcile_editable;
use crate::taxonomy::{EditableParameter, editable_parameters};
use tokio::sync::broadcast::{self, error::TryRecvError};

pub struct EditorSession<S> {
    persister: DefinitionPersister<S>,
    converter: Converter,
    workflow: Workflow,
    graph: Graph,
    editable: Vec<EditableParameter>,
    invalidations: broadcast::Receiver<Invalidation>,
    stale: bool,
}

impl<S: WorkflowStore> EditorSession<S> {
    /// Loads the workflow and derives the graph and the editable parameter view.
    pub async fn open(
        persister: DefinitionPersister<S>,
        converter: Converter,
        workflow_permanent_id: &str,
    ) -> Result<Self, WorkflowError> {
        let workflow = persister.load(workflow_permanent_id).await?;
        let graph = converter.to_graph(workflow.blocks())?;
        let editable = editable_parameters(workflow.parameters());
        let invalidations = persister.subscribe();

        Ok(Self {
            persister,
            converter,
            workflow,
            graph,
            editable,
            invalidations,
            stale: false,
        })
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn editable_parameters(&self) -> &[EditableParameter] {
        &self.editable
    }

    pub fn persister(&self) -> &DefinitionPersister<S> {
        &self.persister
    }

    /// Whether a save has invalidated the loaded copy of this workflow.
    pub fn is_stale(&mut self) -> bool {
        self.drain_invalidations();
        self.stale
    }

    /// Reconciles the edits against the loaded workflow and saves them.
    ///
    /// The graph is never touched, so after a failed save the same edits can be
    /// saved again.
    pub async fn handle_save(
        &mut self,
        parameters: Vec<EditableParameter>,
        blocks: Vec<Block>,
        title: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let update = reconcile_editable(&self.workflow, parameters, blocks, title)?;
        self.persister
            .save(&self.workflow.workflow_permanent_id, &update)
            .await?;
        Ok(())
    }

    /// Saves the blocks recovered from the current graph.
    pub async fn save_graph(
        &mut self,
        parameters: Vec<EditableParameter>,
        title: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let blocks = self.converter.to_blocks(&self.graph)?;
        self.handle_save(parameters, blocks, title).await
    }

    /// Refetches and re-derives everything if the loaded copy was invalidated.
    ///
    /// Node positions survive the reload for every node id that still exists.
    /// Returns whether a reload happened.
    pub async fn refresh(&mut self) -> Result<bool, WorkflowError> {
        self.drain_invalidations();
        if !self.stale {
            return Ok(false);
        }

        let workflow = self
            .persister
            .load(&self.workflow.workflow_permanent_id)
            .await?;
        let mut graph = self.converter.to_graph(workflow.blocks())?;
        graph.apply_positions(&self.graph.positions());

        self.editable = editable_parameters(workflow.parameters());
        self.workflow = workflow;
        self.graph = graph;
        self.stale = false;
        Ok(true)
    }

    fn drain_invalidations(&mut self) {
        loop {
            match self.invalidations.try_recv() {
                Ok(Invalidation::Workflow(id)) if id == self.workflow.workflow_permanent_id => {
                    self.stale = true;
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(_)) => self.stale = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
