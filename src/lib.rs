//! # flowdraft - Workflow Definitions for Visual Editors
//!
//! **flowdraft** sits between a visual workflow canvas and the backend that stores
//! workflow definitions. It turns a stored definition (an ordered list of blocks
//! plus a parameter set) into a node/edge graph the canvas can edit, turns the
//! edited graph back into blocks, and reconciles the parameters the user may edit
//! with the ones the system manages before saving.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: fetch a [`definition::Workflow`] through a [`persister::WorkflowStore`].
//!     Unknown parameter types are rejected here.
//! 2.  **Convert**: [`converter::Converter::to_graph`] builds the editor graph. Node ids
//!     are derived from block labels, so they are stable across reloads.
//! 3.  **Edit**: the canvas mutates the [`graph::Graph`] and the
//!     [`taxonomy::EditableParameter`] list. System-managed parameters are never exposed.
//! 4.  **Save**: [`reconciler::reconcile`] puts the untouched system-managed parameters
//!     in front of the edited ones, and [`persister::DefinitionPersister::save`] replaces
//!     the remote definition with a YAML body.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowdraft::prelude::*;
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new(Url::parse("http://localhost:8000/api/v1/")?)
//!     .with_api_key("my-api-key");
//! let persister = DefinitionPersister::new(HttpWorkflowStore::new(config)?);
//!
//! let mut session = EditorSession::open(persister, Converter::default(), "wpid_123").await?;
//! println!("{} nodes on the canvas", session.graph().nodes.len());
//!
//! // The canvas edits the graph and the parameters, then commits:
//! let parameters = session.editable_parameters().to_vec();
//! let title = session.workflow().title.clone();
//! session.save_graph(parameters, title).await?;
//! # Ok(())
//! # }
//! ```

pub mod converter;
pub mod definition;
pub mod error;
pub mod graph;
pub mod persister;
pub mod prelude;
pub mod reconciler;
pub mod session;
pub mod taxonomy;
