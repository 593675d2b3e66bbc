use clap::{Parser, Subcommand};
use flowdraft::prelude::*;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Inspect workflow records offline: the editor graph, the editable parameters, and
/// the save body an unchanged save would send.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the editor graph (nodes and edges) as JSON
    Graph {
        /// Path to a workflow record JSON file
        record_path: String,
    },
    /// Print the parameters the editor would let the user change
    Parameters {
        /// Path to a workflow record JSON file
        record_path: String,
    },
    /// Print the YAML body of a save with no edits
    Payload {
        /// Path to a workflow record JSON file
        record_path: String,
        /// Title to save under instead of the current one
        #[arg(short, long)]
        title: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let converter = Converter::default();

    match cli.command {
        Command::Graph { record_path } => {
            let workflow = load_workflow(&record_path);
            let graph = converter
                .to_graph(workflow.blocks())
                .unwrap_or_else(|e| exit_with_error(&format!("Graph conversion failed: {}", e)));
            print_json(&graph);
        }
        Command::Parameters { record_path } => {
            let workflow = load_workflow(&record_path);
            print_json(&editable_parameters(workflow.parameters()));
        }
        Command::Payload { record_path, title } => {
            let workflow = load_workflow(&record_path);
            let blocks = converter
                .to_graph(workflow.blocks())
                .and_then(|graph| converter.to_blocks(&graph))
                .unwrap_or_else(|e| exit_with_error(&format!("Graph conversion failed: {}", e)));
            let title = title.unwrap_or_else(|| workflow.title.clone());
            let update = reconcile_editable(
                &workflow,
                editable_parameters(workflow.parameters()),
                blocks,
                title,
            )
            .unwrap_or_else(|e| exit_with_error(&format!("Reconciliation failed: {}", e)));
            let yaml = update
                .to_yaml()
                .unwrap_or_else(|e| exit_with_error(&format!("YAML encoding failed: {}", e)));
            print!("{}", yaml);
        }
    }
}

fn load_workflow(path: &str) -> Workflow {
    let record = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow record '{}': {}", path, e))
    });
    Workflow::from_json(&record)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid workflow record: {}", e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    let rendered = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("JSON encoding failed: {}", e)));
    println!("{}", rendered);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
