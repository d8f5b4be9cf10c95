use std::path::PathBuf;
use std::process::ExitCode;

use annotation_scope::{ContextId, ContextTree, Outline, OutlineTree, Result};
use clap::Parser;
use serde_json::{json, Map, Value};

/// Build a context tree from an outline file and report what every node sees.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Outline JSON file describing the scanned source
    outline: PathBuf,
    /// Type reference to resolve in every node's scope (repeatable)
    #[arg(long = "resolve")]
    references: Vec<String>,
    /// Accepted version; reports whether each node matches (repeatable)
    #[arg(long = "accept")]
    versions: Vec<String>,
}

fn main() -> ExitCode {
    // Logs go to stderr so the report on stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments.
    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String> {
    // Load the outline and build the tree.
    let built = Outline::from_path(&args.outline)?.build()?;
    let nodes: Vec<Value> = built
        .tree
        .ids()
        .map(|id| node_report(&built, id, args))
        .collect();
    Ok(serde_json::to_string_pretty(&json!({ "nodes": nodes }))?)
}

fn node_report(built: &OutlineTree, id: ContextId, args: &Args) -> Value {
    let tree: &ContextTree = &built.tree;
    // Optional keys are only emitted when they carry something.
    let mut report = Map::new();
    report.insert("path".into(), json!(built.path(id)));
    report.insert("location".into(), json!(tree.describe_location(id)));
    report.insert("version".into(), json!(tree.version(id)));
    if !args.versions.is_empty() {
        report.insert("version_matches".into(), json!(tree.matches_version(id, args.versions.as_slice())));
    }
    if let Some(summary) = tree.doc_summary(id) {
        report.insert("summary".into(), json!(summary));
    }
    if !args.references.is_empty() {
        let resolved: Map<String, Value> = args
            .references
            .iter()
            .map(|r| (r.clone(), json!(tree.fully_qualified_name(id, r))))
            .collect();
        report.insert("resolved".into(), Value::Object(resolved));
    }
    Value::Object(report)
}
