//! jvmname CLI - prints JVM binary class names for nodes of a fixture tree

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

mod logging;

use clap::{Parser, Subcommand};
use jvmname_core::{load_fixture, render_json, render_text, render_tree, resolve_labels, BuiltTree, NameStatus};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jvmname")]
#[command(about = "Derive JVM binary class names for syntax tree nodes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print JVM class names of labeled nodes
    Resolve {
        /// Path to a JSON fixture describing the tree
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Only report these labels (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Compare resolved names with the expected names stored in the fixture
    Check {
        /// Path to a JSON fixture describing the tree
        path: PathBuf,
    },
    /// Print the whole tree annotated with JVM class names
    Annotate {
        /// Path to a JSON fixture describing the tree
        path: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { path, format, labels } => {
            let built = load(&path)?;

            for label in &labels {
                if !built.labels.contains_key(label) {
                    anyhow::bail!("Unknown label: {}", label);
                }
            }

            let reports = resolve_labels(&built, &labels);
            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&reports));
                }
                OutputFormat::Json => {
                    println!("{}", render_json(&reports));
                }
            }
        }
        Commands::Check { path } => {
            let built = load(&path)?;
            let reports: Vec<_> = resolve_labels(&built, &[])
                .into_iter()
                .filter(|r| r.expected.is_some())
                .collect();

            let failures: Vec<_> = reports
                .iter()
                .filter(|r| r.status != NameStatus::Ok)
                .cloned()
                .collect();

            if !failures.is_empty() {
                print!("{}", render_text(&failures));
                anyhow::bail!(
                    "{} of {} expected names did not match",
                    failures.len(),
                    reports.len()
                );
            }

            println!("All {} expected names match", reports.len());
        }
        Commands::Annotate { path } => {
            let built = load(&path)?;
            print!("{}", render_tree(&built.tree));
        }
    }

    Ok(())
}

/// Normalize `path` and load the fixture it points to
fn load(path: &Path) -> anyhow::Result<BuiltTree> {
    let normalized_path = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };

    if !normalized_path.exists() {
        anyhow::bail!("Path does not exist: {}", normalized_path.display());
    }

    tracing::info!(path = %normalized_path.display(), "resolving fixture");
    load_fixture(&normalized_path)
}
