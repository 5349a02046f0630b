//! JSON tree descriptions
//!
//! A fixture is one nested JSON object per node:
//!
//! ```json
//! {
//!   "kind": "file",
//!   "name": "test.kt",
//!   "children": [
//!     { "kind": "class", "name": "Task1", "label": "top", "expected": "Task1" }
//!   ]
//! }
//! ```
//!
//! All fields except `kind` are optional. Unknown fields are rejected.

use crate::builder::{BuiltTree, NodeBuilder};
use crate::tree::NodeKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One node of a fixture document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureNode {
    pub kind: NodeKind,

    #[serde(default)]
    pub name: Option<String>,

    /// Label used to refer to this node from reports
    #[serde(default)]
    pub label: Option<String>,

    /// Expected JVM class name; requires a label
    #[serde(default)]
    pub expected: Option<String>,

    #[serde(default)]
    pub children: Vec<FixtureNode>,
}

impl FixtureNode {
    fn into_builder(self) -> Result<NodeBuilder> {
        if self.expected.is_some() && self.label.is_none() {
            anyhow::bail!(
                "{} node {} has an expected name but no label",
                self.kind,
                self.name.as_deref().unwrap_or("<anonymous>")
            );
        }

        let mut builder = NodeBuilder::new(self.kind, self.name);
        builder.set_label(self.label);
        builder.set_expected(self.expected);
        for child in self.children {
            builder.push(child.into_builder()?);
        }
        Ok(builder)
    }
}

/// Parse a fixture document and build its tree
///
/// Returns an error if:
/// - The JSON does not describe a fixture
/// - A label is reused or an expected name lacks a label
/// - The tree violates the FILE/PACKAGE/CLASS/FUNCTION/LAMBDA grammar
pub fn parse_fixture(src: &str) -> Result<BuiltTree> {
    let root: FixtureNode = serde_json::from_str(src).context("Failed to parse fixture JSON")?;
    let built = root.into_builder()?.build()?;
    built.tree.validate()?;

    tracing::debug!(
        nodes = built.tree.len(),
        labels = built.labels.len(),
        "built fixture tree"
    );

    Ok(built)
}

/// Read and parse a fixture file
pub fn load_fixture(path: &Path) -> Result<BuiltTree> {
    tracing::debug!(path = %path.display(), "loading fixture");

    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;

    parse_fixture(&src).with_context(|| format!("Invalid fixture: {}", path.display()))
}
