//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering (labels ascending, tree in declaration order)
//! - Byte-for-byte identical output across runs

use crate::builder::BuiltTree;
use crate::error::NamingError;
use crate::naming::{jvm_class_name, resolve_all};
use crate::tree::{NodeId, NodeKind, Tree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of comparing a resolved name with its expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStatus {
    /// Resolved name equals the expected one
    Ok,
    /// Resolved name differs from the expected one
    Mismatch,
    /// No expectation recorded
    Unchecked,
    /// Resolution failed
    Error,
}

impl NameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameStatus::Ok => "ok",
            NameStatus::Mismatch => "mismatch",
            NameStatus::Unchecked => "unchecked",
            NameStatus::Error => "error",
        }
    }
}

/// Resolution report for one labeled node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NameReport {
    pub label: String,
    pub node: NodeId,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub status: NameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve labeled nodes
///
/// With an empty `filter` every label is reported; otherwise only the
/// listed labels, still in label order. Unknown labels in `filter` are
/// ignored here; callers decide whether that is an error.
pub fn resolve_labels(built: &BuiltTree, filter: &[String]) -> Vec<NameReport> {
    built
        .labels
        .iter()
        .filter(|(label, _)| filter.is_empty() || filter.contains(label))
        .filter_map(|(label, labeled)| {
            let node = built.tree.node(labeled.node)?;
            let (jvm_name, error) = match jvm_class_name(&built.tree, labeled.node) {
                Ok(name) => (Some(name), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let status = match (&jvm_name, &labeled.expected) {
                (None, _) => NameStatus::Error,
                (Some(_), None) => NameStatus::Unchecked,
                (Some(actual), Some(expected)) if actual == expected => NameStatus::Ok,
                (Some(_), Some(_)) => NameStatus::Mismatch,
            };

            Some(NameReport {
                label: label.clone(),
                node: node.id,
                kind: node.kind,
                name: node.name.clone(),
                jvm_name,
                expected: labeled.expected.clone(),
                status,
                error,
            })
        })
        .collect()
}

/// Render reports as text output
pub fn render_text(reports: &[NameReport]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<24} {:<9} {:<10} {}\n",
        "LABEL", "KIND", "STATUS", "JVM NAME"
    ));

    for report in reports {
        let resolved = match (&report.jvm_name, &report.error) {
            (Some(name), _) => name.clone(),
            (None, Some(error)) => error.clone(),
            (None, None) => "-".to_string(),
        };
        output.push_str(&format!(
            "{:<24} {:<9} {:<10} {}\n",
            truncate_or_pad(&report.label, 24),
            report.kind,
            report.status.as_str(),
            resolved
        ));
        if report.status == NameStatus::Mismatch {
            if let Some(expected) = &report.expected {
                output.push_str(&format!("{:<45} expected {}\n", "", expected));
            }
        }
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[NameReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Render the whole tree, one node per line, annotated with JVM names
///
/// ```text
/// FILE(test.kt) {
///   CLASS(Task1) { // Task1
///     FUNCTION(member) // Task1
///   }
/// }
/// ```
pub fn render_tree(tree: &Tree) -> String {
    let names: BTreeMap<NodeId, Result<String, NamingError>> = resolve_all(tree).into_iter().collect();
    let mut output = String::new();
    render_node(tree, &names, tree.root(), 0, &mut output);
    output
}

fn render_node(
    tree: &Tree,
    names: &BTreeMap<NodeId, Result<String, NamingError>>,
    id: NodeId,
    depth: usize,
    output: &mut String,
) {
    let Some(node) = tree.node(id) else {
        return;
    };

    let indent = "  ".repeat(depth);
    let head = format!("{}{}({})", indent, node.kind, node.name.as_deref().unwrap_or(""));
    // FILE and PACKAGE nodes are absent from `names`
    let annotation = names.get(&id).map(|resolved| match resolved {
        Ok(name) => name.clone(),
        Err(e) => format!("error: {}", e),
    });

    let opener = if node.children.is_empty() { "" } else { " {" };
    match annotation {
        Some(name) => output.push_str(&format!("{}{} // {}\n", head, opener, name)),
        None => output.push_str(&format!("{}{}\n", head, opener)),
    }

    if !node.children.is_empty() {
        for &child in &node.children {
            render_node(tree, names, child, depth + 1, output);
        }
        output.push_str(&format!("{}}}\n", indent));
    }
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
