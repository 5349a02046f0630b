//! Error types for name resolution and tree construction

use crate::tree::{NodeId, NodeKind};
use thiserror::Error;

/// Failure to derive a JVM class name
///
/// Both variants are deterministic functions of the tree shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// No JVM class is generated for this kind of node
    #[error("no JVM class is generated for {kind} node {node}")]
    InvalidNodeKind { node: NodeId, kind: NodeKind },

    /// A required ancestor, name, or node is missing
    #[error("malformed tree at node {node}: {reason}")]
    MalformedTree { node: NodeId, reason: &'static str },
}

impl NamingError {
    pub(crate) fn malformed(node: NodeId, reason: &'static str) -> Self {
        NamingError::MalformedTree { node, reason }
    }
}

/// Failure to assemble a tree from a builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("label `{0}` is attached to more than one node")]
    DuplicateLabel(String),
}
