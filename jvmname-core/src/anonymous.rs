//! Ordinals for anonymous classes generated from lambdas and local functions
//!
//! Numbering scopes:
//! - Each top-level class numbers its whole subtree, nested classes included
//! - Everything outside top-level classes in a file shares one counter,
//!   walked from the FILE node with top-level class subtrees skipped
//!
//! Within a scope, lambdas and local functions are numbered 1, 2, 3, ... in
//! preorder, children in declaration order.

use crate::error::NamingError;
use crate::tree::{NodeId, NodeKind, Tree};

/// Anonymous class number of a lambda or local function
pub fn anonymous_index(tree: &Tree, node: NodeId) -> Result<usize, NamingError> {
    let kind = tree
        .kind(node)
        .ok_or(NamingError::malformed(node, "node does not exist"))?;
    if !tree.is_synthetic(node) {
        return Err(NamingError::InvalidNodeKind { node, kind });
    }

    let anchor = tree
        .find_ancestor(node, |a| tree.is_top_level_class(a) || tree.is_top_level_function(a))
        .ok_or(NamingError::malformed(node, "no enclosing top-level class or function"))?;

    let counts = |id: NodeId| tree.is_synthetic(id);
    let ordinal = match tree.kind(anchor) {
        Some(NodeKind::Class) => tree.preorder_ordinal(anchor, node, counts, |_| false),
        Some(NodeKind::Function) => {
            let file = tree
                .enclosing_file(anchor)
                .ok_or(NamingError::malformed(anchor, "top-level function outside a file"))?;
            tree.preorder_ordinal(file, node, counts, |id| tree.is_top_level_class(id))
        }
        Some(NodeKind::File | NodeKind::Package | NodeKind::Lambda) | None => None,
    };

    ordinal.ok_or(NamingError::malformed(node, "node is unreachable from its numbering scope"))
}
