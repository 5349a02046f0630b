//! JVM binary class names for syntax tree nodes
//!
//! Naming rules:
//! - Top-level class: `<package path>/<Name>`
//! - Top-level function: `<package path>/<file name>` with `.` and `$` in the
//!   file name replaced by `_`
//! - Nested class: `<parent class>$<Name>`
//! - Local function or lambda: `<nearest class or non-local function>$<n>`,
//!   where `n` comes from the anonymous indexer
//! - Member function: same class as its enclosing class
//!
//! The package path is the package name with `.` replaced by `/`; it is
//! omitted together with its trailing `/` when the file has no package.
//!
//! Global invariants enforced:
//! - Pure function of the tree shape
//! - No logging, no caching, no shared state

use crate::anonymous::anonymous_index;
use crate::error::NamingError;
use crate::tree::{NodeId, NodeKind, Tree};

/// How a node maps onto a JVM class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    TopLevelClass,
    TopLevelFunction,
    NestedClass,
    /// Local function or lambda, compiled to an anonymous class
    Synthetic,
    MemberFunction,
}

/// Compute the JVM binary class name of `node`
///
/// Valid for CLASS, FUNCTION, and LAMBDA nodes. FILE and PACKAGE nodes
/// yield `InvalidNodeKind`; a missing parent, name, or scope root yields
/// `MalformedTree`.
pub fn jvm_class_name(tree: &Tree, node: NodeId) -> Result<String, NamingError> {
    match classify(tree, node)? {
        Role::TopLevelClass => Ok(package_prefix(tree, node)? + required_name(tree, node)?),
        Role::TopLevelFunction => Ok(package_prefix(tree, node)? + &file_class_name(tree, node)?),
        Role::NestedClass => {
            let parent = require_parent(tree, node)?;
            Ok(format!(
                "{}${}",
                jvm_class_name(tree, parent)?,
                required_name(tree, node)?
            ))
        }
        Role::Synthetic => {
            let scope = tree
                .find_ancestor(node, |a| is_named_scope(tree, a))
                .ok_or(NamingError::malformed(node, "no enclosing class or non-local function"))?;
            Ok(format!(
                "{}${}",
                jvm_class_name(tree, scope)?,
                anonymous_index(tree, node)?
            ))
        }
        Role::MemberFunction => jvm_class_name(tree, require_parent(tree, node)?),
    }
}

/// Name every CLASS, FUNCTION, and LAMBDA node in id order
pub fn resolve_all(tree: &Tree) -> Vec<(NodeId, Result<String, NamingError>)> {
    tree.iter()
        .filter(|n| !matches!(n.kind, NodeKind::File | NodeKind::Package))
        .map(|n| (n.id, jvm_class_name(tree, n.id)))
        .collect()
}

fn classify(tree: &Tree, node: NodeId) -> Result<Role, NamingError> {
    let kind = tree
        .kind(node)
        .ok_or(NamingError::malformed(node, "node does not exist"))?;

    match kind {
        NodeKind::File | NodeKind::Package => Err(NamingError::InvalidNodeKind { node, kind }),
        NodeKind::Lambda => {
            require_parent(tree, node)?;
            Ok(Role::Synthetic)
        }
        NodeKind::Class => {
            parent_kind(tree, node)?;
            if tree.is_top_level_class(node) {
                Ok(Role::TopLevelClass)
            } else {
                Ok(Role::NestedClass)
            }
        }
        NodeKind::Function => {
            parent_kind(tree, node)?;
            if tree.is_top_level_function(node) {
                Ok(Role::TopLevelFunction)
            } else if tree.is_member_function(node) {
                Ok(Role::MemberFunction)
            } else if tree.is_local_function(node) {
                Ok(Role::Synthetic)
            } else {
                Err(NamingError::malformed(node, "function has no enclosing declaration scope"))
            }
        }
    }
}

/// CLASS or non-local FUNCTION: the nodes a synthetic class is named after
fn is_named_scope(tree: &Tree, id: NodeId) -> bool {
    match tree.kind(id) {
        Some(NodeKind::Class) => true,
        Some(NodeKind::Function) => !tree.is_local_function(id),
        Some(NodeKind::File | NodeKind::Package | NodeKind::Lambda) | None => false,
    }
}

fn require_parent(tree: &Tree, node: NodeId) -> Result<NodeId, NamingError> {
    tree.parent(node)
        .ok_or(NamingError::malformed(node, "node has no parent"))
}

fn parent_kind(tree: &Tree, node: NodeId) -> Result<NodeKind, NamingError> {
    let parent = require_parent(tree, node)?;
    tree.kind(parent)
        .ok_or(NamingError::malformed(node, "parent does not exist"))
}

fn required_name(tree: &Tree, node: NodeId) -> Result<&str, NamingError> {
    tree.name(node)
        .ok_or(NamingError::malformed(node, "declaration has no name"))
}

/// `p1/p2/` for package `p1.p2`, empty without a package
fn package_prefix(tree: &Tree, node: NodeId) -> Result<String, NamingError> {
    let Some(package) = tree.enclosing_package(node) else {
        return Ok(String::new());
    };
    let name = tree
        .name(package)
        .ok_or(NamingError::malformed(package, "package has no name"))?;
    Ok(format!("{}/", name.replace('.', "/")))
}

/// File name with `.` and `$` replaced by `_`
fn file_class_name(tree: &Tree, node: NodeId) -> Result<String, NamingError> {
    let file = tree
        .enclosing_file(node)
        .ok_or(NamingError::malformed(node, "no enclosing file"))?;
    let name = tree
        .name(file)
        .ok_or(NamingError::malformed(file, "file has no name"))?;
    Ok(name.replace(['.', '$'], "_"))
}

#[cfg(test)]
#[path = "naming/tests.rs"]
mod tests;
