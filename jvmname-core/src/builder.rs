//! Tree builder DSL
//!
//! Declares nested nodes with closures and records caller-chosen labels so
//! tests and fixtures can refer to specific nodes without walking the tree.
//!
//! ```text
//! let built = TreeBuilder::file("test.kt", |f| {
//!     f.package("org.example", |p| {
//!         p.class("Task1", |c| {
//!             c.expect("top", "org/example/Task1");
//!         });
//!     });
//! })
//! .build()?;
//! ```
//!
//! Global invariants enforced:
//! - Node ids follow declaration order (preorder)
//! - A label names exactly one node

use crate::error::BuildError;
use crate::tree::{NodeId, NodeKind, Tree};
use std::collections::BTreeMap;

/// Node recorded under a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeled {
    pub node: NodeId,
    /// JVM class name the caller expects for this node, if any
    pub expected: Option<String>,
}

/// A finished tree plus its label mapping
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub tree: Tree,
    pub labels: BTreeMap<String, Labeled>,
}

impl BuiltTree {
    /// Look up the node stored under `label`
    pub fn node(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).map(|l| l.node)
    }
}

/// Pending node declaration
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    kind: NodeKind,
    name: Option<String>,
    label: Option<String>,
    expected: Option<String>,
    children: Vec<NodeBuilder>,
}

impl NodeBuilder {
    pub fn new(kind: NodeKind, name: Option<String>) -> Self {
        NodeBuilder {
            kind,
            name,
            label: None,
            expected: None,
            children: Vec::new(),
        }
    }

    /// Declare a child node and fill it in with `f`
    pub fn node(&mut self, kind: NodeKind, name: Option<&str>, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        let mut child = NodeBuilder::new(kind, name.map(str::to_string));
        f(&mut child);
        self.children.push(child);
        self
    }

    /// Append an already assembled child
    pub fn push(&mut self, child: NodeBuilder) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn package(&mut self, name: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        self.node(NodeKind::Package, Some(name), f)
    }

    pub fn class(&mut self, name: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        self.node(NodeKind::Class, Some(name), f)
    }

    pub fn function(&mut self, name: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        self.node(NodeKind::Function, Some(name), f)
    }

    pub fn lambda(&mut self, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        self.node(NodeKind::Lambda, None, f)
    }

    /// Lambda carrying a name; the name is informational only
    pub fn named_lambda(&mut self, name: &str, f: impl FnOnce(&mut NodeBuilder)) -> &mut Self {
        self.node(NodeKind::Lambda, Some(name), f)
    }

    /// Record this node under `label`
    pub fn store(&mut self, label: &str) -> &mut Self {
        self.label = Some(label.to_string());
        self
    }

    /// Record this node under `label` together with its expected JVM name
    pub fn expect(&mut self, label: &str, expected: &str) -> &mut Self {
        self.label = Some(label.to_string());
        self.expected = Some(expected.to_string());
        self
    }

    pub(crate) fn set_expected(&mut self, expected: Option<String>) {
        self.expected = expected;
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Assemble the tree rooted at this declaration
    pub fn build(self) -> Result<BuiltTree, BuildError> {
        let NodeBuilder {
            kind,
            name,
            label,
            expected,
            children,
        } = self;

        let mut tree = Tree::with_root(kind, name);
        let mut labels = BTreeMap::new();
        let root = tree.root();
        record_label(&mut labels, root, label, expected)?;

        for child in children {
            attach(&mut tree, &mut labels, root, child)?;
        }

        Ok(BuiltTree { tree, labels })
    }
}

/// Entry points for declaring a tree
pub struct TreeBuilder;

impl TreeBuilder {
    /// Start a tree rooted at FILE `name`
    pub fn file(name: &str, f: impl FnOnce(&mut NodeBuilder)) -> NodeBuilder {
        let mut root = NodeBuilder::new(NodeKind::File, Some(name.to_string()));
        f(&mut root);
        root
    }
}

fn attach(
    tree: &mut Tree,
    labels: &mut BTreeMap<String, Labeled>,
    parent: NodeId,
    builder: NodeBuilder,
) -> Result<(), BuildError> {
    let id = tree.add_child(parent, builder.kind, builder.name);
    record_label(labels, id, builder.label, builder.expected)?;

    for child in builder.children {
        attach(tree, labels, id, child)?;
    }

    Ok(())
}

fn record_label(
    labels: &mut BTreeMap<String, Labeled>,
    node: NodeId,
    label: Option<String>,
    expected: Option<String>,
) -> Result<(), BuildError> {
    let Some(label) = label else {
        return Ok(());
    };
    if labels.contains_key(&label) {
        return Err(BuildError::DuplicateLabel(label));
    }
    labels.insert(label, Labeled { node, expected });
    Ok(())
}
