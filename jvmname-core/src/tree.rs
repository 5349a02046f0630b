//! Lexical-scope syntax tree stored as an arena
//!
//! Global invariants enforced:
//! - Root is always `NodeId(0)`
//! - Node ids are assigned in preorder, so id order is declaration order
//! - Child order is significant and never changes after construction
//! - No public mutation: trees are built by the builder or the fixture loader

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Handle of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of syntax tree node
///
/// The set is closed: every match over it is exhaustive, so a new kind
/// forces every naming rule to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Package,
    Class,
    Function,
    Lambda,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "FILE",
            NodeKind::Package => "PACKAGE",
            NodeKind::Class => "CLASS",
            NodeKind::Function => "FUNCTION",
            NodeKind::Lambda => "LAMBDA",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the syntax tree
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Violation of the tree grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tree at node {node}: {message}")]
pub struct GrammarError {
    pub node: NodeId,
    pub message: String,
}

impl GrammarError {
    fn new(node: NodeId, message: impl Into<String>) -> Self {
        GrammarError {
            node,
            message: message.into(),
        }
    }
}

/// Immutable syntax tree
///
/// Rules:
/// - Exactly one root, stored first
/// - Parent links point strictly towards the root
/// - Each node is owned by exactly one parent's child list
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only a root node
    pub(crate) fn with_root(kind: NodeKind, name: Option<String>) -> Self {
        Tree {
            nodes: vec![Node {
                id: NodeId(0),
                kind,
                name,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Append a child to `parent`
    ///
    /// Returns the NodeId of the added node
    pub(crate) fn add_child(&mut self, parent: NodeId, kind: NodeKind, name: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            name,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.name.as_deref())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All nodes in id (preorder) order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Strict ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Nearest strict ancestor matching `pred`
    pub fn find_ancestor(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&a| pred(a))
    }

    fn is_kind(&self, id: NodeId, kind: NodeKind) -> bool {
        self.kind(id) == Some(kind)
    }

    fn parent_is_declaration_scope(&self, id: NodeId) -> bool {
        matches!(
            self.parent(id).and_then(|p| self.kind(p)),
            Some(NodeKind::File | NodeKind::Package)
        )
    }

    /// CLASS directly under FILE or PACKAGE
    pub fn is_top_level_class(&self, id: NodeId) -> bool {
        self.is_kind(id, NodeKind::Class) && self.parent_is_declaration_scope(id)
    }

    /// FUNCTION directly under FILE or PACKAGE
    pub fn is_top_level_function(&self, id: NodeId) -> bool {
        self.is_kind(id, NodeKind::Function) && self.parent_is_declaration_scope(id)
    }

    /// FUNCTION directly under CLASS
    pub fn is_member_function(&self, id: NodeId) -> bool {
        self.is_kind(id, NodeKind::Function)
            && self.parent(id).and_then(|p| self.kind(p)) == Some(NodeKind::Class)
    }

    /// FUNCTION nested in executable code (parent is FUNCTION or LAMBDA)
    pub fn is_local_function(&self, id: NodeId) -> bool {
        self.is_kind(id, NodeKind::Function)
            && matches!(
                self.parent(id).and_then(|p| self.kind(p)),
                Some(NodeKind::Function | NodeKind::Lambda)
            )
    }

    /// Node that is compiled into an anonymous class
    pub fn is_synthetic(&self, id: NodeId) -> bool {
        self.is_kind(id, NodeKind::Lambda) || self.is_local_function(id)
    }

    /// Nearest FILE, the node itself included
    pub fn enclosing_file(&self, id: NodeId) -> Option<NodeId> {
        if self.is_kind(id, NodeKind::File) {
            return Some(id);
        }
        self.find_ancestor(id, |a| self.is_kind(a, NodeKind::File))
    }

    /// Nearest strict PACKAGE ancestor
    pub fn enclosing_package(&self, id: NodeId) -> Option<NodeId> {
        self.find_ancestor(id, |a| self.is_kind(a, NodeKind::Package))
    }

    /// Ordinal of `target` in a preorder walk of `root`'s subtree
    ///
    /// Children are visited in declaration order. A child matching `skip`
    /// is not visited and neither is its subtree. Only nodes matching
    /// `counts` are numbered, starting at 1; `target` receives the number
    /// it would get if it counted. Returns `None` if the walk never
    /// reaches `target`.
    pub fn preorder_ordinal(
        &self,
        root: NodeId,
        target: NodeId,
        counts: impl Fn(NodeId) -> bool,
        skip: impl Fn(NodeId) -> bool,
    ) -> Option<usize> {
        let mut ordinal = 1;
        let mut stack = vec![root];

        while let Some(current) = stack.pop() {
            if current == target {
                return Some(ordinal);
            }
            if counts(current) {
                ordinal += 1;
            }
            // Reverse push keeps declaration order on pop
            for &child in self.children(current).iter().rev() {
                if !skip(child) {
                    stack.push(child);
                }
            }
        }

        None
    }

    /// Validate the tree grammar
    ///
    /// ```text
    /// FILE     -> PACKAGE | declarations
    /// PACKAGE  -> declarations
    /// CLASS    -> (CLASS | FUNCTION)*
    /// FUNCTION -> (FUNCTION | LAMBDA)*
    /// LAMBDA   -> (FUNCTION | LAMBDA)*
    /// ```
    ///
    /// Returns the first violation in id order.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let root = self.root();
        match self.kind(root) {
            Some(NodeKind::File) => {}
            Some(other) => {
                return Err(GrammarError::new(root, format!("root must be FILE, found {}", other)));
            }
            None => return Err(GrammarError::new(root, "tree is empty")),
        }

        for node in &self.nodes {
            if node.kind != NodeKind::Lambda && node.name.is_none() {
                return Err(GrammarError::new(node.id, format!("{} node has no name", node.kind)));
            }

            match node.parent {
                None if node.id != root => {
                    return Err(GrammarError::new(node.id, "non-root node has no parent"));
                }
                Some(parent) if !self.children(parent).contains(&node.id) => {
                    return Err(GrammarError::new(node.id, "parent does not list node as a child"));
                }
                _ => {}
            }

            let has_package = node
                .children
                .iter()
                .any(|&c| self.is_kind(c, NodeKind::Package));
            if node.kind == NodeKind::File && has_package && node.children.len() != 1 {
                return Err(GrammarError::new(
                    node.id,
                    "a FILE with a PACKAGE must hold nothing else",
                ));
            }

            for &child in &node.children {
                let child_kind = match self.kind(child) {
                    Some(kind) => kind,
                    None => return Err(GrammarError::new(node.id, format!("dangling child {}", child))),
                };
                if !child_allowed(node.kind, child_kind) {
                    return Err(GrammarError::new(
                        child,
                        format!("{} is not allowed inside {}", child_kind, node.kind),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn child_allowed(parent: NodeKind, child: NodeKind) -> bool {
    match parent {
        NodeKind::File => matches!(child, NodeKind::Package | NodeKind::Class | NodeKind::Function),
        NodeKind::Package | NodeKind::Class => matches!(child, NodeKind::Class | NodeKind::Function),
        NodeKind::Function | NodeKind::Lambda => matches!(child, NodeKind::Function | NodeKind::Lambda),
    }
}

/// Iterator over strict ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
