//! jvmname core library - JVM binary class names for lexical-scope syntax trees

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Trees are immutable once built
// - Naming is a pure function of tree shape
// - No global mutable state, no caching, no I/O outside fixture loading
// - Deterministic traversal order: children in declaration order
// - Identical input yields byte-for-byte identical output

pub mod anonymous;
pub mod builder;
pub mod error;
pub mod fixture;
pub mod naming;
pub mod report;
pub mod tree;

pub use anonymous::anonymous_index;
pub use builder::{BuiltTree, Labeled, NodeBuilder, TreeBuilder};
pub use error::{BuildError, NamingError};
pub use fixture::{load_fixture, parse_fixture};
pub use naming::{jvm_class_name, resolve_all};
pub use report::{render_json, render_text, render_tree, resolve_labels, NameReport, NameStatus};
pub use tree::{GrammarError, Node, NodeId, NodeKind, Tree};
