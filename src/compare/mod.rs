//! Recursive folder comparison
//!
//! Contains the result tree, the content equality check and the tree walker

pub mod equality;
pub mod node;
pub mod walker;

pub use equality::{EqualityOracle, Fingerprint, DEFAULT_HASH_BUFFER_SIZE};
pub use node::{FileNode, NodeStatus, NodeType, TreeStats};
pub use walker::TreeComparator;
