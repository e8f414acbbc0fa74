//! Error types for tree-structure mutations.
//!
//! Transduction and rendering never fail — they degrade and log instead.
//! The only fallible operations in this crate are the structural tree edits,
//! which reject inputs that would corrupt the arena.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("attaching the node would create a cycle")]
    Cycle,

    #[error("leaf nodes cannot have children")]
    LeafParent,
}
