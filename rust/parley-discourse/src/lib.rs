//! Discourse layer over [`parley_grammar`] semantic trees.
//!
//! Tracks what the generic pronouns most recently referred to, substitutes
//! referents into incoming trees, and recalls stored statements by
//! structural similarity. State lives in a [`Session`]: one per
//! conversation, nothing process-global.

pub mod context;
pub mod names;
pub mod recall;
pub mod session;

pub use context::DiscourseContext;
pub use names::NameList;
pub use recall::{RecallStore, similarity};
pub use session::Session;
