//! The grammatical core of a conversational agent: a shared tagged-tree
//! representation, a transducer that rewrites external constituency parses
//! into semantic trees, and a renderer that turns semantic trees back into
//! text.
//!
//! The pipeline runs one utterance at a time. An external parser delivers a
//! [`SyntaxTree`]; the [`Transducer`] rewrites it into a [`SemTree`] over
//! the semantic vocabulary in [`schema`]; the [`Renderer`] is the
//! structural inverse, producing surface text with the help of an external
//! [`Morphology`] service. The [`Lexicon`] contract supplies base forms
//! during transduction; everything else a classification needs follows from
//! the syntactic tags.
//!
//! Nothing in here fails at runtime: unrecognized structure is logged via
//! `tracing` and degraded, never fatal. The only fallible operations are
//! direct structural edits on [`Tree`], which reject cycles and leaf
//! parents.

pub mod english;
pub mod error;
pub mod lexicon;
pub mod morph;
pub mod pronoun;
pub mod render;
pub mod schema;
pub mod syntax;
pub mod transduce;
pub mod tree;

pub use english::EnglishMorphology;
pub use error::TreeError;
pub use lexicon::{IdentityLexicon, Lexicon};
pub use morph::{Morphology, TenseFrame, TenseTime};
pub use render::Renderer;
pub use schema::{Categories, Category, SemTree, SemanticTag};
pub use syntax::{StructuralClass, SyntaxTag, SyntaxTree, WordClass};
pub use transduce::Transducer;
pub use tree::{NodeId, Tree};
