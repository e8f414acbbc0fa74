//! The lexical-database contract and word classification records.
//!
//! The external lexical database contributes one thing: the base
//! (dictionary) form of a surface word. Everything else a classification
//! needs — plurality, pronoun-ness, tense contribution, degree — follows
//! from the syntactic tag the parser assigned, so the records here are
//! assembled from the tag with the lexicon consulted only for the lemma.
//! Lookup failures are tolerated everywhere: a missing entry means the
//! surface word itself is used as the base form.

use crate::syntax::{SyntaxTag, WordClass};

/// The external lexical database.
pub trait Lexicon {
    /// Base (dictionary) form of `word` when read as `class`, or `None`
    /// when the database has no refinement to offer.
    fn base_form(&self, word: &str, class: WordClass) -> Option<String>;
}

/// A lexicon with no refinements: every word is its own base form.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLexicon;

impl Lexicon for IdentityLexicon {
    fn base_form(&self, _word: &str, _class: WordClass) -> Option<String> {
        None
    }
}

fn base_or_surface<L: Lexicon + ?Sized>(lexicon: &L, word: &str, class: WordClass) -> String {
    lexicon
        .base_form(word, class)
        .unwrap_or_else(|| word.to_string())
}

/// Classification of a noun-class token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounEntry {
    pub base: String,
    pub plural: bool,
    pub pronoun: bool,
    pub question: bool,
}

impl NounEntry {
    /// Classify a token the parser tagged as noun-like. `None` when the tag
    /// is not a noun tag.
    pub fn classify<L: Lexicon + ?Sized>(lexicon: &L, word: &str, tag: SyntaxTag) -> Option<Self> {
        let (plural, pronoun, question) = match tag {
            SyntaxTag::NounPlural | SyntaxTag::ProperNounPlural => (true, false, false),
            SyntaxTag::NounSingular | SyntaxTag::ProperNounSingular => (false, false, false),
            SyntaxTag::PersonalPronoun => (false, true, false),
            SyntaxTag::WhPronoun => (false, true, true),
            _ => return None,
        };
        Some(NounEntry {
            base: base_or_surface(lexicon, word, WordClass::Noun),
            plural,
            pronoun,
            question,
        })
    }
}

/// What a verb token contributes to the tense of its phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbKind {
    /// Infinitive form ("to speak").
    Base,
    /// "can", "will", "should", … — contributes FUTURE, carries no verb.
    Modal,
    /// "speak", "speaks".
    PresentSimple,
    /// "spoke".
    PastSimple,
    /// "speaking".
    Continuous,
    /// "spoken".
    Perfect,
}

/// Classification of a verb-class token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbEntry {
    pub base: String,
    pub kind: VerbKind,
}

impl VerbEntry {
    /// Classify a token the parser tagged as a verb. `None` when the tag is
    /// not a verb tag.
    pub fn classify<L: Lexicon + ?Sized>(lexicon: &L, word: &str, tag: SyntaxTag) -> Option<Self> {
        let kind = match tag {
            SyntaxTag::ModalVerb => VerbKind::Modal,
            SyntaxTag::VerbBase => VerbKind::Base,
            SyntaxTag::VerbPastTense => VerbKind::PastSimple,
            SyntaxTag::VerbGerund => VerbKind::Continuous,
            SyntaxTag::VerbPastParticiple => VerbKind::Perfect,
            SyntaxTag::VerbPresent | SyntaxTag::VerbPresentThirdSingular => {
                VerbKind::PresentSimple
            }
            _ => return None,
        };
        Some(VerbEntry {
            base: base_or_surface(lexicon, word, WordClass::Verb),
            kind,
        })
    }
}

/// Degree of an adjective or adverb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    Positive,
    Comparative,
    Superlative,
}

/// Classification of an adjective or adverb token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedEntry {
    pub base: String,
    pub degree: Degree,
}

impl GradedEntry {
    /// Classify an adjective token. `None` when the tag is not an adjective
    /// tag.
    pub fn classify_adjective<L: Lexicon + ?Sized>(
        lexicon: &L,
        word: &str,
        tag: SyntaxTag,
    ) -> Option<Self> {
        let degree = match tag {
            SyntaxTag::Adjective => Degree::Positive,
            SyntaxTag::AdjectiveComparative => Degree::Comparative,
            SyntaxTag::AdjectiveSuperlative => Degree::Superlative,
            _ => return None,
        };
        Some(GradedEntry {
            base: base_or_surface(lexicon, word, WordClass::Adjective),
            degree,
        })
    }

    /// Classify an adverb token. `None` when the tag is not an adverb tag.
    pub fn classify_adverb<L: Lexicon + ?Sized>(
        lexicon: &L,
        word: &str,
        tag: SyntaxTag,
    ) -> Option<Self> {
        let degree = match tag {
            SyntaxTag::Adverb => Degree::Positive,
            SyntaxTag::AdverbComparative => Degree::Comparative,
            SyntaxTag::AdverbSuperlative => Degree::Superlative,
            _ => return None,
        };
        Some(GradedEntry {
            base: base_or_surface(lexicon, word, WordClass::Adverb),
            degree,
        })
    }
}
