//! The semantic vocabulary — node kinds of the core's own tagged tree.
//!
//! A [`SemanticTag`] names the grammatical role a node plays (subject,
//! action, object, …) rather than its syntactic category. Each tag carries a
//! fixed set of [`Category`] memberships computed by a single `const` table:
//! the transducer, renderer, discourse context and recall engine all consult
//! these categories instead of re-deriving shape rules ad hoc.
//!
//! Category meanings:
//!
//! - `Phrase` — a top-level sentence constituent.
//! - `ContainsPhrase` — may nest `Phrase` children (the root, conjunctions).
//! - `Word` — a leaf carrying a literal word used in the sentence.
//! - `SingleChild` — a wrapper expected to own at most one meaningful child.
//! - `Ignored` — a leaf whose text must never appear in rendered output
//!   (tense markers, plural markers, degree markers).
//! - `Answer` — a slot where a question's missing information would go;
//!   excluded from recall-engine leaf matching.

use crate::tree::Tree;

/// A semantic tree — the output of transduction, the input of everything
/// else.
pub type SemTree = Tree<SemanticTag>;

/// A single category a [`SemanticTag`] may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Category {
    Phrase = 0,
    ContainsPhrase = 1,
    Word = 2,
    SingleChild = 3,
    Ignored = 4,
    Answer = 5,
}

/// A set of [`Category`] memberships, packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categories(u8);

impl Categories {
    pub const NONE: Categories = Categories(0);

    pub const fn with(self, category: Category) -> Categories {
        Categories(self.0 | 1 << category as u8)
    }

    pub const fn contains(self, category: Category) -> bool {
        self.0 & (1 << category as u8) != 0
    }
}

/// A node label in the core's semantic vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticTag {
    Root,

    // Top-level constituents, contained by Root (or a ConjunctionPhrase).
    ConjunctionPhrase,
    Statement,
    /// Contains an Action.
    Command,
    Question,
    YesNo,
    InterjectionPhrase,
    /// Contains a NounPhrase.
    FragmentNoun,
    /// Contains an AdjectivePhrase.
    FragmentAdjective,
    /// Contains an AdverbPhrase.
    FragmentAdverb,
    /// Contains a QuestionType.
    QuestionFragment,

    /// Leaf inside a ConjunctionPhrase: "and", "or", …
    Conjunction,

    /// Contains a NounPhrase.
    Subject,
    /// Contains a VerbPhrase.
    Action,
    /// Leaf: a bare question word rescued from an unstructured fragment.
    QuestionType,

    /// Leaf inside an InterjectionPhrase.
    InterjectionWord,

    NounPhrase,
    VerbPhrase,
    AdjectivePhrase,
    AdverbPhrase,

    // Noun-phrase members.
    Noun,
    Pronoun,
    /// Leaf: a wh-pronoun standing where the answer would go.
    QuestionPronoun,
    /// Leaf: refers back to a previous noun, like "which" or "that".
    ReferringPronoun,
    /// Marker leaf: present when the noun is plural; holds the surface
    /// plural form (or nothing).
    Plural,
    Determiner,
    /// Leaf: "which", sometimes "what".
    QuestionDeterminer,
    /// Contains a NounPhrase ("joe's dog" — "joe" is the possessor).
    Possessor,

    // Verb-phrase members.
    Verb,
    /// Marker leaf: PAST, PRESENT or FUTURE.
    TenseTime,
    /// Marker leaf: SIMPLE, PERFECT, CONTINUOUS or PERFECT_CONTINUOUS.
    TenseFrame,
    /// Contains a NounPhrase, an AdjectivePhrase ("I am happy"), a
    /// VerbPhrase ("I like to run") or a Possessor ("that is joe's").
    Object,
    /// In "tell me your name", "me" is the indirect object.
    IndirectObject,
    PrepositionPhrase,
    SubordinateClausePhrase,
    /// "on", "off", "away", …
    ParticlePhrase,
    /// Leaf: when/where/why/how — not part of an adverb phrase.
    QuestionAdverb,

    // Adjective/adverb-phrase members.
    Adjective,
    /// Marker leaf: the comparative surface form, or empty.
    Comparative,
    /// Marker leaf: the superlative surface form, or empty.
    Superlative,
    Adverb,

    // Preposition-phrase members.
    Preposition,

    // Particle-phrase members.
    Particle,
}

impl SemanticTag {
    /// The static category memberships of this tag.
    pub const fn categories(self) -> Categories {
        use Category::*;
        use SemanticTag::*;
        const NONE: Categories = Categories::NONE;
        match self {
            Root => NONE.with(ContainsPhrase),
            ConjunctionPhrase => NONE.with(Phrase).with(ContainsPhrase),
            Statement | Question | YesNo | InterjectionPhrase => NONE.with(Phrase),
            Command | FragmentNoun | FragmentAdjective | FragmentAdverb | QuestionFragment => {
                NONE.with(Phrase).with(SingleChild)
            }
            Conjunction | QuestionType | InterjectionWord | Noun | Pronoun
            | ReferringPronoun | Determiner | Verb | Adjective | Adverb | Preposition
            | Particle => NONE.with(Word),
            Subject | Action | Possessor | Object | IndirectObject => NONE.with(SingleChild),
            QuestionPronoun | QuestionDeterminer | QuestionAdverb => NONE.with(Word).with(Answer),
            Plural | TenseTime | TenseFrame | Comparative | Superlative => NONE.with(Ignored),
            NounPhrase | VerbPhrase | AdjectivePhrase | AdverbPhrase | PrepositionPhrase
            | SubordinateClausePhrase | ParticlePhrase => NONE,
        }
    }

    /// Membership test against the static category table.
    pub fn is(self, category: Category) -> bool {
        self.categories().contains(category)
    }
}

impl std::fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_membership() {
        assert!(SemanticTag::Root.is(Category::ContainsPhrase));
        assert!(SemanticTag::ConjunctionPhrase.is(Category::Phrase));
        assert!(SemanticTag::ConjunctionPhrase.is(Category::ContainsPhrase));
        assert!(SemanticTag::Command.is(Category::SingleChild));
        assert!(SemanticTag::QuestionPronoun.is(Category::Word));
        assert!(SemanticTag::QuestionPronoun.is(Category::Answer));
        assert!(SemanticTag::Plural.is(Category::Ignored));
        assert!(!SemanticTag::NounPhrase.is(Category::Phrase));
        assert!(!SemanticTag::Noun.is(Category::Answer));
    }

    #[test]
    fn test_marker_leaves_never_render() {
        for tag in [
            SemanticTag::Plural,
            SemanticTag::TenseTime,
            SemanticTag::TenseFrame,
            SemanticTag::Comparative,
            SemanticTag::Superlative,
        ] {
            assert!(tag.is(Category::Ignored));
            assert!(!tag.is(Category::Word));
        }
    }
}
