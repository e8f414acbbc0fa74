//! The fixed constituency vocabulary produced by the external parser.
//!
//! Input parses arrive as [`Tree`]s of [`SyntaxTag`]s, shaped after the Penn
//! Treebank label set. Every tag is statically classified by word class
//! (noun/verb/adjective/adverb) and structural class (word/phrase/clause/
//! punctuation), which is all the transducer ever asks of it. The core
//! consumes these trees; it never builds or mutates them.

use crate::tree::Tree;

/// A constituency parse, as delivered by the external parser.
pub type SyntaxTree = Tree<SyntaxTag>;

/// Lexical word class of a word-level tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

/// Structural role of a tag within the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralClass {
    Word,
    Phrase,
    Clause,
    Punctuation,
    Other,
}

/// A node label in the external parser's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxTag {
    Root,
    /// Any label the external parser emits that we do not recognize.
    Unknown,

    // Word-level tags.
    Adjective,
    AdjectiveComparative,
    AdjectiveSuperlative,
    Adverb,
    AdverbComparative,
    AdverbSuperlative,
    CardinalNumber,
    CoordinatingConjunction,
    Determiner,
    ExistentialThere,
    ForeignWord,
    Interjection,
    ListItemMarker,
    ModalVerb,
    NounPlural,
    NounSingular,
    Particle,
    PersonalPronoun,
    PossessiveEnding,
    PossessivePronoun,
    PossessiveWhPronoun,
    Predeterminer,
    /// `IN` — a preposition or a subordinating conjunction; which one it is
    /// depends on the phrase being built around it.
    Preposition,
    ProperNounPlural,
    ProperNounSingular,
    Symbol,
    To,
    VerbBase,
    VerbPastTense,
    VerbGerund,
    VerbPastParticiple,
    VerbPresent,
    VerbPresentThirdSingular,
    WhDeterminer,
    WhPronoun,
    WhAdverb,

    // Phrase-level tags.
    AdjectivePhrase,
    AdverbPhrase,
    ConjunctionPhrase,
    Fragment,
    InterjectionPhrase,
    ListMarker,
    NotAConstituent,
    NounPhrase,
    NounPhraseHead,
    PrepositionalPhrase,
    Parenthetical,
    ParticlePhrase,
    QuantifierPhrase,
    ReducedRelativeClause,
    UnlikeCoordinatedPhrase,
    VerbPhrase,
    WhAdjectivePhrase,
    WhAdverbPhrase,
    WhNounPhrase,
    WhPrepositionalPhrase,
    X,

    // Clause-level tags.
    Declarative,
    SubordinateClause,
    /// `SBARQ` — a direct question introduced by a wh-word.
    WhQuestion,
    Inverted,
    /// `SQ` — inverted yes/no question, or the body of a wh-question.
    InvertedQuestion,

    // Punctuation.
    OpeningQuote,
    ClosingQuote,
    OpeningParenthesis,
    ClosingParenthesis,
    Comma,
    Dash,
    SentenceTerminator,
    ColonOrEllipsis,
    Apostrophe,
}

impl SyntaxTag {
    pub const fn word_class(self) -> WordClass {
        use SyntaxTag::*;
        match self {
            Adjective | AdjectiveComparative | AdjectiveSuperlative => WordClass::Adjective,
            Adverb | AdverbComparative | AdverbSuperlative | WhAdverb => WordClass::Adverb,
            ModalVerb | VerbBase | VerbPastTense | VerbGerund | VerbPastParticiple
            | VerbPresent | VerbPresentThirdSingular => WordClass::Verb,
            NounPlural | NounSingular | PersonalPronoun | ProperNounPlural
            | ProperNounSingular | WhPronoun => WordClass::Noun,
            _ => WordClass::Other,
        }
    }

    pub const fn structural_class(self) -> StructuralClass {
        use SyntaxTag::*;
        match self {
            Root | Unknown => StructuralClass::Other,
            Adjective | AdjectiveComparative | AdjectiveSuperlative | Adverb
            | AdverbComparative | AdverbSuperlative | CardinalNumber
            | CoordinatingConjunction | Determiner | ExistentialThere | ForeignWord
            | Interjection | ListItemMarker | ModalVerb | NounPlural | NounSingular
            | Particle | PersonalPronoun | PossessiveEnding | PossessivePronoun
            | PossessiveWhPronoun | Predeterminer | Preposition | ProperNounPlural
            | ProperNounSingular | Symbol | To | VerbBase | VerbPastTense | VerbGerund
            | VerbPastParticiple | VerbPresent | VerbPresentThirdSingular | WhDeterminer
            | WhPronoun | WhAdverb => StructuralClass::Word,
            AdjectivePhrase | AdverbPhrase | ConjunctionPhrase | Fragment
            | InterjectionPhrase | ListMarker | NotAConstituent | NounPhrase
            | NounPhraseHead | PrepositionalPhrase | Parenthetical | ParticlePhrase
            | QuantifierPhrase | ReducedRelativeClause | UnlikeCoordinatedPhrase
            | VerbPhrase | WhAdjectivePhrase | WhAdverbPhrase | WhNounPhrase
            | WhPrepositionalPhrase | X => StructuralClass::Phrase,
            Declarative | SubordinateClause | WhQuestion | Inverted | InvertedQuestion => {
                StructuralClass::Clause
            }
            OpeningQuote | ClosingQuote | OpeningParenthesis | ClosingParenthesis | Comma
            | Dash | SentenceTerminator | ColonOrEllipsis | Apostrophe => {
                StructuralClass::Punctuation
            }
        }
    }

    /// The label the external parser uses for this tag.
    pub const fn acronym(self) -> &'static str {
        use SyntaxTag::*;
        match self {
            Root => "ROOT",
            Unknown => "",
            Adjective => "JJ",
            AdjectiveComparative => "JJR",
            AdjectiveSuperlative => "JJS",
            Adverb => "RB",
            AdverbComparative => "RBR",
            AdverbSuperlative => "RBS",
            CardinalNumber => "CD",
            CoordinatingConjunction => "CC",
            Determiner => "DT",
            ExistentialThere => "EX",
            ForeignWord => "FW",
            Interjection => "UH",
            ListItemMarker => "LS",
            ModalVerb => "MD",
            NounPlural => "NNS",
            NounSingular => "NN",
            Particle => "RP",
            PersonalPronoun => "PRP",
            PossessiveEnding => "POS",
            PossessivePronoun => "PRP$",
            PossessiveWhPronoun => "WP$",
            Predeterminer => "PDT",
            Preposition => "IN",
            ProperNounPlural => "NNPS",
            ProperNounSingular => "NNP",
            Symbol => "SYM",
            To => "TO",
            VerbBase => "VB",
            VerbPastTense => "VBD",
            VerbGerund => "VBG",
            VerbPastParticiple => "VBN",
            VerbPresent => "VBP",
            VerbPresentThirdSingular => "VBZ",
            WhDeterminer => "WDT",
            WhPronoun => "WP",
            WhAdverb => "WRB",
            AdjectivePhrase => "ADJP",
            AdverbPhrase => "ADVP",
            ConjunctionPhrase => "CONJP",
            Fragment => "FRAG",
            InterjectionPhrase => "INTJ",
            ListMarker => "LST",
            NotAConstituent => "NAC",
            NounPhrase => "NP",
            NounPhraseHead => "NX",
            PrepositionalPhrase => "PP",
            Parenthetical => "PRN",
            ParticlePhrase => "PRT",
            QuantifierPhrase => "QP",
            ReducedRelativeClause => "RRC",
            UnlikeCoordinatedPhrase => "UCP",
            VerbPhrase => "VP",
            WhAdjectivePhrase => "WHADJP",
            WhAdverbPhrase => "WHADVP",
            WhNounPhrase => "WHNP",
            WhPrepositionalPhrase => "WHPP",
            X => "X",
            Declarative => "S",
            SubordinateClause => "SBAR",
            WhQuestion => "SBARQ",
            Inverted => "SINV",
            InvertedQuestion => "SQ",
            OpeningQuote => "``",
            ClosingQuote => "''",
            OpeningParenthesis => "(",
            ClosingParenthesis => ")",
            Comma => ",",
            Dash => "--",
            SentenceTerminator => ".",
            ColonOrEllipsis => ":",
            Apostrophe => "'",
        }
    }

    /// Map an external parser label to a tag. Unrecognized labels become
    /// [`SyntaxTag::Unknown`]; the transducer logs and skips those.
    pub fn from_acronym(label: &str) -> Self {
        use SyntaxTag::*;
        const ALL: &[SyntaxTag] = &[
            Root,
            Adjective,
            AdjectiveComparative,
            AdjectiveSuperlative,
            Adverb,
            AdverbComparative,
            AdverbSuperlative,
            CardinalNumber,
            CoordinatingConjunction,
            Determiner,
            ExistentialThere,
            ForeignWord,
            Interjection,
            ListItemMarker,
            ModalVerb,
            NounPlural,
            NounSingular,
            Particle,
            PersonalPronoun,
            PossessiveEnding,
            PossessivePronoun,
            PossessiveWhPronoun,
            Predeterminer,
            Preposition,
            ProperNounPlural,
            ProperNounSingular,
            Symbol,
            To,
            VerbBase,
            VerbPastTense,
            VerbGerund,
            VerbPastParticiple,
            VerbPresent,
            VerbPresentThirdSingular,
            WhDeterminer,
            WhPronoun,
            WhAdverb,
            AdjectivePhrase,
            AdverbPhrase,
            ConjunctionPhrase,
            Fragment,
            InterjectionPhrase,
            ListMarker,
            NotAConstituent,
            NounPhrase,
            NounPhraseHead,
            PrepositionalPhrase,
            Parenthetical,
            ParticlePhrase,
            QuantifierPhrase,
            ReducedRelativeClause,
            UnlikeCoordinatedPhrase,
            VerbPhrase,
            WhAdjectivePhrase,
            WhAdverbPhrase,
            WhNounPhrase,
            WhPrepositionalPhrase,
            X,
            Declarative,
            SubordinateClause,
            WhQuestion,
            Inverted,
            InvertedQuestion,
            OpeningQuote,
            ClosingQuote,
            OpeningParenthesis,
            ClosingParenthesis,
            Comma,
            Dash,
            SentenceTerminator,
            ColonOrEllipsis,
            Apostrophe,
        ];
        ALL.iter()
            .copied()
            .find(|tag| tag.acronym() == label)
            .unwrap_or(Unknown)
    }
}

impl std::fmt::Display for SyntaxTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.acronym().is_empty() {
            write!(f, "UNKNOWN")
        } else {
            write!(f, "{}", self.acronym())
        }
    }
}
