//! The structure transducer — constituency parse in, semantic tree out.
//!
//! The rewrite is cursor-based and context-sensitive: a rule is selected by
//! the tag of the *output* node currently being built, not by the input tag
//! alone, so the same input tag means different things inside a noun phrase
//! than inside a verb phrase. Each rule reports a [`Step`]: where it left
//! the cursor, how many levels it pushed, and whether the input node's
//! children should be interpreted too. The driver unwinds exactly the pushed
//! levels once an input subtree is finished, which decouples the output
//! tree's depth from the input tree's depth.
//!
//! There is no failure mode. An input/cursor pairing with no rule logs a
//! warning and is treated as transparent: the transducer descends into the
//! children without producing anything, dropping structure at worst.

use tracing::warn;

use crate::lexicon::{Degree, GradedEntry, Lexicon, NounEntry, VerbEntry, VerbKind};
use crate::morph::{TenseFrame, TenseTime};
use crate::pronoun::{is_wh_word, possessor_noun, swap_person};
use crate::schema::{Category, SemTree, SemanticTag as Sem};
use crate::syntax::{StructuralClass, SyntaxTag as Syn, SyntaxTree, WordClass};
use crate::tree::NodeId;

/// What one rule did: the cursor for the next input sibling, the number of
/// levels the driver must unwind after this input subtree is finished, and
/// whether to interpret the input node's children.
#[derive(Debug, Clone, Copy)]
struct Step {
    cursor: NodeId,
    pushes: usize,
    descend: bool,
}

/// Cursor movement inside a single rule.
struct Cursor {
    at: NodeId,
    pushes: usize,
}

impl Cursor {
    fn new(at: NodeId) -> Self {
        Cursor { at, pushes: 0 }
    }

    /// Grow a child under the cursor and move into it.
    fn push(&mut self, out: &mut SemTree, tag: Sem) {
        self.at = grow(out, self.at, tag);
        self.pushes += 1;
    }

    /// Move into an existing child with this tag, or grow one.
    fn push_or_get(&mut self, out: &mut SemTree, tag: Sem) {
        self.at = match out.first_child(self.at, &tag) {
            Some(existing) => existing,
            None => grow(out, self.at, tag),
        };
        self.pushes += 1;
    }

    /// Add a word leaf under the cursor without moving.
    fn leaf(&self, out: &mut SemTree, tag: Sem, text: impl Into<String>) {
        grow_leaf(out, self.at, tag, text);
    }

    fn descend(self) -> Step {
        Step {
            cursor: self.at,
            pushes: self.pushes,
            descend: true,
        }
    }

    fn stay(self) -> Step {
        Step {
            cursor: self.at,
            pushes: self.pushes,
            descend: false,
        }
    }

    /// Combine with the step of a rule this rule handed off to.
    fn delegate(self, inner: Step) -> Step {
        Step {
            cursor: inner.cursor,
            pushes: self.pushes + inner.pushes,
            descend: inner.descend,
        }
    }
}

fn grow(out: &mut SemTree, parent: NodeId, tag: Sem) -> NodeId {
    match out.add_internal(parent, tag) {
        Ok(id) => id,
        Err(error) => {
            warn!(%error, %tag, "could not grow the output tree; staying put");
            parent
        }
    }
}

fn grow_leaf(out: &mut SemTree, parent: NodeId, tag: Sem, text: impl Into<String>) {
    if let Err(error) = out.add_leaf(parent, tag, text) {
        warn!(%error, %tag, "dropping a word that could not be attached");
    }
}

fn adopt(out: &mut SemTree, parent: NodeId, child: NodeId) {
    if let Err(error) = out.attach(parent, child) {
        warn!(%error, "dropping a subtree that could not be re-attached");
    }
}

fn current_frame(out: &SemTree, cursor: NodeId) -> Option<TenseFrame> {
    out.first_child(cursor, &Sem::TenseFrame)
        .and_then(|marker| out.text(marker))
        .and_then(|text| text.parse().ok())
}

/// Replace the cursor's tense-frame marker leaf.
fn set_frame(out: &mut SemTree, cursor: NodeId, frame: TenseFrame) {
    if let Some(old) = out.first_child(cursor, &Sem::TenseFrame) {
        out.detach(old);
    }
    grow_leaf(out, cursor, Sem::TenseFrame, frame.to_string());
}

/// Replace the cursor's tense-time marker leaf.
fn set_time(out: &mut SemTree, cursor: NodeId, time: TenseTime) {
    if let Some(old) = out.first_child(cursor, &Sem::TenseTime) {
        out.detach(old);
    }
    grow_leaf(out, cursor, Sem::TenseTime, time.to_string());
}

fn token<'t>(input: &'t SyntaxTree, node: NodeId) -> &'t str {
    input.text(node).unwrap_or("")
}

/// Tags whose subtrees are passed through without interpretation.
fn is_skipped(tag: Syn) -> bool {
    matches!(
        tag.structural_class(),
        StructuralClass::Punctuation | StructuralClass::Other
    )
}

/// Tags the external parser should not have produced at all.
fn is_suspect(tag: Syn) -> bool {
    matches!(
        tag,
        Syn::Unknown | Syn::X | Syn::ForeignWord | Syn::Symbol | Syn::ListItemMarker
    )
}

/// Rewrites constituency parses into semantic trees.
pub struct Transducer<'a, L: Lexicon + ?Sized> {
    lexicon: &'a L,
}

impl<'a, L: Lexicon + ?Sized> Transducer<'a, L> {
    pub fn new(lexicon: &'a L) -> Self {
        Transducer { lexicon }
    }

    /// Transduce a full parse. Never fails; unmodeled structure is logged
    /// and dropped.
    pub fn transduce(&self, parse: &SyntaxTree) -> SemTree {
        let mut out = SemTree::new(Sem::Root);
        let root = out.root();
        self.visit(parse, parse.root(), &mut out, root);
        repair(&mut out, root);
        out
    }

    /// Interpret one input node, recurse into its children if the rule asked
    /// for it, then unwind this node's pushes. Returns the cursor the next
    /// input sibling should use.
    fn visit(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        cursor: NodeId,
    ) -> NodeId {
        let step = self.interpret(input, node, out, cursor);
        let mut cursor = step.cursor;
        if step.descend && !input.is_leaf(node) {
            for &child in input.children(node) {
                cursor = self.visit(input, child, out, cursor);
            }
        }
        for _ in 0..step.pushes {
            cursor = out.parent(cursor).unwrap_or(cursor);
        }
        cursor
    }

    fn interpret(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let tag = *input.tag(node);
        if is_skipped(tag) {
            return Cursor::new(at).descend();
        }
        if is_suspect(tag) {
            warn!(%tag, "suspect tag from the external parser");
            return Cursor::new(at).descend();
        }

        let cursor_tag = *out.tag(at);
        if cursor_tag.is(Category::ContainsPhrase) {
            return self.top_level(input, node, out, at);
        }
        match cursor_tag {
            Sem::Question => self.question(input, node, out, at),
            Sem::YesNo => self.yes_no(input, node, out, at),
            Sem::Command => self.command(input, node, out, at),
            Sem::Statement => self.statement(input, node, out, at),
            Sem::InterjectionPhrase => self.interjection(input, node, out, at),
            Sem::VerbPhrase => self.verb_phrase(input, node, out, at),
            Sem::NounPhrase => self.noun_phrase(input, node, out, at),
            Sem::AdjectivePhrase => self.adjective_phrase(input, node, out, at),
            Sem::AdverbPhrase => self.adverb_phrase(input, node, out, at),
            Sem::PrepositionPhrase => self.preposition_phrase(input, node, out, at),
            Sem::SubordinateClausePhrase => self.subordinate_clause(input, node, out, at),
            Sem::ParticlePhrase => self.particle_phrase(input, node, out, at),
            other => {
                warn!(cursor = %other, input = %tag, "no rules apply at this cursor");
                Cursor::new(at).descend()
            }
        }
    }

    fn top_level(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);
        let mut cur = Cursor::new(at);
        match tag {
            Syn::WhQuestion => {
                cur.push(out, Sem::Question);
                cur.descend()
            }
            Syn::InvertedQuestion => {
                cur.push(out, Sem::YesNo);
                cur.descend()
            }
            Syn::Declarative => {
                // A clause that opens with its verb is an imperative.
                let first = input
                    .children(node)
                    .first()
                    .map(|&child| *input.tag(child));
                if matches!(first, Some(Syn::VerbPhrase) | Some(Syn::AdverbPhrase)) {
                    cur.push(out, Sem::Command);
                } else {
                    cur.push(out, Sem::Statement);
                }
                cur.descend()
            }
            Syn::Fragment => cur.descend(),
            Syn::NounPhrase => {
                cur.push(out, Sem::FragmentNoun);
                cur.push(out, Sem::NounPhrase);
                cur.descend()
            }
            Syn::AdjectivePhrase => {
                cur.push(out, Sem::FragmentAdjective);
                cur.push(out, Sem::AdjectivePhrase);
                cur.descend()
            }
            Syn::AdverbPhrase => {
                cur.push(out, Sem::FragmentAdverb);
                cur.push(out, Sem::AdverbPhrase);
                cur.descend()
            }
            Syn::WhDeterminer
            | Syn::WhPronoun
            | Syn::WhAdverb
            | Syn::WhAdjectivePhrase
            | Syn::WhAdverbPhrase
            | Syn::WhNounPhrase
            | Syn::WhPrepositionalPhrase => {
                warn!(%tag, "compressing a bare question phrase into one leaf");
                cur.push(out, Sem::QuestionFragment);
                cur.leaf(out, Sem::QuestionType, input.words(node));
                cur.stay()
            }
            Syn::InterjectionPhrase => {
                cur.push(out, Sem::InterjectionPhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag at the top level");
                cur.descend()
            }
        }
    }

    fn question(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);

        if tag.word_class() == WordClass::Verb {
            let mut cur = Cursor::new(at);
            cur.push_or_get(out, Sem::Action);
            cur.push_or_get(out, Sem::VerbPhrase);
            let inner = self.verb_phrase(input, node, out, cur.at);
            return cur.delegate(inner);
        }

        match tag {
            Syn::WhAdverbPhrase | Syn::WhNounPhrase => {
                self.question_phrase(input, node, out, at)
            }
            // The question body.
            Syn::InvertedQuestion => Cursor::new(at).descend(),
            Syn::NounPhrase => {
                let mut cur = Cursor::new(at);
                cur.push_or_get(out, Sem::Subject);
                cur.push_or_get(out, Sem::NounPhrase);
                cur.descend()
            }
            Syn::VerbPhrase => {
                let mut cur = Cursor::new(at);
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                let inner = self.verb_phrase(input, node, out, cur.at);
                cur.delegate(inner)
            }
            other => {
                warn!(tag = %other, "unhandled tag in a question");
                Cursor::new(at).descend()
            }
        }
    }

    /// A wh-phrase inside a question: find the question word (and the noun
    /// it may be modifying) and build the slot where the answer would go.
    fn question_phrase(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let mut question_word: Option<String> = None;
        let mut noun: Option<NodeId> = None;
        for &child in input.children(node) {
            let child_tag = *input.tag(child);
            match child_tag {
                Syn::WhPronoun | Syn::PossessiveWhPronoun | Syn::WhDeterminer | Syn::WhAdverb => {
                    if question_word.is_none() {
                        question_word = Some(token(input, child).to_lowercase());
                    } else {
                        warn!("multiple question words in one phrase; keeping the first");
                    }
                }
                _ if child_tag.word_class() == WordClass::Noun
                    || child_tag == Syn::NounPhrase =>
                {
                    if noun.is_none() {
                        noun = Some(child);
                    } else {
                        warn!("multiple question nouns in one phrase; keeping the first");
                    }
                }
                other => warn!(tag = %other, "unexpected tag inside a question phrase"),
            }
        }

        let Some(word) = question_word else {
            warn!("question phrase without a question word");
            return Cursor::new(at).stay();
        };

        let mut cur = Cursor::new(at);
        match word.as_str() {
            "who" | "whom" => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::Object);
                cur.push(out, Sem::NounPhrase);
                cur.leaf(out, Sem::QuestionPronoun, "who");
            }
            "what" => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::Object);
                cur.push(out, Sem::NounPhrase);
                match noun {
                    // A bare "what": the pronoun stands for the answer.
                    None => cur.leaf(out, Sem::QuestionPronoun, word),
                    // "what color": the word is acting as a determiner.
                    Some(noun) => {
                        cur.at = self.question_noun(input, noun, out, cur.at);
                        cur.leaf(out, Sem::QuestionDeterminer, word);
                    }
                }
            }
            "when" | "where" | "why" | "how" => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.leaf(out, Sem::QuestionAdverb, word);
            }
            "which" => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::Object);
                cur.push(out, Sem::NounPhrase);
                if let Some(noun) = noun {
                    cur.at = self.question_noun(input, noun, out, cur.at);
                }
                cur.leaf(out, Sem::QuestionDeterminer, word);
            }
            "whose" => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::Object);
                cur.push(out, Sem::NounPhrase);
                if let Some(noun) = noun {
                    cur.at = self.question_noun(input, noun, out, cur.at);
                }
                cur.push(out, Sem::Possessor);
                cur.push(out, Sem::NounPhrase);
                cur.leaf(out, Sem::QuestionPronoun, "who");
            }
            other => warn!(word = other, "unrecognized question word"),
        }
        cur.stay()
    }

    /// Interpret the noun a question word modifies into the noun phrase the
    /// cursor sits on, restoring the cursor level afterwards.
    fn question_noun(
        &self,
        input: &SyntaxTree,
        noun: NodeId,
        out: &mut SemTree,
        cursor: NodeId,
    ) -> NodeId {
        if input.is_leaf(noun) {
            let step = self.noun_phrase(input, noun, out, cursor);
            let mut at = step.cursor;
            for _ in 0..step.pushes {
                at = out.parent(at).unwrap_or(at);
            }
            at
        } else {
            let mut at = cursor;
            for &child in input.children(noun) {
                at = self.visit(input, child, out, at);
            }
            at
        }
    }

    fn yes_no(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);
        if tag == Syn::NounPhrase && !out.has_child(at, &Sem::Subject) {
            let mut cur = Cursor::new(at);
            cur.push(out, Sem::Subject);
            cur.push(out, Sem::NounPhrase);
            cur.descend()
        } else {
            let mut cur = Cursor::new(at);
            cur.push_or_get(out, Sem::Action);
            cur.push_or_get(out, Sem::VerbPhrase);
            let inner = self.verb_phrase(input, node, out, cur.at);
            cur.delegate(inner)
        }
    }

    fn command(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);
        let mut cur = Cursor::new(at);
        match tag {
            Syn::VerbPhrase => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.descend()
            }
            Syn::AdverbPhrase => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::AdverbPhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a command");
                cur.descend()
            }
        }
    }

    fn statement(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);
        let mut cur = Cursor::new(at);
        match tag {
            Syn::NounPhrase => {
                cur.push_or_get(out, Sem::Subject);
                cur.push_or_get(out, Sem::NounPhrase);
                cur.descend()
            }
            Syn::VerbPhrase => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.descend()
            }
            Syn::AdverbPhrase => {
                cur.push_or_get(out, Sem::Action);
                cur.push_or_get(out, Sem::VerbPhrase);
                cur.push(out, Sem::AdverbPhrase);
                cur.descend()
            }
            Syn::Declarative => cur.descend(),
            Syn::CoordinatingConjunction => {
                // Wrap what was built so far; following clauses land as
                // siblings inside the new conjunction phrase.
                let wrapper = out.insert_above(at, Sem::ConjunctionPhrase);
                grow_leaf(out, wrapper, Sem::Conjunction, token(input, node));
                Step {
                    cursor: wrapper,
                    pushes: 0,
                    descend: false,
                }
            }
            other => {
                warn!(tag = %other, "unhandled tag in a statement");
                cur.descend()
            }
        }
    }

    fn interjection(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let cur = Cursor::new(at);
        if input.is_leaf(node) {
            cur.leaf(out, Sem::InterjectionWord, token(input, node));
            cur.stay()
        } else {
            cur.descend()
        }
    }

    fn verb_phrase(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);

        if tag.word_class() == WordClass::Verb {
            let word = token(input, node);
            let Some(entry) = VerbEntry::classify(self.lexicon, word, tag) else {
                warn!(%tag, "verb-classed token without a verb classification");
                return Cursor::new(at).descend();
            };
            let cur = Cursor::new(at);
            // Modal verbs contribute tense only; there is no verb to keep.
            if entry.kind != VerbKind::Modal {
                cur.leaf(out, Sem::Verb, &entry.base);
            }
            match entry.kind {
                VerbKind::Base => set_frame(out, at, TenseFrame::Simple),
                VerbKind::Modal => set_time(out, at, TenseTime::Future),
                VerbKind::PastSimple => {
                    set_time(out, at, TenseTime::Past);
                    set_frame(out, at, TenseFrame::Simple);
                }
                VerbKind::PresentSimple => {
                    set_time(out, at, TenseTime::Present);
                    set_frame(out, at, TenseFrame::Simple);
                }
                VerbKind::Continuous => {
                    let frame = if current_frame(out, at) == Some(TenseFrame::Perfect) {
                        TenseFrame::PerfectContinuous
                    } else {
                        TenseFrame::Continuous
                    };
                    set_frame(out, at, frame);
                }
                VerbKind::Perfect => {
                    let frame = if current_frame(out, at) == Some(TenseFrame::Continuous) {
                        TenseFrame::PerfectContinuous
                    } else {
                        TenseFrame::Perfect
                    };
                    set_frame(out, at, frame);
                }
            }
            return cur.stay();
        }

        if tag.word_class() == WordClass::Adverb {
            let mut cur = Cursor::new(at);
            cur.push(out, Sem::AdverbPhrase);
            let inner = self.adverb_phrase(input, node, out, cur.at);
            return cur.delegate(inner);
        }

        let mut cur = Cursor::new(at);
        match tag {
            Syn::AdverbPhrase => {
                cur.push(out, Sem::AdverbPhrase);
                cur.descend()
            }
            // A verb phrase nested in a verb phrase means the verbs
            // collected so far were auxiliaries, not the real verb.
            Syn::VerbPhrase => {
                for verb in out.children_with(at, &Sem::Verb) {
                    out.detach(verb);
                }
                cur.descend()
            }
            Syn::To => cur.stay(),
            Syn::NounPhrase => {
                self.open_object(out, &mut cur);
                cur.push(out, Sem::NounPhrase);
                cur.descend()
            }
            Syn::AdjectivePhrase => {
                self.open_object(out, &mut cur);
                cur.push(out, Sem::AdjectivePhrase);
                cur.descend()
            }
            Syn::Declarative => {
                self.open_object(out, &mut cur);
                cur.push(out, Sem::VerbPhrase);
                cur.descend()
            }
            Syn::PrepositionalPhrase => {
                cur.push(out, Sem::PrepositionPhrase);
                cur.descend()
            }
            Syn::SubordinateClause => {
                cur.push(out, Sem::SubordinateClausePhrase);
                cur.descend()
            }
            Syn::ParticlePhrase => {
                cur.push(out, Sem::ParticlePhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a verb phrase");
                cur.descend()
            }
        }
    }

    /// Open the object slot for new material. If one is already filled this
    /// verb takes two objects: the earlier material becomes the indirect
    /// object and the existing object is reused for what follows.
    fn open_object(&self, out: &mut SemTree, cur: &mut Cursor) {
        if let Some(object) = out.first_child(cur.at, &Sem::Object) {
            let indirect = grow(out, cur.at, Sem::IndirectObject);
            for child in out.children(object).to_vec() {
                adopt(out, indirect, child);
            }
            cur.at = object;
            cur.pushes += 1;
        } else {
            cur.push(out, Sem::Object);
        }
    }

    fn noun_phrase(&self, input: &SyntaxTree, node: NodeId, out: &mut SemTree, at: NodeId) -> Step {
        let tag = *input.tag(node);

        if tag.word_class() == WordClass::Noun {
            let word = token(input, node);
            let Some(entry) = NounEntry::classify(self.lexicon, word, tag) else {
                warn!(%tag, "noun-classed token without a noun classification");
                return Cursor::new(at).descend();
            };
            let cur = Cursor::new(at);
            if entry.pronoun {
                if entry.question {
                    cur.leaf(out, Sem::QuestionPronoun, &entry.base);
                } else {
                    cur.leaf(out, Sem::Pronoun, swap_person(&entry.base));
                }
            } else {
                // "mine" and friends arrive tagged as nouns.
                cur.leaf(out, Sem::Noun, swap_person(&entry.base));
            }
            if entry.plural {
                // The marker keeps the surface form for later inspection.
                cur.leaf(out, Sem::Plural, word);
            }
            return cur.stay();
        }

        if tag.word_class() == WordClass::Adjective {
            let mut cur = Cursor::new(at);
            cur.push(out, Sem::AdjectivePhrase);
            let inner = self.adjective_phrase(input, node, out, cur.at);
            return cur.delegate(inner);
        }

        let mut cur = Cursor::new(at);
        match tag {
            Syn::Adverb => {
                let word = token(input, node);
                if word == "not" {
                    // "not" is sometimes parsed into the object; it belongs
                    // to the verb phrase two levels up.
                    let target = out
                        .parent(at)
                        .and_then(|parent| out.parent(parent))
                        .unwrap_or(at);
                    let phrase = grow(out, target, Sem::AdverbPhrase);
                    grow_leaf(out, phrase, Sem::Adverb, word);
                } else {
                    // "there" and a few others get tagged as adverbs.
                    cur.leaf(out, Sem::Noun, word);
                }
                cur.stay()
            }
            Syn::Determiner => {
                let word = token(input, node);
                let determiner = if word == "an" { "a" } else { word };
                cur.leaf(out, Sem::Determiner, determiner);
                cur.stay()
            }
            Syn::AdjectivePhrase => {
                cur.push(out, Sem::AdjectivePhrase);
                cur.descend()
            }
            // "quick and brown": the conjunction itself adds nothing.
            Syn::CoordinatingConjunction => cur.stay(),
            Syn::NounPhrase => {
                if input.has_child(node, &Syn::PossessiveEnding) {
                    cur.push(out, Sem::Possessor);
                    cur.push(out, Sem::NounPhrase);
                    cur.descend()
                } else {
                    // Sub-phrases show up around prepositions.
                    cur.descend()
                }
            }
            Syn::PrepositionalPhrase => {
                cur.push(out, Sem::PrepositionPhrase);
                cur.descend()
            }
            Syn::PossessiveEnding => {
                let parent_tag = out.parent(at).map(|parent| *out.tag(parent));
                if parent_tag != Some(Sem::Possessor) {
                    out.insert_above(at, Sem::Possessor);
                    // The cursor's absolute depth grew by one level.
                    cur.pushes += 1;
                }
                cur.stay()
            }
            Syn::PossessivePronoun => {
                cur.push(out, Sem::Possessor);
                cur.push(out, Sem::NounPhrase);
                let possessor = possessor_noun(token(input, node));
                if is_wh_word(&possessor) {
                    cur.leaf(out, Sem::QuestionPronoun, possessor);
                } else {
                    cur.leaf(out, Sem::Pronoun, possessor);
                }
                cur.stay()
            }
            Syn::SubordinateClause => {
                cur.push(out, Sem::SubordinateClausePhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a noun phrase");
                cur.descend()
            }
        }
    }

    fn adjective_phrase(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let mut tag = *input.tag(node);

        // Adjectives in yes/no questions come back tagged as verbs.
        if tag.word_class() == WordClass::Verb {
            tag = Syn::Adjective;
        }

        if tag.word_class() == WordClass::Adjective {
            let mut cur = Cursor::new(at);
            if out.has_child(cur.at, &Sem::Adjective) {
                // One head per phrase: start a sibling phrase for this one.
                let parent = out.parent(cur.at).unwrap_or(cur.at);
                cur.at = grow(out, parent, Sem::AdjectivePhrase);
            }
            let word = token(input, node);
            let Some(entry) = GradedEntry::classify_adjective(self.lexicon, word, tag) else {
                warn!(%tag, "adjective-classed token without a classification");
                return cur.descend();
            };
            // "yours" arrives tagged as an adjective.
            cur.leaf(out, Sem::Adjective, swap_person(&entry.base));
            match entry.degree {
                Degree::Positive => {}
                Degree::Comparative => cur.leaf(out, Sem::Comparative, word),
                Degree::Superlative => cur.leaf(out, Sem::Superlative, word),
            }
            return cur.stay();
        }

        if tag.word_class() == WordClass::Adverb {
            let mut cur = Cursor::new(at);
            cur.push(out, Sem::AdverbPhrase);
            let inner = self.adverb_phrase(input, node, out, cur.at);
            return cur.delegate(inner);
        }

        let mut cur = Cursor::new(at);
        match tag {
            Syn::AdverbPhrase => {
                cur.push(out, Sem::AdverbPhrase);
                cur.descend()
            }
            // Sub-phrases occur inside some prepositions.
            Syn::AdjectivePhrase => cur.descend(),
            Syn::PrepositionalPhrase => {
                cur.push(out, Sem::PrepositionPhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in an adjective phrase");
                cur.descend()
            }
        }
    }

    fn adverb_phrase(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let tag = *input.tag(node);

        if tag == Syn::WhAdverb {
            // The question adverb belongs to the phrase above, not here.
            let target = out.parent(at).unwrap_or(at);
            grow_leaf(out, target, Sem::QuestionAdverb, token(input, node));
            return Cursor::new(at).stay();
        }

        if tag.word_class() == WordClass::Adverb {
            let mut cur = Cursor::new(at);
            if out.has_child(cur.at, &Sem::Adverb) {
                // "very quickly": wrap the filled phrase and build alongside.
                cur.at = out.insert_above(cur.at, Sem::AdverbPhrase);
            }
            let word = token(input, node);
            let Some(entry) = GradedEntry::classify_adverb(self.lexicon, word, tag) else {
                warn!(%tag, "adverb-classed token without a classification");
                return cur.descend();
            };
            cur.leaf(out, Sem::Adverb, &entry.base);
            match entry.degree {
                Degree::Positive => {}
                Degree::Comparative => cur.leaf(out, Sem::Comparative, word),
                Degree::Superlative => cur.leaf(out, Sem::Superlative, word),
            }
            return cur.stay();
        }

        let mut cur = Cursor::new(at);
        match tag {
            // "quick and easily": the conjunction adds nothing here.
            Syn::CoordinatingConjunction => cur.stay(),
            Syn::AdverbPhrase => cur.descend(),
            Syn::PrepositionalPhrase => {
                cur.push(out, Sem::PrepositionPhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in an adverb phrase");
                cur.descend()
            }
        }
    }

    fn preposition_phrase(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let tag = *input.tag(node);
        let mut cur = Cursor::new(at);
        match tag {
            Syn::To | Syn::Preposition => {
                cur.leaf(out, Sem::Preposition, token(input, node));
                cur.stay()
            }
            Syn::NounPhrase => {
                cur.push(out, Sem::Object);
                cur.push(out, Sem::NounPhrase);
                cur.descend()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a preposition phrase");
                cur.descend()
            }
        }
    }

    fn subordinate_clause(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let tag = *input.tag(node);
        let mut cur = Cursor::new(at);
        match tag {
            Syn::Preposition => {
                cur.leaf(out, Sem::Conjunction, token(input, node));
                cur.stay()
            }
            Syn::Declarative => {
                cur.push_or_get(out, Sem::Statement);
                cur.descend()
            }
            Syn::WhNounPhrase => {
                warn!("compressing a relative pronoun phrase into one leaf");
                cur.push_or_get(out, Sem::Statement);
                cur.push_or_get(out, Sem::Subject);
                cur.push_or_get(out, Sem::NounPhrase);
                cur.leaf(out, Sem::ReferringPronoun, input.words(node));
                cur.stay()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a subordinate clause");
                cur.descend()
            }
        }
    }

    fn particle_phrase(
        &self,
        input: &SyntaxTree,
        node: NodeId,
        out: &mut SemTree,
        at: NodeId,
    ) -> Step {
        let tag = *input.tag(node);
        let cur = Cursor::new(at);
        match tag {
            Syn::Particle => {
                cur.leaf(out, Sem::Particle, token(input, node));
                cur.stay()
            }
            other => {
                warn!(tag = %other, "unhandled tag in a particle phrase");
                cur.descend()
            }
        }
    }
}

/// Bottom-up correction pass over the finished tree.
///
/// A wh-question whose subject was parsed as the verb's object (or indirect
/// object) gets that noun phrase promoted into a proper subject.
fn repair(out: &mut SemTree, node: NodeId) {
    for child in out.children(node).to_vec() {
        repair(out, child);
    }

    if *out.tag(node) != Sem::Question || out.has_child(node, &Sem::Subject) {
        return;
    }
    let Some(action) = out.first_child(node, &Sem::Action) else {
        return;
    };
    let Some(verb_phrase) = out.first_child(action, &Sem::VerbPhrase) else {
        return;
    };
    let Some(wrapper) = out
        .first_child(verb_phrase, &Sem::IndirectObject)
        .or_else(|| out.first_child(verb_phrase, &Sem::Object))
    else {
        return;
    };
    let noun = out.first_child(wrapper, &Sem::NounPhrase);
    out.detach(wrapper);
    let subject = grow(out, node, Sem::Subject);
    if let Some(noun) = noun {
        adopt(out, subject, noun);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::IdentityLexicon;

    fn phrase(tree: &mut SyntaxTree, parent: NodeId, tag: Syn) -> NodeId {
        tree.add_internal(parent, tag).unwrap()
    }

    fn word(tree: &mut SyntaxTree, parent: NodeId, tag: Syn, text: &str) {
        tree.add_leaf(parent, tag, text).unwrap();
    }

    fn child(tree: &SemTree, id: NodeId, tag: Sem) -> NodeId {
        tree.first_child(id, &tag)
            .unwrap_or_else(|| panic!("no {tag} under {}", tree.tag(id)))
    }

    fn transduce(input: &SyntaxTree) -> SemTree {
        Transducer::new(&IdentityLexicon).transduce(input)
    }

    #[test]
    fn test_statement_shape() {
        // "I like you"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let np = phrase(&mut input, s, Syn::NounPhrase);
        word(&mut input, np, Syn::PersonalPronoun, "I");
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbPresent, "like");
        let obj = phrase(&mut input, vp, Syn::NounPhrase);
        word(&mut input, obj, Syn::PersonalPronoun, "you");

        let out = transduce(&input);
        let statement = child(&out, out.root(), Sem::Statement);
        let subject = child(&out, statement, Sem::Subject);
        let subject_np = child(&out, subject, Sem::NounPhrase);
        // Perspective is swapped on the way in.
        assert!(out.has_leaf_child(subject_np, &Sem::Pronoun, "you"));

        let action = child(&out, statement, Sem::Action);
        let verb_phrase = child(&out, action, Sem::VerbPhrase);
        assert!(out.has_leaf_child(verb_phrase, &Sem::Verb, "like"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseTime, "PRESENT"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseFrame, "SIMPLE"));

        let object = child(&out, verb_phrase, Sem::Object);
        let object_np = child(&out, object, Sem::NounPhrase);
        assert!(out.has_leaf_child(object_np, &Sem::Pronoun, "me"));
    }

    #[test]
    fn test_verb_first_clause_is_a_command() {
        // "run"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbBase, "run");

        let out = transduce(&input);
        let command = child(&out, out.root(), Sem::Command);
        let action = child(&out, command, Sem::Action);
        let verb_phrase = child(&out, action, Sem::VerbPhrase);
        assert!(out.has_leaf_child(verb_phrase, &Sem::Verb, "run"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseFrame, "SIMPLE"));
        assert!(!out.has_child(verb_phrase, &Sem::TenseTime));
    }

    #[test]
    fn test_double_object_promotion() {
        // "tell me your name"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbBase, "tell");
        let me = phrase(&mut input, vp, Syn::NounPhrase);
        word(&mut input, me, Syn::PersonalPronoun, "me");
        let name = phrase(&mut input, vp, Syn::NounPhrase);
        word(&mut input, name, Syn::PossessivePronoun, "your");
        word(&mut input, name, Syn::NounSingular, "name");

        let out = transduce(&input);
        let command = child(&out, out.root(), Sem::Command);
        let verb_phrase = child(&out, child(&out, command, Sem::Action), Sem::VerbPhrase);

        assert_eq!(out.children_with(verb_phrase, &Sem::Object).len(), 1);
        assert_eq!(out.children_with(verb_phrase, &Sem::IndirectObject).len(), 1);

        // The first object became the indirect object.
        let indirect = child(&out, verb_phrase, Sem::IndirectObject);
        let indirect_np = child(&out, indirect, Sem::NounPhrase);
        assert!(out.has_leaf_child(indirect_np, &Sem::Pronoun, "you"));

        // The fresh object holds the possessive phrase.
        let object = child(&out, verb_phrase, Sem::Object);
        let object_np = child(&out, object, Sem::NounPhrase);
        let possessor = child(&out, object_np, Sem::Possessor);
        let possessor_np = child(&out, possessor, Sem::NounPhrase);
        assert!(out.has_leaf_child(possessor_np, &Sem::Pronoun, "me"));
        assert!(out.has_leaf_child(object_np, &Sem::Noun, "name"));
    }

    #[test]
    fn test_perfect_then_continuous_merges() {
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbPastParticiple, "been");
        word(&mut input, vp, Syn::VerbGerund, "eating");

        let out = transduce(&input);
        let command = child(&out, out.root(), Sem::Command);
        let verb_phrase = child(&out, child(&out, command, Sem::Action), Sem::VerbPhrase);
        let frames = out.children_with(verb_phrase, &Sem::TenseFrame);
        assert_eq!(frames.len(), 1);
        assert_eq!(out.text(frames[0]), Some("PERFECT_CONTINUOUS"));
    }

    #[test]
    fn test_continuous_then_perfect_merges() {
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbGerund, "eating");
        word(&mut input, vp, Syn::VerbPastParticiple, "been");

        let out = transduce(&input);
        let command = child(&out, out.root(), Sem::Command);
        let verb_phrase = child(&out, child(&out, command, Sem::Action), Sem::VerbPhrase);
        let frames = out.children_with(verb_phrase, &Sem::TenseFrame);
        assert_eq!(frames.len(), 1);
        assert_eq!(out.text(frames[0]), Some("PERFECT_CONTINUOUS"));
    }

    #[test]
    fn test_nested_verb_phrase_drops_auxiliary() {
        // "has eaten": "has" is the auxiliary, "eaten" is the real verb.
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let np = phrase(&mut input, s, Syn::NounPhrase);
        word(&mut input, np, Syn::PersonalPronoun, "she");
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbPresentThirdSingular, "has");
        let inner = phrase(&mut input, vp, Syn::VerbPhrase);
        word(&mut input, inner, Syn::VerbPastParticiple, "eaten");

        let out = transduce(&input);
        let statement = child(&out, out.root(), Sem::Statement);
        let verb_phrase = child(&out, child(&out, statement, Sem::Action), Sem::VerbPhrase);
        let verbs = out.children_with(verb_phrase, &Sem::Verb);
        assert_eq!(verbs.len(), 1);
        assert_eq!(out.text(verbs[0]), Some("eaten"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseTime, "PRESENT"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseFrame, "PERFECT"));
    }

    #[test]
    fn test_question_subject_promotion() {
        // "who runs": the question pronoun lands in the object slot and the
        // repair pass promotes it to the missing subject.
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let sbarq = phrase(&mut input, root, Syn::WhQuestion);
        let whnp = phrase(&mut input, sbarq, Syn::WhNounPhrase);
        word(&mut input, whnp, Syn::WhPronoun, "who");
        let sq = phrase(&mut input, sbarq, Syn::InvertedQuestion);
        let vp = phrase(&mut input, sq, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbPresentThirdSingular, "runs");

        let out = transduce(&input);
        let question = child(&out, out.root(), Sem::Question);
        let subject = child(&out, question, Sem::Subject);
        let subject_np = child(&out, subject, Sem::NounPhrase);
        assert!(out.has_leaf_child(subject_np, &Sem::QuestionPronoun, "who"));

        let verb_phrase = child(&out, child(&out, question, Sem::Action), Sem::VerbPhrase);
        assert!(!out.has_child(verb_phrase, &Sem::Object));
        assert!(out.has_leaf_child(verb_phrase, &Sem::Verb, "runs"));
    }

    #[test]
    fn test_what_question_keeps_its_subject() {
        // "what is your name"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let sbarq = phrase(&mut input, root, Syn::WhQuestion);
        let whnp = phrase(&mut input, sbarq, Syn::WhNounPhrase);
        word(&mut input, whnp, Syn::WhPronoun, "what");
        let sq = phrase(&mut input, sbarq, Syn::InvertedQuestion);
        word(&mut input, sq, Syn::VerbPresentThirdSingular, "is");
        let np = phrase(&mut input, sq, Syn::NounPhrase);
        word(&mut input, np, Syn::PossessivePronoun, "your");
        word(&mut input, np, Syn::NounSingular, "name");

        let out = transduce(&input);
        let question = child(&out, out.root(), Sem::Question);

        let verb_phrase = child(&out, child(&out, question, Sem::Action), Sem::VerbPhrase);
        let object_np = child(&out, child(&out, verb_phrase, Sem::Object), Sem::NounPhrase);
        assert!(out.has_leaf_child(object_np, &Sem::QuestionPronoun, "what"));
        assert!(out.has_leaf_child(verb_phrase, &Sem::Verb, "is"));

        let subject_np = child(&out, child(&out, question, Sem::Subject), Sem::NounPhrase);
        assert!(out.has_leaf_child(subject_np, &Sem::Noun, "name"));
        let possessor_np = child(&out, child(&out, subject_np, Sem::Possessor), Sem::NounPhrase);
        assert!(out.has_leaf_child(possessor_np, &Sem::Pronoun, "me"));
    }

    #[test]
    fn test_modal_contributes_future_without_a_verb() {
        // "she will run"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let np = phrase(&mut input, s, Syn::NounPhrase);
        word(&mut input, np, Syn::PersonalPronoun, "she");
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::ModalVerb, "will");
        let inner = phrase(&mut input, vp, Syn::VerbPhrase);
        word(&mut input, inner, Syn::VerbBase, "run");

        let out = transduce(&input);
        let statement = child(&out, out.root(), Sem::Statement);
        let verb_phrase = child(&out, child(&out, statement, Sem::Action), Sem::VerbPhrase);
        assert!(out.has_leaf_child(verb_phrase, &Sem::TenseTime, "FUTURE"));
        let verbs = out.children_with(verb_phrase, &Sem::Verb);
        assert_eq!(verbs.len(), 1);
        assert_eq!(out.text(verbs[0]), Some("run"));
    }

    #[test]
    fn test_conjunction_wraps_statements() {
        // "I sleep and you eat"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let outer = phrase(&mut input, root, Syn::Declarative);
        let s1 = phrase(&mut input, outer, Syn::Declarative);
        let np1 = phrase(&mut input, s1, Syn::NounPhrase);
        word(&mut input, np1, Syn::PersonalPronoun, "I");
        let vp1 = phrase(&mut input, s1, Syn::VerbPhrase);
        word(&mut input, vp1, Syn::VerbPresent, "sleep");
        word(&mut input, outer, Syn::CoordinatingConjunction, "and");
        let s2 = phrase(&mut input, outer, Syn::Declarative);
        let np2 = phrase(&mut input, s2, Syn::NounPhrase);
        word(&mut input, np2, Syn::PersonalPronoun, "you");
        let vp2 = phrase(&mut input, s2, Syn::VerbPhrase);
        word(&mut input, vp2, Syn::VerbPresent, "eat");

        let out = transduce(&input);
        let conjunction = child(&out, out.root(), Sem::ConjunctionPhrase);
        assert!(out.has_leaf_child(conjunction, &Sem::Conjunction, "and"));
        assert_eq!(out.children_with(conjunction, &Sem::Statement).len(), 2);
    }

    #[test]
    fn test_bare_noun_phrase_becomes_a_fragment() {
        // "the cats"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let np = phrase(&mut input, root, Syn::NounPhrase);
        word(&mut input, np, Syn::Determiner, "the");
        word(&mut input, np, Syn::NounPlural, "cats");

        let out = transduce(&input);
        let fragment = child(&out, out.root(), Sem::FragmentNoun);
        let noun_phrase = child(&out, fragment, Sem::NounPhrase);
        assert!(out.has_leaf_child(noun_phrase, &Sem::Determiner, "the"));
        assert!(out.has_leaf_child(noun_phrase, &Sem::Noun, "cats"));
        assert!(out.has_leaf_child(noun_phrase, &Sem::Plural, "cats"));
    }

    #[test]
    fn test_second_adjective_opens_a_sibling_phrase() {
        // "the quick brown fox"
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let np = phrase(&mut input, root, Syn::NounPhrase);
        word(&mut input, np, Syn::Determiner, "the");
        let adjp = phrase(&mut input, np, Syn::AdjectivePhrase);
        word(&mut input, adjp, Syn::Adjective, "quick");
        word(&mut input, adjp, Syn::Adjective, "brown");
        word(&mut input, np, Syn::NounSingular, "fox");

        let out = transduce(&input);
        let noun_phrase = child(&out, child(&out, out.root(), Sem::FragmentNoun), Sem::NounPhrase);
        let phrases = out.children_with(noun_phrase, &Sem::AdjectivePhrase);
        assert_eq!(phrases.len(), 2);
        assert!(out.has_leaf_child(phrases[0], &Sem::Adjective, "quick"));
        assert!(out.has_leaf_child(phrases[1], &Sem::Adjective, "brown"));
        assert!(out.has_leaf_child(noun_phrase, &Sem::Noun, "fox"));
    }

    #[test]
    fn test_punctuation_and_suspect_tags_are_transparent() {
        let mut input = SyntaxTree::new(Syn::Root);
        let root = input.root();
        let s = phrase(&mut input, root, Syn::Declarative);
        let np = phrase(&mut input, s, Syn::NounPhrase);
        word(&mut input, np, Syn::PersonalPronoun, "I");
        let vp = phrase(&mut input, s, Syn::VerbPhrase);
        word(&mut input, vp, Syn::VerbPresent, "sleep");
        word(&mut input, s, Syn::SentenceTerminator, ".");
        word(&mut input, s, Syn::Symbol, "@");

        let out = transduce(&input);
        let statement = child(&out, out.root(), Sem::Statement);
        assert!(out.has_child(statement, &Sem::Subject));
        assert!(out.has_child(statement, &Sem::Action));
        // Neither the terminator nor the symbol produced anything.
        assert_eq!(out.child_count(statement), 2);
    }
}
