//! The sentence renderer — the structural inverse of transduction.
//!
//! Rendering mirrors the tag schema: word leaves contribute their literal
//! text, ignored marker leaves contribute nothing, single-child wrappers
//! defer to their child, and each phrase kind has a fixed member ordering.
//! The morphology service supplies the surface forms the tree stores only
//! abstractly: conjugation from the tense markers, plurals, degrees,
//! possessives and subject-cased pronouns.
//!
//! Rendering never fails. A node with no rule falls back to its leaf text,
//! or to its children joined in order, with a logged warning.

use tracing::warn;

use crate::morph::{Morphology, TenseFrame, TenseTime};
use crate::schema::{Category, SemTree, SemanticTag as Sem};
use crate::tree::NodeId;

/// Renders semantic trees back into text.
pub struct Renderer<'a, M: Morphology + ?Sized> {
    morphology: &'a M,
}

impl<'a, M: Morphology + ?Sized> Renderer<'a, M> {
    pub fn new(morphology: &'a M) -> Self {
        Renderer { morphology }
    }

    /// Render a tree. With `punctuate`, the first letter is capitalized and
    /// terminal punctuation is appended: a period, unless the sentence
    /// already ends with a question mark.
    pub fn render(&self, tree: &SemTree, punctuate: bool) -> String {
        let sentence = self.construct(tree, tree.root(), punctuate);
        if sentence.is_empty() {
            return sentence;
        }
        if punctuate {
            let mut out = capitalize(&sentence);
            if !out.ends_with('?') {
                out.push('.');
            }
            out
        } else {
            sentence
        }
    }

    fn construct(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let tag = *tree.tag(node);
        if tag.is(Category::Word) {
            return tree.text(node).unwrap_or("").to_string();
        }
        if !tree.is_leaf(node) && tree.child_count(node) == 0 {
            return String::new();
        }
        if tag.is(Category::Ignored) {
            return String::new();
        }
        if tag == Sem::Possessor {
            let Some(&child) = tree.children(node).first() else {
                return String::new();
            };
            return self.morphology.possessive(&self.construct(tree, child, punctuate));
        }
        if tag.is(Category::SingleChild) {
            let Some(&child) = tree.children(node).first() else {
                return String::new();
            };
            return self.construct(tree, child, punctuate);
        }
        if tag.is(Category::ContainsPhrase) {
            return self.join_children(tree, node, punctuate);
        }

        match tag {
            Sem::ConjunctionPhrase => self.conjunction_phrase(tree, node, punctuate),
            Sem::Statement => self.statement(tree, node, punctuate),
            Sem::Question => {
                let mut sentence = self.question(tree, node, punctuate);
                if punctuate {
                    sentence.push('?');
                }
                sentence
            }
            Sem::YesNo => {
                let mut sentence = self.statement(tree, node, punctuate);
                if punctuate {
                    sentence.push('?');
                }
                sentence
            }
            Sem::NounPhrase => self.noun_phrase(tree, node, punctuate),
            Sem::VerbPhrase => self.verb_phrase(tree, node, punctuate),
            Sem::AdjectivePhrase => self.graded_phrase(tree, node, Sem::Adjective, punctuate),
            Sem::AdverbPhrase => self.graded_phrase(tree, node, Sem::Adverb, punctuate),
            Sem::PrepositionPhrase => self.preposition_phrase(tree, node, punctuate),
            Sem::SubordinateClausePhrase => self.subordinate_clause(tree, node, punctuate),
            Sem::ParticlePhrase => self.particles(tree, node, punctuate),
            other => {
                warn!(tag = %other, "no rendering rule; falling back");
                if tree.is_leaf(node) {
                    tree.text(node).unwrap_or("").to_string()
                } else {
                    self.join_children(tree, node, punctuate)
                }
            }
        }
    }

    fn join_children(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let fragments: Vec<String> = tree
            .children(node)
            .iter()
            .map(|&child| self.construct(tree, child, punctuate))
            .collect();
        join(fragments)
    }

    /// Phrases and conjunction words alternate positionally, whichever list
    /// runs out first.
    fn conjunction_phrase(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut conjunctions = Vec::new();
        let mut phrases = Vec::new();
        for &child in tree.children(node) {
            let rendered = self.construct(tree, child, punctuate);
            if *tree.tag(child) == Sem::Conjunction {
                conjunctions.push(rendered);
            } else {
                phrases.push(rendered);
            }
        }

        let mut fragments = Vec::new();
        for i in 0..phrases.len().max(conjunctions.len()) {
            if let Some(phrase) = phrases.get(i) {
                fragments.push(phrase.clone());
            }
            if let Some(conjunction) = conjunctions.get(i) {
                fragments.push(conjunction.clone());
            }
        }
        join(fragments)
    }

    fn statement(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut fragments = Vec::new();
        if let Some(subject) = tree.first_child(node, &Sem::Subject) {
            fragments.push(self.construct(tree, subject, punctuate));
        }
        if let Some(action) = tree.first_child(node, &Sem::Action) {
            fragments.push(self.construct(tree, action, punctuate));
        }
        join(fragments)
    }

    fn question(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut fragments = Vec::new();
        if let Some(kind) = tree.first_child(node, &Sem::QuestionType) {
            fragments.push(self.construct(tree, kind, punctuate));
        }
        if let Some(subject) = tree.first_child(node, &Sem::Subject) {
            fragments.push(self.construct(tree, subject, punctuate));
        }
        if let Some(action) = tree.first_child(node, &Sem::Action) {
            fragments.push(self.construct(tree, action, punctuate));
        }
        join(fragments)
    }

    fn noun_phrase(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut nouns = tree.children_with(node, &Sem::Noun);
        nouns.extend(tree.children_with(node, &Sem::Pronoun));
        nouns.extend(tree.children_with(node, &Sem::QuestionPronoun));
        nouns.extend(tree.children_with(node, &Sem::ReferringPronoun));
        let mut determiners = tree.children_with(node, &Sem::Determiner);
        determiners.extend(tree.children_with(node, &Sem::QuestionDeterminer));

        let plural = tree.has_child(node, &Sem::Plural);
        let subject = tree
            .parent(node)
            .is_some_and(|parent| *tree.tag(parent) == Sem::Subject);

        let mut fragments = Vec::new();
        for determiner in determiners {
            fragments.push(self.construct(tree, determiner, punctuate));
        }
        for possessor in tree.children_with(node, &Sem::Possessor) {
            fragments.push(self.construct(tree, possessor, punctuate));
        }
        for adjective in tree.children_with(node, &Sem::AdjectivePhrase) {
            fragments.push(self.construct(tree, adjective, punctuate));
        }
        for noun in nouns {
            let mut word = tree.text(noun).unwrap_or("").to_string();
            if subject {
                word = self.morphology.subject_form(&word);
            }
            if plural {
                word = self.morphology.pluralize(&word);
            }
            fragments.push(word);
        }
        for preposition in tree.children_with(node, &Sem::PrepositionPhrase) {
            fragments.push(self.construct(tree, preposition, punctuate));
        }
        for clause in tree.children_with(node, &Sem::SubordinateClausePhrase) {
            fragments.push(self.construct(tree, clause, punctuate));
        }
        join(fragments)
    }

    fn verb_phrase(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let time = marker::<TenseTime>(tree, node, Sem::TenseTime);
        let frame = marker::<TenseFrame>(tree, node, Sem::TenseFrame);

        let mut fragments = Vec::new();
        for adverb in tree.children_with(node, &Sem::AdverbPhrase) {
            fragments.push(self.construct(tree, adverb, punctuate));
        }
        for verb in tree.children_with(node, &Sem::Verb) {
            let word = tree.text(verb).unwrap_or("");
            fragments.push(self.morphology.conjugate(word, time, frame));
        }
        for indirect in tree.children_with(node, &Sem::IndirectObject) {
            fragments.push(self.construct(tree, indirect, punctuate));
        }
        for object in tree.children_with(node, &Sem::Object) {
            fragments.push(self.construct(tree, object, punctuate));
        }
        for particle in tree.children_with(node, &Sem::ParticlePhrase) {
            fragments.push(self.construct(tree, particle, punctuate));
        }
        for preposition in tree.children_with(node, &Sem::PrepositionPhrase) {
            fragments.push(self.construct(tree, preposition, punctuate));
        }
        for clause in tree.children_with(node, &Sem::SubordinateClausePhrase) {
            fragments.push(self.construct(tree, clause, punctuate));
        }
        for adverb in tree.children_with(node, &Sem::QuestionAdverb) {
            fragments.push(self.construct(tree, adverb, punctuate));
        }
        join(fragments)
    }

    /// Adjective and adverb phrases share a shape: leading adverb phrases,
    /// then the graded head words, then preposition phrases.
    fn graded_phrase(&self, tree: &SemTree, node: NodeId, head: Sem, punctuate: bool) -> String {
        let comparative = tree.has_child(node, &Sem::Comparative);
        let superlative = tree.has_child(node, &Sem::Superlative);

        let mut fragments = Vec::new();
        for adverb in tree.children_with(node, &Sem::AdverbPhrase) {
            fragments.push(self.construct(tree, adverb, punctuate));
        }
        for leaf in tree.children_with(node, &head) {
            let word = tree.text(leaf).unwrap_or("");
            let word = if superlative {
                self.morphology.superlative(word)
            } else if comparative {
                self.morphology.comparative(word)
            } else {
                word.to_string()
            };
            fragments.push(word);
        }
        for preposition in tree.children_with(node, &Sem::PrepositionPhrase) {
            fragments.push(self.construct(tree, preposition, punctuate));
        }
        join(fragments)
    }

    fn preposition_phrase(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut fragments = Vec::new();
        for preposition in tree.children_with(node, &Sem::Preposition) {
            fragments.push(self.construct(tree, preposition, punctuate));
        }
        for object in tree.children_with(node, &Sem::Object) {
            fragments.push(self.construct(tree, object, punctuate));
        }
        join(fragments)
    }

    fn subordinate_clause(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let mut fragments = Vec::new();
        for conjunction in tree.children_with(node, &Sem::Conjunction) {
            fragments.push(self.construct(tree, conjunction, punctuate));
        }
        for statement in tree.children_with(node, &Sem::Statement) {
            fragments.push(self.construct(tree, statement, punctuate));
        }
        join(fragments)
    }

    fn particles(&self, tree: &SemTree, node: NodeId, punctuate: bool) -> String {
        let fragments: Vec<String> = tree
            .children_with(node, &Sem::Particle)
            .into_iter()
            .map(|particle| self.construct(tree, particle, punctuate))
            .collect();
        join(fragments)
    }
}

/// First marker leaf with this tag, parsed; defaults when absent or
/// unparseable.
fn marker<T: std::str::FromStr + Default>(tree: &SemTree, node: NodeId, tag: Sem) -> T {
    tree.first_child(node, &tag)
        .and_then(|leaf| tree.text(leaf))
        .and_then(|text| text.parse().ok())
        .unwrap_or_default()
}

/// Join non-empty fragments with single spaces; empty fragments contribute
/// nothing, not even a stray space.
fn join(fragments: Vec<String>) -> String {
    let fragments: Vec<String> = fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect();
    fragments.join(" ")
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
