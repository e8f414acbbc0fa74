//! Discourse referent slots and pronoun substitution.
//!
//! Four slots track what "him", "her", "it" and "them" most recently meant:
//! plural phrases land in `them`, phrases headed by a known first name land
//! in `him` or `her`, and everything else lands in `it`. Each slot owns a
//! deep copy of the noun phrase it saw; later phrases in the same scan
//! overwrite earlier ones. When "him" or "her" has never been set, the `it`
//! referent stands in.

use parley_grammar::schema::SemanticTag as Sem;
use parley_grammar::{Morphology, NodeId, Renderer, SemTree};
use tracing::debug;

use crate::names::NameList;

/// The most recent referent for each of the four generic pronouns.
#[derive(Debug, Clone, Default)]
pub struct DiscourseContext {
    him: Option<SemTree>,
    her: Option<SemTree>,
    it: Option<SemTree>,
    them: Option<SemTree>,
    names: NameList,
}

/// All noun-phrase nodes underneath `node`, in document order.
fn noun_phrases(tree: &SemTree, node: NodeId, out: &mut Vec<NodeId>) {
    if *tree.tag(node) == Sem::NounPhrase {
        out.push(node);
    }
    for &child in tree.children(node) {
        noun_phrases(tree, child, out);
    }
}

impl DiscourseContext {
    pub fn new(names: NameList) -> Self {
        DiscourseContext {
            names,
            ..Default::default()
        }
    }

    /// Scan a tree for noun phrases and remember each as the referent of
    /// the pronoun that could stand for it. The last matching phrase in
    /// document order wins each slot.
    pub fn observe(&mut self, tree: &SemTree) {
        let mut phrases = Vec::new();
        noun_phrases(tree, tree.root(), &mut phrases);

        for phrase in phrases {
            if tree.has_child(phrase, &Sem::Plural) {
                self.them = Some(tree.extract(phrase));
                continue;
            }

            if let Some(noun) = tree.first_child(phrase, &Sem::Noun) {
                let word = tree.text(noun).unwrap_or("");
                if self.names.is_male(word) {
                    debug!(name = word, "remembering a male referent");
                    self.him = Some(tree.extract(phrase));
                    continue;
                }
                if self.names.is_female(word) {
                    debug!(name = word, "remembering a female referent");
                    self.her = Some(tree.extract(phrase));
                    continue;
                }
            }

            self.it = Some(tree.extract(phrase));
        }
    }

    /// Replace resolvable pronouns in place: a noun phrase holding a direct
    /// pronoun leaf gets that leaf removed and deep copies of the referent's
    /// members spliced in. Pronouns with no referent are left untouched.
    pub fn resolve(&self, tree: &mut SemTree) {
        let mut phrases = Vec::new();
        noun_phrases(tree, tree.root(), &mut phrases);

        for phrase in phrases {
            let Some(pronoun) = tree.first_child(phrase, &Sem::Pronoun) else {
                continue;
            };
            let word = tree.text(pronoun).unwrap_or("").to_string();
            let Some(referent) = self.referent_for(&word) else {
                continue;
            };
            tree.detach(pronoun);
            for &member in referent.children(referent.root()) {
                if let Err(error) = tree.graft(phrase, referent, member) {
                    tracing::warn!(%error, "could not splice a referent member");
                }
            }
        }
    }

    /// The referent a pronoun surface form stands for, if any slot holds
    /// one.
    pub fn referent_for(&self, pronoun: &str) -> Option<&SemTree> {
        match pronoun.to_lowercase().as_str() {
            "she" | "her" | "herself" => self.her(),
            "he" | "him" | "himself" => self.him(),
            "they" | "them" | "those" | "themselves" => self.them(),
            "that" | "it" | "itself" => self.it(),
            _ => None,
        }
    }

    /// The "him" referent; falls back to "it" when no male referent has
    /// been seen.
    pub fn him(&self) -> Option<&SemTree> {
        self.him.as_ref().or(self.it.as_ref())
    }

    /// The "her" referent; falls back to "it" when no female referent has
    /// been seen.
    pub fn her(&self) -> Option<&SemTree> {
        self.her.as_ref().or(self.it.as_ref())
    }

    pub fn it(&self) -> Option<&SemTree> {
        self.it.as_ref()
    }

    pub fn them(&self) -> Option<&SemTree> {
        self.them.as_ref()
    }

    /// Human-readable dump of the four slots, one per line.
    pub fn describe<M: Morphology + ?Sized>(&self, renderer: &Renderer<'_, M>) -> String {
        let phrase = |slot: &Option<SemTree>| match slot {
            Some(tree) => renderer.render(tree, false),
            None => "none".to_string(),
        };
        format!(
            "him: {}\nher: {}\nit: {}\nthem: {}",
            phrase(&self.him),
            phrase(&self.her),
            phrase(&self.it),
            phrase(&self.them),
        )
    }

    /// Forget all four referents.
    pub fn clear(&mut self) {
        self.him = None;
        self.her = None;
        self.it = None;
        self.them = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_grammar::EnglishMorphology;

    fn noun_phrase(words: &[(Sem, &str)]) -> SemTree {
        let mut tree = SemTree::new(Sem::Root);
        let fragment = tree.add_internal(tree.root(), Sem::FragmentNoun).unwrap();
        let phrase = tree.add_internal(fragment, Sem::NounPhrase).unwrap();
        for &(tag, word) in words {
            tree.add_leaf(phrase, tag, word).unwrap();
        }
        tree
    }

    #[test]
    fn test_generic_phrase_fills_the_it_slot() {
        let mut context = DiscourseContext::default();
        context.observe(&noun_phrase(&[
            (Sem::Determiner, "the"),
            (Sem::Noun, "cat"),
        ]));

        let it = context.it().expect("referent");
        assert!(it.has_leaf_child(it.root(), &Sem::Noun, "cat"));
        // him/her fall back to it.
        assert!(context.him().is_some());
        assert!(context.her().is_some());
        assert!(context.them().is_none());
    }

    #[test]
    fn test_plural_and_named_phrases_fill_their_slots() {
        let names = NameList::from_lines(["joe"], ["alice"]);
        let mut context = DiscourseContext::new(names);

        context.observe(&noun_phrase(&[(Sem::Noun, "dogs"), (Sem::Plural, "dogs")]));
        context.observe(&noun_phrase(&[(Sem::Noun, "joe")]));
        context.observe(&noun_phrase(&[(Sem::Noun, "alice")]));

        let them = context.them().expect("plural referent");
        assert!(them.has_leaf_child(them.root(), &Sem::Noun, "dogs"));
        let him = context.him().expect("male referent");
        assert!(him.has_leaf_child(him.root(), &Sem::Noun, "joe"));
        let her = context.her().expect("female referent");
        assert!(her.has_leaf_child(her.root(), &Sem::Noun, "alice"));
        assert!(context.it().is_none());
    }

    #[test]
    fn test_last_scanned_phrase_wins() {
        let mut context = DiscourseContext::default();
        let mut tree = SemTree::new(Sem::Root);
        let first = tree.add_internal(tree.root(), Sem::NounPhrase).unwrap();
        tree.add_leaf(first, Sem::Noun, "cat").unwrap();
        let second = tree.add_internal(tree.root(), Sem::NounPhrase).unwrap();
        tree.add_leaf(second, Sem::Noun, "hat").unwrap();

        context.observe(&tree);
        let it = context.it().expect("referent");
        assert!(it.has_leaf_child(it.root(), &Sem::Noun, "hat"));
    }

    #[test]
    fn test_resolve_splices_the_referent() {
        let mut context = DiscourseContext::default();
        context.observe(&noun_phrase(&[
            (Sem::Determiner, "the"),
            (Sem::Noun, "cat"),
        ]));

        let mut query = noun_phrase(&[(Sem::Pronoun, "it")]);
        context.resolve(&mut query);

        let expected = noun_phrase(&[(Sem::Determiner, "the"), (Sem::Noun, "cat")]);
        assert!(query.matches(query.root(), &expected, expected.root(), false));
    }

    #[test]
    fn test_unresolvable_pronoun_is_left_alone() {
        let context = DiscourseContext::default();
        let mut query = noun_phrase(&[(Sem::Pronoun, "it")]);
        context.resolve(&mut query);

        let untouched = noun_phrase(&[(Sem::Pronoun, "it")]);
        assert!(query.matches(query.root(), &untouched, untouched.root(), false));
    }

    #[test]
    fn test_describe_renders_each_slot() {
        let mut context = DiscourseContext::default();
        context.observe(&noun_phrase(&[
            (Sem::Determiner, "the"),
            (Sem::Noun, "cat"),
        ]));

        let morphology = EnglishMorphology::new();
        let renderer = Renderer::new(&morphology);
        let description = context.describe(&renderer);
        assert!(description.contains("it: the cat"));
        assert!(description.contains("them: none"));
    }
}
