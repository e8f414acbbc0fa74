//! One conversation's discourse state.
//!
//! A session owns its own referent slots and statement store; independent
//! conversations own independent sessions, nothing is shared process-wide.
//! Incoming trees are resolved against the discourse context before they
//! are remembered or matched, so "I like it" is stored with "it" already
//! replaced by whatever it referred to.

use parley_grammar::SemTree;

use crate::context::DiscourseContext;
use crate::names::NameList;
use crate::recall::RecallStore;

/// Discourse context plus statement recall for a single conversation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    context: DiscourseContext,
    recall: RecallStore,
}

impl Session {
    pub fn new(names: NameList) -> Self {
        Session {
            context: DiscourseContext::new(names),
            recall: RecallStore::new(),
        }
    }

    /// Take in a statement: resolve its pronouns, update the referent
    /// slots from it, and remember it.
    pub fn observe_statement(&mut self, mut statement: SemTree) {
        self.context.resolve(&mut statement);
        self.context.observe(&statement);
        self.recall.store(statement);
    }

    /// Answer a question tree: resolve its pronouns, then recall the
    /// best-matching stored statement, if any.
    pub fn answer(&mut self, mut question: SemTree) -> Option<&SemTree> {
        self.context.resolve(&mut question);
        self.recall.recall(&question)
    }

    pub fn context(&self) -> &DiscourseContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DiscourseContext {
        &mut self.context
    }

    pub fn recall(&self) -> &RecallStore {
        &self.recall
    }

    /// Forget everything: referent slots and stored statements.
    pub fn reset(&mut self) {
        self.context.clear();
        self.recall.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_grammar::schema::SemanticTag as Sem;
    use pretty_assertions::assert_eq;

    fn statement(subject: &str, object: &str) -> SemTree {
        let mut tree = SemTree::new(Sem::Root);
        let statement = tree.add_internal(tree.root(), Sem::Statement).unwrap();
        let subject_slot = tree.add_internal(statement, Sem::Subject).unwrap();
        let subject_np = tree.add_internal(subject_slot, Sem::NounPhrase).unwrap();
        tree.add_leaf(subject_np, Sem::Noun, subject).unwrap();
        let action = tree.add_internal(statement, Sem::Action).unwrap();
        let verb_phrase = tree.add_internal(action, Sem::VerbPhrase).unwrap();
        tree.add_leaf(verb_phrase, Sem::Verb, "be").unwrap();
        let object_slot = tree.add_internal(verb_phrase, Sem::Object).unwrap();
        let object_np = tree.add_internal(object_slot, Sem::NounPhrase).unwrap();
        tree.add_leaf(object_np, Sem::Noun, object).unwrap();
        tree
    }

    fn pronoun_statement(pronoun: &str, object: &str) -> SemTree {
        let mut tree = SemTree::new(Sem::Root);
        let statement = tree.add_internal(tree.root(), Sem::Statement).unwrap();
        let subject_slot = tree.add_internal(statement, Sem::Subject).unwrap();
        let subject_np = tree.add_internal(subject_slot, Sem::NounPhrase).unwrap();
        tree.add_leaf(subject_np, Sem::Pronoun, pronoun).unwrap();
        let action = tree.add_internal(statement, Sem::Action).unwrap();
        let verb_phrase = tree.add_internal(action, Sem::VerbPhrase).unwrap();
        tree.add_leaf(verb_phrase, Sem::Verb, "be").unwrap();
        let object_slot = tree.add_internal(verb_phrase, Sem::Object).unwrap();
        let object_np = tree.add_internal(object_slot, Sem::NounPhrase).unwrap();
        tree.add_leaf(object_np, Sem::Noun, object).unwrap();
        tree
    }

    #[test]
    fn test_statements_resolve_against_earlier_referents() {
        let mut session = Session::default();
        // "the cat is black" then "it is fast".
        session.observe_statement(statement("cat", "black"));
        session.observe_statement(pronoun_statement("it", "fast"));

        let stored = session.recall().statements();
        assert_eq!(stored.len(), 2);
        // The pronoun was replaced by the cat before storage.
        let resolved = &stored[1];
        let expected = statement("cat", "fast");
        assert!(resolved.matches(resolved.root(), &expected, expected.root(), false));
    }

    #[test]
    fn test_answer_finds_the_stored_statement() {
        let mut session = Session::default();
        session.observe_statement(statement("dog", "brown"));
        session.observe_statement(statement("cat", "black"));

        // "what is the cat": answer slot in the object.
        let mut question = SemTree::new(Sem::Root);
        let root_statement = question.add_internal(question.root(), Sem::Statement).unwrap();
        let subject_slot = question.add_internal(root_statement, Sem::Subject).unwrap();
        let subject_np = question.add_internal(subject_slot, Sem::NounPhrase).unwrap();
        question.add_leaf(subject_np, Sem::Noun, "cat").unwrap();
        let action = question.add_internal(root_statement, Sem::Action).unwrap();
        let verb_phrase = question.add_internal(action, Sem::VerbPhrase).unwrap();
        question.add_leaf(verb_phrase, Sem::Verb, "be").unwrap();
        let object_slot = question.add_internal(verb_phrase, Sem::Object).unwrap();
        let object_np = question.add_internal(object_slot, Sem::NounPhrase).unwrap();
        question
            .add_leaf(object_np, Sem::QuestionPronoun, "what")
            .unwrap();

        let best = session.answer(question).expect("a match");
        let expected = statement("cat", "black");
        assert!(best.matches(best.root(), &expected, expected.root(), false));
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut session = Session::default();
        session.observe_statement(statement("cat", "black"));
        session.reset();
        assert!(session.recall().is_empty());
        assert!(session.context().it().is_none());
    }
}
