//! Statement storage and structural recall.
//!
//! Statements are kept in insertion order, never deduplicated, never
//! evicted. A recall query is scored against every stored statement by a
//! recursive structural similarity: matching leaf words plus greedily
//! claimed subtree scores, normalized by the larger child counts. Answer
//! slots (the places a question's missing information would go) are
//! excluded from leaf matching, so a question scores well against the
//! statement that fills its blanks.

use parley_grammar::{Category, NodeId, SemTree};
use tracing::debug;

/// Insertion-ordered store of semantic trees with similarity recall.
#[derive(Debug, Clone, Default)]
pub struct RecallStore {
    statements: Vec<SemTree>,
}

impl RecallStore {
    pub fn new() -> Self {
        RecallStore::default()
    }

    /// Append a statement. No deduplication, no limit.
    pub fn store(&mut self, statement: SemTree) {
        self.statements.push(statement);
    }

    /// The stored statement most similar to the query, or `None` when the
    /// store is empty or every score is zero. Ties between equal non-zero
    /// scores go to the statement stored later.
    pub fn recall(&self, query: &SemTree) -> Option<&SemTree> {
        let mut highest = 0.0_f32;
        let mut best = None;
        for statement in &self.statements {
            let score = similarity(query, statement);
            debug!(score, "scored a stored statement");
            if score >= highest && score != 0.0 {
                highest = score;
                best = Some(statement);
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[SemTree] {
        &self.statements
    }

    pub fn clear(&mut self) {
        self.statements.clear();
    }
}

/// Structural similarity between two trees, in `0.0..=1.0`.
pub fn similarity(query: &SemTree, candidate: &SemTree) -> f32 {
    score(query, query.root(), candidate, candidate.root())
}

fn score(query: &SemTree, q: NodeId, candidate: &SemTree, c: NodeId) -> f32 {
    // Marker leaves count; answer slots do not.
    let mut q_words = Vec::new();
    let mut q_trees = Vec::new();
    for &child in query.children(q) {
        if query.is_leaf(child) {
            if !query.tag(child).is(Category::Answer) {
                q_words.push(query.text(child).unwrap_or(""));
            }
        } else {
            q_trees.push(child);
        }
    }

    let mut c_words = Vec::new();
    let mut c_trees = Vec::new();
    for &child in candidate.children(c) {
        if candidate.is_leaf(child) {
            if !candidate.tag(child).is(Category::Answer) {
                c_words.push(candidate.text(child).unwrap_or(""));
            }
        } else {
            c_trees.push(child);
        }
    }

    let total = q_words.len().max(c_words.len()) + q_trees.len().max(c_trees.len());
    if total == 0 {
        return 0.0;
    }

    // Each candidate leaf satisfies at most one query leaf.
    let mut matched = 0.0_f32;
    for word in &q_words {
        if let Some(position) = c_words.iter().position(|candidate| candidate == word) {
            matched += 1.0;
            c_words.remove(position);
        }
    }

    // Greedy subtree claims: every query child takes the best remaining
    // candidate child, earlier candidates winning ties. No backtracking.
    for &q_tree in &q_trees {
        let mut best = 0.0_f32;
        let mut claimed = None;
        for (index, &c_tree) in c_trees.iter().enumerate() {
            let subtree = score(query, q_tree, candidate, c_tree);
            if subtree > best {
                best = subtree;
                claimed = Some(index);
            }
        }
        if let Some(index) = claimed {
            matched += best;
            c_trees.remove(index);
        }
    }

    matched / total as f32
}
