//! The tagged tree — the one representation shared by every component.
//!
//! A [`Tree`] is an arena of nodes addressed by stable [`NodeId`] indices.
//! Each node carries a tag, an optional leaf word, a parent index and an
//! ordered list of child indices. Attach and detach are index updates, so a
//! node can never end up with two parents and a dangling reference cannot
//! exist. Attaching a node underneath one of its own descendants is rejected
//! rather than silently building a cycle.
//!
//! Detached subtrees stay allocated in the arena for the lifetime of the
//! tree; the arena never frees individual nodes. Trees are short-lived (one
//! per utterance), so the garbage is bounded and harmless.

use std::fmt;

use crate::error::TreeError;

/// A stable index into a [`Tree`]'s arena.
///
/// Ids are only meaningful for the tree that issued them; using an id from
/// another tree is a logic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    tag: T,
    /// `Some` for leaves, `None` for internal nodes.
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A generic ordered tree with parent back-references, tagged with `T`.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
}

impl<T> Tree<T> {
    /// Create a tree whose root is an internal node with the given tag.
    pub fn new(tag: T) -> Self {
        Tree {
            nodes: vec![Node {
                tag,
                text: None,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Create a tree whose root is a single leaf.
    pub fn leaf(tag: T, text: impl Into<String>) -> Self {
        Tree {
            nodes: vec![Node {
                tag,
                text: Some(text.into()),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Allocate a detached internal node.
    pub fn push_internal(&mut self, tag: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag,
            text: None,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached leaf node.
    pub fn push_leaf(&mut self, tag: T, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag,
            text: Some(text.into()),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate an internal node and attach it under `parent`.
    pub fn add_internal(&mut self, parent: NodeId, tag: T) -> Result<NodeId, TreeError> {
        if self.is_leaf(parent) {
            return Err(TreeError::LeafParent);
        }
        let id = self.push_internal(tag);
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
        Ok(id)
    }

    /// Allocate a leaf node and attach it under `parent`.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        tag: T,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        if self.is_leaf(parent) {
            return Err(TreeError::LeafParent);
        }
        let id = self.push_leaf(tag, text);
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
        Ok(id)
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Rejects the edit if `parent` is a leaf, or if `child` is `parent`
    /// itself or an ancestor of `parent` (which would create a cycle).
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.is_leaf(parent) {
            return Err(TreeError::LeafParent);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle);
        }
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from its parent's child list, if it has one. The node
    /// stays allocated and can be re-attached later.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node(child).parent {
            self.node_mut(parent).children.retain(|c| *c != child);
            self.node_mut(child).parent = None;
        }
    }

    /// True if `ancestor` is on the parent chain of `node` (or is `node`).
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node(id).parent;
        }
        false
    }

    /// Replace `node` in its parent with a fresh internal `tag` node that
    /// adopts `node` as its sole child. If `node` is the root, the wrapper
    /// becomes the new root. Returns the wrapper's id.
    pub fn insert_above(&mut self, node: NodeId, tag: T) -> NodeId {
        let wrapper = self.push_internal(tag);
        match self.node(node).parent {
            Some(parent) => {
                // Take the wrapped node's position rather than appending.
                let slot = self.node(parent).children.iter().position(|c| *c == node);
                match slot {
                    Some(slot) => self.node_mut(parent).children[slot] = wrapper,
                    None => self.node_mut(parent).children.push(wrapper),
                }
                self.node_mut(wrapper).parent = Some(parent);
            }
            None => self.root = wrapper,
        }
        self.node_mut(node).parent = Some(wrapper);
        self.node_mut(wrapper).children.push(node);
        wrapper
    }

    pub fn tag(&self, id: NodeId) -> &T {
        &self.node(id).tag
    }

    /// The leaf word, or `None` for internal nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).text.is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    /// All leaves underneath `id` in document order (including `id` itself
    /// when it is a leaf).
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_leaf(id) {
            out.push(id);
        } else {
            for child in &self.node(id).children {
                self.collect_leaves(*child, out);
            }
        }
    }

    /// The leaf words underneath `id`, joined by single spaces.
    pub fn words(&self, id: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.leaves(id) {
            let word = self.node(leaf).text.as_deref().unwrap_or("");
            if word.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }
}

impl<T: PartialEq> Tree<T> {
    /// First direct child of `id` with the given tag.
    pub fn first_child(&self, id: NodeId, tag: &T) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).tag == *tag)
    }

    pub fn has_child(&self, id: NodeId, tag: &T) -> bool {
        self.first_child(id, tag).is_some()
    }

    /// All direct children of `id` with the given tag, in order.
    pub fn children_with(&self, id: NodeId, tag: &T) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|c| self.node(*c).tag == *tag)
            .collect()
    }

    /// Index of the first direct child with the given tag.
    pub fn child_index(&self, id: NodeId, tag: &T) -> Option<usize> {
        self.node(id)
            .children
            .iter()
            .position(|c| self.node(*c).tag == *tag)
    }

    /// First direct child that is a leaf with the given tag and exact word.
    pub fn first_leaf_child(&self, id: NodeId, tag: &T, word: &str) -> Option<NodeId> {
        self.node(id).children.iter().copied().find(|c| {
            let node = self.node(*c);
            node.tag == *tag && node.text.as_deref() == Some(word)
        })
    }

    pub fn has_leaf_child(&self, id: NodeId, tag: &T, word: &str) -> bool {
        self.first_leaf_child(id, tag, word).is_some()
    }

    /// Structural match against a subtree of another (or the same) tree.
    ///
    /// Children may appear in any order: a child here matches if *some*
    /// child there matches it, recursively. With `ignore_extra`, surplus
    /// children in the other subtree are ignored; otherwise child counts
    /// must agree at every level.
    pub fn matches(
        &self,
        id: NodeId,
        other: &Tree<T>,
        other_id: NodeId,
        ignore_extra: bool,
    ) -> bool {
        let a = self.node(id);
        let b = other.node(other_id);
        if a.tag != b.tag {
            return false;
        }
        match (&a.text, &b.text) {
            (Some(word_a), Some(word_b)) => word_a == word_b,
            (None, None) => {
                if !ignore_extra && a.children.len() != b.children.len() {
                    return false;
                }
                a.children.iter().all(|child| {
                    b.children
                        .iter()
                        .any(|cand| self.matches(*child, other, *cand, ignore_extra))
                })
            }
            _ => false,
        }
    }
}

impl<T: Clone> Tree<T> {
    /// Deep-copy the subtree at `id` into a standalone tree.
    pub fn extract(&self, id: NodeId) -> Tree<T> {
        let node = self.node(id);
        let mut out = match &node.text {
            Some(word) => Tree::leaf(node.tag.clone(), word.clone()),
            None => Tree::new(node.tag.clone()),
        };
        let root = out.root;
        for child in &node.children {
            self.copy_into(*child, &mut out, root);
        }
        out
    }

    /// Deep-copy a subtree of `other` underneath `parent` in this tree.
    /// Returns the id of the copied subtree's root.
    pub fn graft(
        &mut self,
        parent: NodeId,
        other: &Tree<T>,
        other_id: NodeId,
    ) -> Result<NodeId, TreeError> {
        if self.is_leaf(parent) {
            return Err(TreeError::LeafParent);
        }
        Ok(other.copy_into(other_id, self, parent))
    }

    fn copy_into(&self, id: NodeId, dest: &mut Tree<T>, dest_parent: NodeId) -> NodeId {
        let node = self.node(id);
        let copy = match &node.text {
            Some(word) => dest.push_leaf(node.tag.clone(), word.clone()),
            None => dest.push_internal(node.tag.clone()),
        };
        dest.node_mut(dest_parent).children.push(copy);
        dest.node_mut(copy).parent = Some(dest_parent);
        for child in &node.children {
            self.copy_into(*child, dest, copy);
        }
        copy
    }
}

impl<T: fmt::Display> Tree<T> {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let node = self.node(id);
        write!(f, "{:indent$}({}", "", node.tag, indent = indent)?;
        if let Some(word) = &node.text {
            write!(f, " {word}")?;
        } else {
            for child in &node.children {
                writeln!(f)?;
                self.fmt_node(f, *child, indent + 2)?;
            }
        }
        write!(f, ")")
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (Tree<&'static str>, NodeId, NodeId) {
        let mut tree = Tree::new("root");
        let phrase = tree.add_internal(tree.root(), "phrase").unwrap();
        let leaf = tree.add_leaf(phrase, "word", "cat").unwrap();
        (tree, phrase, leaf)
    }

    #[test]
    fn test_parenthood_is_consistent() {
        let (tree, phrase, leaf) = sample();
        assert_eq!(tree.parent(phrase), Some(tree.root()));
        assert_eq!(tree.parent(leaf), Some(phrase));
        assert_eq!(tree.children(phrase), &[leaf]);
        assert_eq!(tree.children(tree.root()), &[phrase]);
    }

    #[test]
    fn test_attach_reparents() {
        let (mut tree, phrase, leaf) = sample();
        let other = tree.add_internal(tree.root(), "phrase").unwrap();
        tree.attach(other, leaf).unwrap();
        assert_eq!(tree.parent(leaf), Some(other));
        assert_eq!(tree.child_count(phrase), 0);
        assert_eq!(tree.children(other), &[leaf]);
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let (mut tree, phrase, _) = sample();
        let inner = tree.add_internal(phrase, "phrase").unwrap();
        assert_eq!(tree.attach(inner, phrase), Err(TreeError::Cycle));
        assert_eq!(tree.attach(inner, inner), Err(TreeError::Cycle));
        // Parenthood untouched by the rejected edits.
        assert_eq!(tree.parent(inner), Some(phrase));
        assert_eq!(tree.parent(phrase), Some(tree.root()));
    }

    #[test]
    fn test_attach_rejects_leaf_parent() {
        let (mut tree, _, leaf) = sample();
        let stray = tree.push_leaf("word", "dog");
        assert_eq!(tree.attach(leaf, stray), Err(TreeError::LeafParent));
    }

    #[test]
    fn test_detach_clears_parent() {
        let (mut tree, phrase, leaf) = sample();
        tree.detach(leaf);
        assert_eq!(tree.parent(leaf), None);
        assert_eq!(tree.child_count(phrase), 0);
        // Detaching twice is a no-op.
        tree.detach(leaf);
        assert_eq!(tree.parent(leaf), None);
    }

    #[test]
    fn test_insert_above_replaces_in_place() {
        let mut tree = Tree::new("root");
        let a = tree.add_internal(tree.root(), "a").unwrap();
        let b = tree.add_internal(tree.root(), "b").unwrap();
        let wrapper = tree.insert_above(a, "wrap");
        assert_eq!(tree.children(tree.root()), &[wrapper, b]);
        assert_eq!(tree.children(wrapper), &[a]);
        assert_eq!(tree.parent(a), Some(wrapper));
    }

    #[test]
    fn test_insert_above_root() {
        let mut tree = Tree::new("root");
        let wrapper = tree.insert_above(tree.root(), "wrap");
        assert_eq!(tree.root(), wrapper);
        assert_eq!(tree.parent(wrapper), None);
    }

    #[test]
    fn test_leaf_searches() {
        let mut tree = Tree::new("np");
        tree.add_leaf(tree.root(), "det", "the").unwrap();
        let noun = tree.add_leaf(tree.root(), "noun", "cat").unwrap();
        assert_eq!(tree.first_leaf_child(tree.root(), &"noun", "cat"), Some(noun));
        assert_eq!(tree.first_leaf_child(tree.root(), &"noun", "dog"), None);
        assert_eq!(tree.child_index(tree.root(), &"noun"), Some(1));
    }

    #[test]
    fn test_words_joins_leaves_in_order() {
        let mut tree = Tree::new("s");
        let np = tree.add_internal(tree.root(), "np").unwrap();
        tree.add_leaf(np, "det", "the").unwrap();
        tree.add_leaf(np, "noun", "cat").unwrap();
        tree.add_leaf(tree.root(), "verb", "sat").unwrap();
        assert_eq!(tree.words(tree.root()), "the cat sat");
    }

    #[test]
    fn test_extract_and_graft_deep_copy() {
        let (tree, phrase, _) = sample();
        let copy = tree.extract(phrase);
        assert!(copy.matches(copy.root(), &tree, phrase, false));

        let mut dest = Tree::new("root");
        let grafted = dest.graft(dest.root(), &tree, phrase).unwrap();
        assert!(dest.matches(grafted, &tree, phrase, false));
        // The copy is independent of the source.
        assert_eq!(dest.parent(grafted), Some(dest.root()));
    }

    #[test]
    fn test_unordered_match() {
        let mut a = Tree::new("np");
        a.add_leaf(a.root(), "det", "the").unwrap();
        a.add_leaf(a.root(), "noun", "cat").unwrap();

        let mut b = Tree::new("np");
        b.add_leaf(b.root(), "noun", "cat").unwrap();
        b.add_leaf(b.root(), "det", "the").unwrap();
        assert!(a.matches(a.root(), &b, b.root(), false));

        b.add_leaf(b.root(), "adj", "striped").unwrap();
        assert!(!a.matches(a.root(), &b, b.root(), false));
        assert!(a.matches(a.root(), &b, b.root(), true));
    }
}
