use hashbrown::HashMap;
use smallvec::SmallVec;

use super::codec;
use super::error::Result;
use super::node::{NodeId, NodeRef};
use super::node_arena::NodeArena;
use super::word::IntoWord;

/// A word trie that can be minimized into a DAWG and serialized.
///
/// Words are inserted one at a time in any order; siblings are kept sorted
/// by letter. [`generate_dawg`](Trie::generate_dawg) merges equivalent
/// sub-tries and may be called again after more words are added.
///
/// ```
/// use lexidawg::dawg::Trie;
///
/// let mut trie = Trie::build(["NIT", "NITS", "TIT", "TITS", "WIT", "WITS"]);
/// assert_eq!(trie.number_of_nodes(), 12);
/// trie.generate_dawg();
/// assert_eq!(trie.number_of_nodes(), 6);
/// assert!(trie.has_word("TITS"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Trie {
    arena: NodeArena,
    first: Option<NodeId>,
    number_of_words: usize,
}

impl Trie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Trie::default()
    }

    /// Builds a trie holding `words`. Duplicates are ignored.
    pub fn build<W: IntoWord>(words: impl IntoIterator<Item = W>) -> Self {
        let mut trie = Trie::new();
        for word in words {
            trie.add_word(word);
        }
        tracing::debug!(
            words = trie.number_of_words,
            nodes = trie.number_of_nodes(),
            "built trie"
        );
        trie
    }

    /// Adds a word, returning `false` if it was empty or already present.
    pub fn add_word(&mut self, word: impl IntoWord) -> bool {
        let word = word.collect_word();
        if word.is_empty() || self.arena.contains(self.first, &word) {
            return false;
        }
        self.first = Some(self.arena.insert(self.first, &word));
        self.number_of_words += 1;
        true
    }

    /// Merges every group of equivalent sub-tries into one shared copy.
    ///
    /// The set of words is unchanged. Running this again without adding
    /// words in between changes nothing.
    pub fn generate_dawg(&mut self) {
        let Some(first) = self.first else {
            return;
        };
        let before = self.number_of_nodes();
        let mut minimizer = Minimizer::default();
        let kept = minimizer.minimize_list(&mut self.arena, first);
        if kept != first {
            self.arena.retain(kept);
            self.arena.release(first);
            self.first = Some(kept);
        }
        tracing::debug!(before, after = self.number_of_nodes(), "generated DAWG");
    }

    /// Serializes the trie into the packed DAWG format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        codec::encode(&self.arena, self.first)
    }

    /// The first node of the top-level letter list.
    pub fn first(&self) -> Option<NodeRef<'_>> {
        self.first.map(|id| self.arena.node_ref(id))
    }

    /// Calls `visit` with every word, in alphabetical order.
    pub fn each_word<F>(&self, mut visit: F)
    where
        F: FnMut(&str),
    {
        if let Some(first) = self.first() {
            first.each_word("", |word, _| visit(word));
        }
    }

    /// True if `word` has been added.
    pub fn has_word(&self, word: impl IntoWord) -> bool {
        self.arena.contains(self.first, &word.collect_word())
    }

    /// Number of distinct words.
    pub fn number_of_words(&self) -> usize {
        self.number_of_words
    }

    /// Number of nodes in the graph.
    pub fn number_of_nodes(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn into_parts(self) -> (NodeArena, Option<NodeId>) {
        (self.arena, self.first)
    }
}

/// Interned structural key of a node: letter, end-of-word, and the classes
/// of its child and next.
type Signature = (char, bool, Option<u32>, Option<u32>);

/// Bottom-up sub-trie merging.
///
/// Two nodes get the same class id exactly when
/// [`same_subtrie`](NodeRef::same_subtrie) holds for them, so each list head
/// is compared in one hash lookup instead of a deep walk.
#[derive(Default)]
struct Minimizer {
    classes: HashMap<Signature, u32>,
    class_of: HashMap<NodeId, u32>,
    /// First list head seen for each class.
    representatives: HashMap<u32, NodeId>,
}

impl Minimizer {
    /// Minimizes the list at `head` and everything below it, then returns the
    /// head that should be linked in its place.
    fn minimize_list(&mut self, arena: &mut NodeArena, head: NodeId) -> NodeId {
        if let Some(class) = self.class_of.get(&head) {
            return self.representatives[class];
        }

        let list: SmallVec<[NodeId; 16]> = arena.siblings(head).map(|n| n.id()).collect();
        for &id in &list {
            let Some(child) = arena[id].child else {
                continue;
            };
            let kept = self.minimize_list(arena, child);
            if kept != child {
                arena.retain(kept);
                arena[id].child = Some(kept);
                arena.release(child);
            }
        }

        let mut next_class = None;
        for &id in list.iter().rev() {
            let node = &arena[id];
            let signature = (
                node.letter,
                node.end_of_word,
                node.child.map(|c| self.class_of[&c]),
                next_class,
            );
            let fresh = self.classes.len() as u32;
            let class = *self.classes.entry(signature).or_insert(fresh);
            self.class_of.insert(id, class);
            next_class = Some(class);
        }

        let class = self.class_of[&head];
        *self.representatives.entry(class).or_insert(head)
    }
}
