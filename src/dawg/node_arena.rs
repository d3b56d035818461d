//! A flat, index-addressed arena for DAWG nodes.
//!
//! Nodes refer to each other by [`NodeId`], so a node can have any number of
//! parents once sub-tries are shared. Every node counts the links pointing at
//! it; a node whose count drops to zero is released, which releases its own
//! `child` and `next` in turn, and its slot goes on a free-list for reuse.

use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use super::node::{Links, Node, NodeId, NodeRef, Siblings};

#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    /// Reusable slots from released nodes.
    free_list: Vec<NodeId>,
    live: usize,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena::default()
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Stores a node, reusing a released slot when there is one.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(slot) = self.free_list.pop() {
            self.nodes[slot.index()] = node;
            slot
        } else {
            let id = NodeId::new(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Returns the number of live nodes in this arena.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub fn siblings(&self, head: NodeId) -> Siblings<'_> {
        self.node_ref(head).siblings()
    }

    /// Records one more link to `id`.
    pub fn retain(&mut self, id: NodeId) {
        self[id].refs += 1;
    }

    /// Drops one link to `id`. Nodes left without links are released along
    /// with everything only they kept alive.
    pub fn release(&mut self, id: NodeId) {
        let mut pending: SmallVec<[NodeId; 16]> = SmallVec::new();
        pending.push(id);
        while let Some(id) = pending.pop() {
            let node = &mut self[id];
            debug_assert!(node.refs > 0, "releasing a dead node");
            node.refs -= 1;
            if node.refs == 0 {
                pending.extend(node.child);
                pending.extend(node.next);
                // Sentinel so stale handles read as an empty leaf.
                self.nodes[id.index()] = Node::new('\0');
                self.free_list.push(id);
                self.live -= 1;
            }
        }
    }

    /// True if `word` is a complete word in the sibling list at `head`.
    pub fn contains(&self, head: Option<NodeId>, word: &[char]) -> bool {
        head.is_some_and(|h| self.node_ref(h).has_word(word))
    }

    /// Inserts `word` into the sibling list starting at `head` and returns the
    /// head of the updated list, which the caller must store in place of
    /// `head`.
    ///
    /// A list that is also reachable from somewhere else is copied before it
    /// is changed, so other words sharing it are left untouched. Callers check
    /// [`contains`](NodeArena::contains) first; inserting a word that is
    /// already present copies shared lists for nothing.
    pub fn insert(&mut self, head: Option<NodeId>, word: &[char]) -> NodeId {
        let (&letter, rest) = word
            .split_first()
            .expect("cannot insert an empty word");
        let head = match head {
            Some(h) if self.is_shared_list(h) => Some(self.copy_list(h)),
            other => other,
        };
        let (head, node) = self.find_or_insert_sibling(head, letter);
        if rest.is_empty() {
            self[node].end_of_word = true;
        } else {
            let child = self[node].child;
            let child = self.insert(child, rest);
            self[node].child = Some(child);
        }
        head
    }

    fn is_shared_list(&self, head: NodeId) -> bool {
        self.siblings(head).any(|n| self[n.id()].refs > 1)
    }

    /// Replaces the caller's link to the list at `head` with a link to a
    /// private copy of it. Child lists become shared between the two copies.
    fn copy_list(&mut self, head: NodeId) -> NodeId {
        let chain: SmallVec<[NodeId; 32]> = self.siblings(head).map(|n| n.id()).collect();
        let mut next = None;
        for &id in chain.iter().rev() {
            let source = &self[id];
            let copy = Node {
                end_of_word: source.end_of_word,
                child: source.child,
                next,
                refs: 1,
                ..Node::new(source.letter)
            };
            if let Some(child) = copy.child {
                self.retain(child);
            }
            next = Some(self.alloc(copy));
        }
        self.release(head);
        next.expect("sibling lists are never empty")
    }

    /// Returns the (possibly new) list head and the node for `letter`,
    /// creating the node in sorted position if needed.
    fn find_or_insert_sibling(&mut self, head: Option<NodeId>, letter: char) -> (NodeId, NodeId) {
        let Some(head) = head else {
            let node = self.alloc(Node {
                refs: 1,
                ..Node::new(letter)
            });
            return (node, node);
        };
        if letter < self[head].letter {
            // The new node takes over the caller's link; the old head is
            // now linked from the new node instead.
            let node = self.alloc(Node {
                next: Some(head),
                refs: 1,
                ..Node::new(letter)
            });
            return (node, node);
        }
        let mut current = head;
        loop {
            if self[current].letter == letter {
                return (head, current);
            }
            match self[current].next {
                Some(next) if self[next].letter <= letter => current = next,
                next => {
                    let node = self.alloc(Node {
                        next,
                        refs: 1,
                        ..Node::new(letter)
                    });
                    self[current].next = Some(node);
                    return (head, node);
                }
            }
        }
    }

    /// Distinct nodes reachable from `root`, in pre-order.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        self.node_ref(root).each_node(|n| {
            nodes.push(n.id());
            true
        });
        nodes
    }

    /// Fills every reachable node's predecessor and successor caches.
    ///
    /// The predecessors of a node are the nodes whose child list contains it;
    /// its successors are its own child list.
    pub fn build_lists(&mut self, root: NodeId) {
        let nodes = self.reachable(root);
        for &id in &nodes {
            self[id].links = Links::default();
        }
        for &id in &nodes {
            let Some(child) = self[id].child else {
                continue;
            };
            let letter = self[id].letter;
            let successors: SmallVec<[NodeId; 4]> =
                self.siblings(child).map(|n| n.id()).collect();
            for &succ in &successors {
                let links = &mut self[succ].links;
                if !links.pre_nodes.contains(&id) {
                    links.pre_nodes.push(id);
                }
                if !links.pre_letters.contains(&letter) {
                    links.pre_letters.push(letter);
                }
            }
            let post_letters = successors.iter().map(|&s| self[s].letter).collect();
            let links = &mut self[id].links;
            links.post_nodes = successors;
            links.post_letters = post_letters;
        }
    }

    /// Number of distinct nodes reachable from `root`.
    #[cfg(test)]
    pub fn count_reachable(&self, root: Option<NodeId>) -> usize {
        root.map_or(0, |r| self.reachable(r).len())
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
