//! The packed binary DAWG format.
//!
//! A DAWG is a sequence of big-endian `u32` words: the node count, then two
//! words per node, its letter (a Unicode code point) and a descriptor:
//!
//! ```text
//!  31                              2   1   0
//! +----------------------------------+---+---+
//! |           child index            |EOL|EOW|
//! +----------------------------------+---+---+
//! ```
//!
//! Siblings are stored contiguously, so the next sibling of node `i` is node
//! `i + 1` unless the end-of-list bit is set. A child index of 0 means "no
//! child"; node 0 is the first top-level letter and is never a child.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use itertools::{Itertools, Position};

use super::error::{DawgError, Result};
use super::node::{Node, NodeId};
use super::node_arena::NodeArena;

/// Set in a descriptor when the node ends a word.
pub const END_OF_WORD_BIT_MASK: u32 = 0x1;
/// Set in a descriptor when the node is the last of its siblings.
pub const END_OF_LIST_BIT_MASK: u32 = 0x2;
/// Position of the child index within a descriptor.
pub const CHILD_INDEX_SHIFT: u32 = 2;
/// Number of nodes the child index field can address.
pub const MAX_NODES: usize = 1 << (u32::BITS - CHILD_INDEX_SHIFT);

/// Where a node's next sibling lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sibling {
    /// The next sibling is the following node.
    Following,
    /// The node is the last of its list.
    Last,
}

/// Unpacked form of a node descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Index of the first child, if any.
    pub child: Option<u32>,
    /// True if the node ends a word.
    pub end_of_word: bool,
    /// Whether a sibling follows.
    pub sibling: Sibling,
}

impl Descriptor {
    /// Packs the descriptor into its wire representation.
    pub fn pack(self) -> u32 {
        let mut bits = self.child.unwrap_or(0) << CHILD_INDEX_SHIFT;
        if self.end_of_word {
            bits |= END_OF_WORD_BIT_MASK;
        }
        if self.sibling == Sibling::Last {
            bits |= END_OF_LIST_BIT_MASK;
        }
        bits
    }

    /// Unpacks a wire descriptor.
    pub fn unpack(bits: u32) -> Self {
        let child = bits >> CHILD_INDEX_SHIFT;
        Descriptor {
            child: (child > 0).then_some(child),
            end_of_word: bits & END_OF_WORD_BIT_MASK != 0,
            sibling: if bits & END_OF_LIST_BIT_MASK != 0 {
                Sibling::Last
            } else {
                Sibling::Following
            },
        }
    }

    /// Index of the next sibling of the node stored at `index`.
    pub fn next_index(self, index: u32) -> Option<u32> {
        match self.sibling {
            Sibling::Following => Some(index + 1),
            Sibling::Last => None,
        }
    }
}

/// Orders the nodes reachable from `root` so that every sibling list is
/// contiguous and `root` comes first.
fn lay_out(arena: &NodeArena, root: NodeId) -> Vec<NodeId> {
    let mut previous = HashMap::new();
    for id in arena.reachable(root) {
        if let Some(next) = arena[id].next {
            previous.insert(next, id);
        }
    }

    let mut order = Vec::new();
    let mut placed = HashSet::new();
    let mut pending = VecDeque::from([root]);
    while let Some(id) = pending.pop_front() {
        let mut start = id;
        while let Some(&prev) = previous.get(&start) {
            start = prev;
        }
        if !placed.insert(start) {
            continue;
        }
        for node in arena.siblings(start) {
            order.push(node.id());
            pending.extend(arena[node.id()].child);
        }
    }
    order
}

/// Serializes the graph below `root`.
pub(crate) fn encode(arena: &NodeArena, root: Option<NodeId>) -> Result<Vec<u8>> {
    let order = root.map_or_else(Vec::new, |r| lay_out(arena, r));
    if order.len() >= MAX_NODES {
        return Err(DawgError::TooManyNodes(order.len()));
    }
    let index: HashMap<NodeId, u32> = order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i as u32))
        .collect();

    let mut out = Vec::with_capacity(4 + 8 * order.len());
    out.extend_from_slice(&(order.len() as u32).to_be_bytes());
    for (position, &id) in order.iter().with_position() {
        let node = &arena[id];
        debug_assert!(
            node.next.map_or(true, |next| index[&next] == index[&id] + 1),
            "siblings must be contiguous"
        );
        debug_assert!(node.child != root, "the first node cannot be a child");
        let descriptor = Descriptor {
            child: node.child.map(|c| index[&c]),
            end_of_word: node.end_of_word,
            sibling: match (position, node.next) {
                (Position::Last | Position::Only, _) | (_, None) => Sibling::Last,
                _ => Sibling::Following,
            },
        };
        out.extend_from_slice(&u32::from(node.letter).to_be_bytes());
        out.extend_from_slice(&descriptor.pack().to_be_bytes());
    }
    tracing::debug!(nodes = order.len(), bytes = out.len(), "encoded DAWG");
    Ok(out)
}

struct Record {
    letter: char,
    descriptor: Descriptor,
}

/// Deserializes a DAWG, returning the arena and the first top-level node.
///
/// Every node is materialized first; child and sibling indices are resolved
/// into links in a second pass, since children usually come later in the
/// buffer than their parents.
pub(crate) fn decode(data: &[u8]) -> Result<(NodeArena, Option<NodeId>)> {
    if data.len() < 4 || data.len() % 4 != 0 {
        return Err(DawgError::corrupt(format!(
            "{} bytes is not a whole number of words",
            data.len()
        )));
    }
    let mut words = data
        .chunks_exact(4)
        .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]));
    let count = words.next().unwrap_or(0) as usize;
    let expected = count
        .checked_mul(8)
        .and_then(|n| n.checked_add(4))
        .ok_or_else(|| DawgError::corrupt(format!("node count {count} is too large")))?;
    if data.len() != expected {
        return Err(DawgError::corrupt(format!(
            "{count} nodes need {expected} bytes, got {}",
            data.len()
        )));
    }

    let records = words
        .tuples()
        .enumerate()
        .map(|(i, (letter, bits))| {
            let letter = char::from_u32(letter).ok_or_else(|| {
                DawgError::corrupt(format!("node {i} has invalid letter {letter:#x}"))
            })?;
            Ok(Record {
                letter,
                descriptor: Descriptor::unpack(bits),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut arena = NodeArena::with_capacity(count);
    for record in &records {
        arena.alloc(Node {
            end_of_word: record.descriptor.end_of_word,
            ..Node::new(record.letter)
        });
    }
    for (i, record) in records.iter().enumerate() {
        let id = NodeId::new(i);
        let next = record.descriptor.next_index(i as u32);
        if next.is_some_and(|n| n as usize >= count) {
            return Err(DawgError::corrupt(format!(
                "last node {i} claims a following sibling"
            )));
        }
        if let Some(child) = record.descriptor.child.filter(|&c| c as usize >= count) {
            return Err(DawgError::corrupt(format!(
                "node {i} has child {child} out of {count}"
            )));
        }
        let next = next.map(|n| NodeId::new(n as usize));
        let child = record.descriptor.child.map(|c| NodeId::new(c as usize));
        arena[id].next = next;
        arena[id].child = child;
        for target in next.into_iter().chain(child) {
            arena.retain(target);
        }
    }

    let root = (count > 0).then(|| NodeId::new(0));
    if let Some(root) = root {
        ensure_acyclic(&arena, root, count)?;
        arena.retain(root);
    }
    tracing::debug!(nodes = count, "decoded DAWG");
    Ok((arena, root))
}

/// Rejects graphs where a child link leads back to an ancestor, which would
/// make every traversal loop forever.
fn ensure_acyclic(arena: &NodeArena, root: NodeId, count: usize) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }
    let mut marks = vec![Mark::New; count];
    // (node, whether its successors have been pushed)
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            marks[id.index()] = Mark::Done;
            continue;
        }
        match marks[id.index()] {
            Mark::Done => continue,
            Mark::Active => {
                return Err(DawgError::corrupt(format!("cycle through node {}", id.index())))
            }
            Mark::New => {}
        }
        marks[id.index()] = Mark::Active;
        stack.push((id, true));
        for succ in arena[id].next.into_iter().chain(arena[id].child) {
            match marks[succ.index()] {
                Mark::Active => {
                    return Err(DawgError::corrupt(format!(
                        "cycle through node {}",
                        succ.index()
                    )))
                }
                Mark::New => stack.push((succ, false)),
                Mark::Done => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn words_of(arena: &NodeArena, root: Option<NodeId>) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(root) = root {
            arena.node_ref(root).each_word("", |w, _| out.push(w.to_string()));
        }
        out
    }

    fn build(words: &[&str]) -> (NodeArena, Option<NodeId>) {
        let mut arena = NodeArena::new();
        let mut head = None;
        for word in words {
            let chars: Vec<char> = word.chars().collect();
            if !arena.contains(head, &chars) {
                head = Some(arena.insert(head, &chars));
            }
        }
        (arena, head)
    }

    fn raw(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn decode_descriptor_with_following_sibling() {
        let d = Descriptor::unpack((66 << CHILD_INDEX_SHIFT) | END_OF_WORD_BIT_MASK);
        assert!(d.end_of_word);
        assert_eq!(d.child, Some(66));
        assert_eq!(d.next_index(99), Some(100));
    }

    #[test]
    fn decode_descriptor_at_end_of_list() {
        let d = Descriptor::unpack((666 << CHILD_INDEX_SHIFT) | END_OF_LIST_BIT_MASK);
        assert!(!d.end_of_word);
        assert_eq!(d.child, Some(666));
        assert_eq!(d.next_index(99), None);
    }

    #[test]
    fn descriptor_pack_is_inverse_of_unpack() {
        let d = Descriptor {
            child: Some(12345),
            end_of_word: true,
            sibling: Sibling::Last,
        };
        assert_eq!(d.pack(), (12345 << 2) | 0x3);
        assert_eq!(Descriptor::unpack(d.pack()), d);
    }

    #[test]
    fn encodes_exact_bytes() {
        let (arena, root) = build(&["AB", "B"]);
        let bytes = encode(&arena, root).unwrap();
        // A(child 2) B(eow, last) | B(eow, last)
        let expected = raw(&[
            3,
            'A' as u32,
            2 << CHILD_INDEX_SHIFT,
            'B' as u32,
            END_OF_WORD_BIT_MASK | END_OF_LIST_BIT_MASK,
            'B' as u32,
            END_OF_WORD_BIT_MASK | END_OF_LIST_BIT_MASK,
        ]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn round_trips_words() {
        let words = ["ÅSNA", "ALFA", "BRAVO", "授人以鱼", "授人以渔"];
        let (arena, root) = build(&words);
        let bytes = encode(&arena, root).unwrap();
        assert_eq!(bytes.len(), 4 + 8 * arena.len());
        let (decoded, droot) = decode(&bytes).unwrap();
        assert_eq!(words_of(&decoded, droot), words_of(&arena, root));
        assert_eq!(decoded.len(), arena.len());
    }

    #[test]
    fn empty_graph() {
        let bytes = encode(&NodeArena::new(), None).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0]);
        let (arena, root) = decode(&bytes).unwrap();
        assert!(root.is_none());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(matches!(decode(&[]), Err(DawgError::CorruptData(_))));
        assert!(matches!(decode(&[0, 0, 0]), Err(DawgError::CorruptData(_))));
        let (arena, root) = build(&["CAT"]);
        let mut bytes = encode(&arena, root).unwrap();
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(decode(&bytes), Err(DawgError::CorruptData(_))));
        assert!(matches!(
            decode(&raw(&[u32::MAX])),
            Err(DawgError::CorruptData(_))
        ));
    }

    #[test]
    fn rejects_bad_records() {
        // Child index past the end.
        let bytes = raw(&[1, 'A' as u32, (5 << CHILD_INDEX_SHIFT) | END_OF_LIST_BIT_MASK]);
        assert!(matches!(decode(&bytes), Err(DawgError::CorruptData(_))));
        // Last node without the end-of-list bit.
        let bytes = raw(&[1, 'A' as u32, END_OF_WORD_BIT_MASK]);
        assert!(matches!(decode(&bytes), Err(DawgError::CorruptData(_))));
        // Surrogate code point.
        let bytes = raw(&[1, 0xD800, END_OF_LIST_BIT_MASK]);
        assert!(matches!(decode(&bytes), Err(DawgError::CorruptData(_))));
        // A child pointing back at its parent.
        let bytes = raw(&[
            2,
            'A' as u32,
            (1 << CHILD_INDEX_SHIFT) | END_OF_LIST_BIT_MASK,
            'B' as u32,
            (1 << CHILD_INDEX_SHIFT) | END_OF_LIST_BIT_MASK,
        ]);
        assert!(matches!(decode(&bytes), Err(DawgError::CorruptData(_))));
    }
}
