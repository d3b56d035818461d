use std::collections::BTreeMap;
use std::fmt;
use std::iter::FusedIterator;

use hashbrown::HashSet;
use smallvec::SmallVec;

use super::node_arena::NodeArena;

/// The letter that matches any other letter in anagram and hangman queries.
pub const WILDCARD: char = ' ';

/// Stable handle of a node inside the arena that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("arena index exceeds u32"))
    }

    /// Position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Predecessor and successor caches filled by
/// [`NodeArena::build_lists`](super::node_arena::NodeArena::build_lists).
#[derive(Clone, Debug, Default)]
pub(crate) struct Links {
    pub(crate) pre_nodes: SmallVec<[NodeId; 2]>,
    pub(crate) pre_letters: SmallVec<[char; 2]>,
    pub(crate) post_nodes: SmallVec<[NodeId; 4]>,
    pub(crate) post_letters: SmallVec<[char; 4]>,
}

/// One letter at one position of some word(s).
///
/// `next` is the following alternative at the same position (siblings are
/// sorted by letter), `child` the first letter of the continuations. `refs`
/// counts the links (parent `child`, sibling `next` or an owner's root slot)
/// pointing at this node.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) letter: char,
    pub(crate) end_of_word: bool,
    pub(crate) next: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) refs: u32,
    pub(crate) links: Links,
}

impl Node {
    pub(crate) fn new(letter: char) -> Self {
        Node {
            letter,
            end_of_word: false,
            next: None,
            child: None,
            refs: 0,
            links: Links::default(),
        }
    }
}

/// A borrowed view of a node in a trie or dictionary.
///
/// A `NodeRef` is also the head of the sibling list it starts: lookups such
/// as [`get`](NodeRef::get) and [`match_chars`](NodeRef::match_chars) scan
/// `self` and every node after it.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a NodeArena,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(arena: &'a NodeArena, id: NodeId) -> Self {
        NodeRef { arena, id }
    }

    #[inline]
    fn node(self) -> &'a Node {
        &self.arena[self.id]
    }

    #[inline]
    fn at(self, id: NodeId) -> NodeRef<'a> {
        NodeRef::new(self.arena, id)
    }

    /// Handle of this node.
    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The letter this node stands for.
    #[inline]
    pub fn letter(self) -> char {
        self.node().letter
    }

    /// True if the path ending at this node spells a complete word.
    #[inline]
    pub fn is_end_of_word(self) -> bool {
        self.node().end_of_word
    }

    /// The next alternative letter at the same position.
    #[inline]
    pub fn next(self) -> Option<NodeRef<'a>> {
        self.node().next.map(|id| self.at(id))
    }

    /// The first letter that can follow this one.
    #[inline]
    pub fn child(self) -> Option<NodeRef<'a>> {
        self.node().child.map(|id| self.at(id))
    }

    /// Iterates over this node and all the siblings after it.
    pub fn siblings(self) -> Siblings<'a> {
        Siblings {
            arena: self.arena,
            next: Some(self.id),
        }
    }

    /// Returns the node for `letter` in the sibling list starting here.
    #[inline]
    pub fn get(self, letter: char) -> Option<NodeRef<'a>> {
        self.siblings().find(|n| n.letter() == letter)
    }

    /// Returns the node that matches the last character of `chars`, starting
    /// with the sibling list headed by this node.
    ///
    /// Returns `None` if `chars` is empty or some prefix has no match.
    pub fn match_chars(self, chars: &[char]) -> Option<NodeRef<'a>> {
        let (&first, rest) = chars.split_first()?;
        rest.iter()
            .try_fold(self.get(first)?, |node, &ch| node.child()?.get(ch))
    }

    /// True if `chars` is a complete word below this sibling list.
    pub fn has_word(self, chars: &[char]) -> bool {
        self.match_chars(chars).is_some_and(|n| n.is_end_of_word())
    }

    /// Calls `visit` with every word reachable from this sibling list, in
    /// alphabetical order, each prefixed with `prefix`. The node passed with
    /// the word is the one that ends it.
    pub fn each_word<F>(self, prefix: &str, mut visit: F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        let mut word = String::from(prefix);
        self.walk_words(&mut word, prefix.chars().count(), 1, &mut visit);
    }

    /// Like [`each_word`](NodeRef::each_word), but skips single-letter words.
    pub fn each_long_word<F>(self, prefix: &str, mut visit: F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        let mut word = String::from(prefix);
        self.walk_words(&mut word, prefix.chars().count(), 2, &mut visit);
    }

    fn walk_words<F>(self, word: &mut String, depth: usize, min_len: usize, visit: &mut F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        for node in self.siblings() {
            word.push(node.letter());
            if node.is_end_of_word() && depth + 1 >= min_len {
                visit(word.as_str(), node);
            }
            if let Some(child) = node.child() {
                child.walk_words(word, depth + 1, min_len, visit);
            }
            word.pop();
        }
    }

    /// Visits every distinct node reachable from here in pre-order: the node,
    /// then its child list, then its next sibling.
    ///
    /// Traversal stops as soon as `visit` returns `false`; the return value
    /// tells whether the traversal ran to completion.
    pub fn each_node<F>(self, mut visit: F) -> bool
    where
        F: FnMut(NodeRef<'a>) -> bool,
    {
        let mut seen = HashSet::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.at(id);
            if !visit(node) {
                return false;
            }
            stack.extend(node.node().next);
            stack.extend(node.node().child);
        }
        true
    }

    /// Finds every word that can be spelled with some of `letters`, each
    /// letter used at most once and [`WILDCARD`] standing for any letter.
    ///
    /// Maps each word found to the tiles it consumed, in word order. Where a
    /// wildcard was used the tile is the wildcard itself, so comparing key
    /// and value shows what each blank stood for.
    ///
    /// ```
    /// use lexidawg::dawg::Dictionary;
    ///
    /// let mut dict = Dictionary::new("demo");
    /// for word in ["ANT", "RANT", "TAN"] {
    ///     dict.add_word(word);
    /// }
    /// let found = dict.root().unwrap().find_words_that_use(&['N', 'A', 'T', ' ']);
    /// assert_eq!(found["RANT"], " ANT");
    /// ```
    pub fn find_words_that_use(self, letters: &[char]) -> BTreeMap<String, String> {
        let mut rack: SmallVec<[char; 16]> = letters.iter().copied().collect();
        let mut found = BTreeMap::new();
        self.collect_words_using(&mut rack, &mut String::new(), &mut String::new(), &mut found);
        found
    }

    fn collect_words_using(
        self,
        rack: &mut SmallVec<[char; 16]>,
        word: &mut String,
        tiles: &mut String,
        found: &mut BTreeMap<String, String>,
    ) {
        for node in self.siblings() {
            let letter = node.letter();
            let Some(pos) = rack
                .iter()
                .position(|&l| l == letter)
                .or_else(|| rack.iter().position(|&l| l == WILDCARD))
            else {
                continue;
            };
            let tile = rack.remove(pos);
            word.push(letter);
            tiles.push(tile);
            if node.is_end_of_word() {
                found.insert(word.clone(), tiles.clone());
            }
            if let Some(child) = node.child() {
                if !rack.is_empty() {
                    child.collect_words_using(rack, word, tiles, found);
                }
            }
            word.pop();
            tiles.pop();
            rack.insert(pos, tile);
        }
    }

    /// Returns every word exactly as long as `pattern` whose letters equal
    /// the pattern's, [`WILDCARD`] matching any single letter. Results come
    /// in alphabetical order.
    pub fn hangman_match(self, pattern: &[char]) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_hangmen(pattern, 0, &mut String::new(), &mut found);
        found
    }

    fn collect_hangmen(
        self,
        pattern: &[char],
        position: usize,
        built: &mut String,
        found: &mut Vec<String>,
    ) {
        let Some(&want) = pattern.get(position) else {
            return;
        };
        let last = position + 1 == pattern.len();
        for node in self.siblings() {
            if want != WILDCARD && want != node.letter() {
                continue;
            }
            built.push(node.letter());
            if last {
                if node.is_end_of_word() {
                    found.push(built.clone());
                }
            } else if let Some(child) = node.child() {
                child.collect_hangmen(pattern, position + 1, built, found);
            }
            built.pop();
        }
    }

    /// Structural equivalence: same letter, same end-of-word flag, and
    /// equivalent child and next structures all the way down.
    ///
    /// Nodes that are literally shared compare equal without descending.
    pub fn same_subtrie(self, other: NodeRef<'_>) -> bool {
        let (mut a, mut b) = (Some(self), Some(other));
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if std::ptr::eq(x.arena, y.arena) && x.id == y.id {
                        return true;
                    }
                    if x.letter() != y.letter() || x.is_end_of_word() != y.is_end_of_word() {
                        return false;
                    }
                    let same_child = match (x.child(), y.child()) {
                        (None, None) => true,
                        (Some(cx), Some(cy)) => cx.same_subtrie(cy),
                        _ => false,
                    };
                    if !same_child {
                        return false;
                    }
                    a = x.next();
                    b = y.next();
                }
                _ => return false,
            }
        }
    }

    /// Nodes that can come directly before this one in some word.
    pub fn pre_nodes(self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        self.node().links.pre_nodes.iter().map(move |&id| self.at(id))
    }

    /// Distinct letters of [`pre_nodes`](NodeRef::pre_nodes).
    pub fn pre_letters(self) -> &'a [char] {
        &self.node().links.pre_letters
    }

    /// Nodes that can come directly after this one in some word.
    pub fn post_nodes(self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        self.node().links.post_nodes.iter().map(move |&id| self.at(id))
    }

    /// Letters of [`post_nodes`](NodeRef::post_nodes).
    pub fn post_letters(self) -> &'a [char] {
        &self.node().links.post_letters
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("letter", &self.letter())
            .field("end_of_word", &self.is_end_of_word())
            .finish()
    }
}

/// Iterator over a node and the siblings that follow it.
#[derive(Clone)]
pub struct Siblings<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = NodeRef<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = NodeRef::new(self.arena, self.next?);
        self.next = node.node().next;
        Some(node)
    }
}

impl FusedIterator for Siblings<'_> {}

#[cfg(test)]
mod test {
    use super::*;

    fn arena_with(words: &[&str]) -> (NodeArena, NodeId) {
        let mut arena = NodeArena::new();
        let mut head = None;
        for word in words {
            let chars: Vec<char> = word.chars().collect();
            if !arena.contains(head, &chars) {
                head = Some(arena.insert(head, &chars));
            }
        }
        (arena, head.expect("at least one word"))
    }

    fn words_of(root: NodeRef<'_>) -> Vec<String> {
        let mut words = Vec::new();
        root.each_word("", |w, _| words.push(w.to_string()));
        words
    }

    #[test]
    fn each_word_is_alphabetical() {
        let (arena, head) = arena_with(&["MAUL", "MEAT", "EATS", "ATE", "ATE"]);
        let root = NodeRef::new(&arena, head);
        assert_eq!(words_of(root), ["ATE", "EATS", "MAUL", "MEAT"]);
    }

    #[test]
    fn each_word_passes_prefix_and_terminal_node() {
        let (arena, head) = arena_with(&["CAT", "CAR"]);
        let root = NodeRef::new(&arena, head);
        let mut seen = Vec::new();
        root.match_chars(&['C'])
            .unwrap()
            .child()
            .unwrap()
            .each_word("C", |w, n| seen.push((w.to_string(), n.letter())));
        assert_eq!(seen, [("CAR".to_string(), 'R'), ("CAT".to_string(), 'T')]);
    }

    #[test]
    fn each_long_word_skips_single_letters() {
        let (arena, head) = arena_with(&["A", "ANT", "TAN", "TA", "RANT", "AN"]);
        let root = NodeRef::new(&arena, head);
        let mut long = Vec::new();
        root.each_long_word("", |w, _| long.push(w.to_string()));
        assert_eq!(long, ["AN", "ANT", "RANT", "TA", "TAN"]);
        assert_eq!(words_of(root), ["A", "AN", "ANT", "RANT", "TA", "TAN"]);
    }

    #[test]
    fn each_node_is_preorder_and_stops_early() {
        let (arena, head) = arena_with(&["AST", "AAR"]);
        let root = NodeRef::new(&arena, head);

        let mut first = String::new();
        let completed = root.each_node(|n| {
            first.push(n.letter());
            false
        });
        assert!(!completed);
        assert_eq!(first, "A");

        let mut path = String::new();
        root.each_node(|n| {
            path.push(n.letter());
            n.letter() != 'T'
        });
        assert_eq!(path, "AARST");
    }

    #[test]
    fn match_returns_last_letter_node() {
        let (arena, head) = arena_with(&["A", "ANT", "TAN", "TA", "TEA", "RANT", "AN"]);
        let root = NodeRef::new(&arena, head);
        let found = root.match_chars(&['T', 'A']).unwrap();
        assert_eq!(found.letter(), 'A');
        assert_eq!(found.next().unwrap().letter(), 'E');
        assert_eq!(found.child().unwrap().letter(), 'N');
        assert!(root.match_chars(&['T', 'X']).is_none());
        assert!(root.match_chars(&[]).is_none());
        assert!(root.has_word(&['T', 'A']));
        assert!(!root.has_word(&['T', 'E']));
    }

    #[test]
    fn find_words_that_use_consumes_each_letter_once() {
        let (arena, head) = arena_with(&["MAUL", "MEAT", "EATS", "ATE"]);
        let root = NodeRef::new(&arena, head);
        assert!(root.find_words_that_use(&['A']).is_empty());
        assert!(root.find_words_that_use(&['A', 'T']).is_empty());

        let found = root.find_words_that_use(&['A', 'T', 'E']);
        assert_eq!(found.len(), 1);
        assert_eq!(found["ATE"], "ATE");

        let found = root.find_words_that_use(&[WILDCARD; 3]);
        assert_eq!(found.len(), 1);
        assert_eq!(found["ATE"], "   ");
    }

    #[test]
    fn find_words_that_use_prefers_real_letters_over_blanks() {
        let (arena, head) = arena_with(&["A", "ANT", "TAN", "TA", "RANT"]);
        let root = NodeRef::new(&arena, head);
        let found = root.find_words_that_use(&['N', 'A', 'T', WILDCARD]);
        let expected: BTreeMap<String, String> = [
            ("A", "A"),
            ("ANT", "ANT"),
            ("RANT", " ANT"),
            ("TA", "TA"),
            ("TAN", "TAN"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn hangman_requires_exact_length() {
        let (arena, head) = arena_with(&["HANGMAN", "HANGMEN", "HUNGMAN", "HUNGMEN", "HANG"]);
        let root = NodeRef::new(&arena, head);
        let pattern: Vec<char> = "H NGM N".chars().collect();
        assert_eq!(
            root.hangman_match(&pattern),
            ["HANGMAN", "HANGMEN", "HUNGMAN", "HUNGMEN"]
        );
        let pattern: Vec<char> = "H NGMEN".chars().collect();
        assert_eq!(root.hangman_match(&pattern), ["HANGMEN", "HUNGMEN"]);
        let pattern: Vec<char> = "H NGMENS".chars().collect();
        assert!(root.hangman_match(&pattern).is_empty());
        assert!(root.hangman_match(&[]).is_empty());
    }

    #[test]
    fn same_subtrie_compares_structure() {
        let (arena, head) = arena_with(&["A", "AB", "ABC", "BAB", "BB", "BBC", "XAB", "XABC"]);
        let root = NodeRef::new(&arena, head);
        let a = root.get('A').unwrap();
        let b = root.get('B').unwrap();
        let x = root.get('X').unwrap();
        assert!(a.same_subtrie(a));

        let ab = a.child().unwrap();
        let ba = b.child().unwrap();
        let bb = ba.next().unwrap();
        assert!(ab.same_subtrie(bb));
        assert!(!x.child().unwrap().same_subtrie(ba));
    }

    #[test]
    fn same_subtrie_looks_at_siblings() {
        let (arena, head) = arena_with(&["AABC", "BABD", "CAA", "CAB", "CBA", "CBC"]);
        let root = NodeRef::new(&arena, head);
        let a = root.get('A').unwrap();
        let b = root.get('B').unwrap();
        assert!(!a.child().unwrap().same_subtrie(b.child().unwrap()));

        let c = root.get('C').unwrap();
        let ca = c.child().unwrap();
        assert!(!ca.child().unwrap().same_subtrie(ca.next().unwrap().child().unwrap()));
    }

    #[test]
    fn same_subtrie_across_arenas() {
        let (arena1, head1) = arena_with(&["CAT", "DOG"]);
        let (arena2, head2) = arena_with(&["DOG", "CAT"]);
        assert!(NodeRef::new(&arena1, head1).same_subtrie(NodeRef::new(&arena2, head2)));
        let (arena3, head3) = arena_with(&["CAT", "DOGS"]);
        assert!(!NodeRef::new(&arena1, head1).same_subtrie(NodeRef::new(&arena3, head3)));
    }
}
