use std::collections::BTreeMap;
use std::sync::OnceLock;

use hashbrown::HashMap;

use super::codec;
use super::error::{DawgError, Result};
use super::node::{NodeId, NodeRef};
use super::node_arena::NodeArena;
use super::trie::Trie;
use super::word::IntoWord;

/// A queryable word graph, loaded from the packed DAWG format or built up
/// one word at a time.
///
/// ```
/// use lexidawg::dawg::{Dictionary, Trie};
///
/// let mut trie = Trie::build(["HANGMAN", "HANGMEN", "HUNGMAN", "HUNGMEN"]);
/// trie.generate_dawg();
/// let dict = Dictionary::decode("hangmen", &trie.encode()?)?;
///
/// assert!(dict.has_word("HUNGMAN"));
/// assert_eq!(dict.find_hangmen("h ngmen")?, ["HANGMEN", "HUNGMEN"]);
/// assert!(dict.has_sequence("NGM")?);
/// # Ok::<(), lexidawg::dawg::DawgError>(())
/// ```
///
/// Queries take `&self` and may run concurrently. Mutation needs
/// `&mut self`, which rules out queries running at the same time.
#[derive(Clone, Debug)]
pub struct Dictionary {
    name: String,
    arena: NodeArena,
    root: Option<NodeId>,
    /// Every node of each letter, built on first use.
    sequence_roots: OnceLock<HashMap<char, Vec<NodeId>>>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new(name: impl Into<String>) -> Self {
        Dictionary {
            name: name.into(),
            arena: NodeArena::new(),
            root: None,
            sequence_roots: OnceLock::new(),
        }
    }

    /// Decodes a dictionary from the packed DAWG format.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::CorruptData`] if `data` is not a well-formed DAWG.
    pub fn decode(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let mut dict = Dictionary::new(name);
        dict.load_dawg(data)?;
        Ok(dict)
    }

    /// Replaces the contents of this dictionary with the decoded `data`.
    ///
    /// On error the dictionary is left unchanged.
    pub fn load_dawg(&mut self, data: &[u8]) -> Result<()> {
        let (arena, root) = codec::decode(data)?;
        self.arena = arena;
        self.root = root;
        self.sequence_roots = OnceLock::new();
        tracing::debug!(name = %self.name, nodes = self.arena.len(), "loaded dictionary");
        Ok(())
    }

    /// Serializes the dictionary, including words added since it was loaded.
    pub fn encode(&self) -> Result<Vec<u8>> {
        codec::encode(&self.arena, self.root)
    }

    /// The name given when the dictionary was created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first node of the top-level letter list, if there are any words.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.arena.node_ref(id))
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Fills in the predecessor and successor lists of every node, see
    /// [`NodeRef::pre_nodes`] and [`NodeRef::post_nodes`].
    ///
    /// The lists are rebuilt by [`add_word`](Dictionary::add_word) but are
    /// otherwise left alone.
    pub fn add_links(&mut self) {
        if let Some(root) = self.root {
            self.arena.build_lists(root);
        }
    }

    /// Calls `visit` with every word in alphabetical order, along with the
    /// node that ends it.
    pub fn each_word<'a, F>(&'a self, visit: F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        if let Some(root) = self.root() {
            root.each_word("", visit);
        }
    }

    /// Like [`each_word`](Dictionary::each_word), skipping one-letter words.
    pub fn each_long_word<'a, F>(&'a self, visit: F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        if let Some(root) = self.root() {
            root.each_long_word("", visit);
        }
    }

    /// Calls `visit` with every word starting with `prefix`, the prefix
    /// itself included if it is a word.
    pub fn each_word_with_prefix<'a, F>(&'a self, prefix: &str, mut visit: F)
    where
        F: FnMut(&str, NodeRef<'a>),
    {
        let Some(node) = self.match_word(prefix) else {
            return;
        };
        if node.is_end_of_word() {
            visit(prefix, node);
        }
        if let Some(child) = node.child() {
            child.each_word(prefix, visit);
        }
    }

    /// Returns the node reached by spelling `chars` from the top level.
    pub fn match_word(&self, chars: impl IntoWord) -> Option<NodeRef<'_>> {
        self.root()?.match_chars(&chars.collect_word())
    }

    /// True if `word` is in the dictionary.
    pub fn has_word(&self, word: impl IntoWord) -> bool {
        self.arena.contains(self.root, &word.collect_word())
    }

    /// Finds every word that can be spelled from some of `letters`, with `' '`
    /// standing for any letter. The letters are upper-cased first.
    ///
    /// Returns a map from each word to the letters used to spell it, with
    /// blanks left as `' '`.
    ///
    /// # Errors
    ///
    /// [`DawgError::MissingInput`] if `letters` is empty and
    /// [`DawgError::TooShort`] if it is a single letter.
    pub fn find_anagrams(&self, letters: &str) -> Result<BTreeMap<String, String>> {
        let letters = letters.to_uppercase();
        let rack: Vec<char> = letters.chars().collect();
        match rack.len() {
            0 => return Err(DawgError::MissingInput("anagrams")),
            1 => return Err(DawgError::TooShort(letters)),
            _ => {}
        }
        Ok(self
            .root()
            .map(|root| root.find_words_that_use(&rack))
            .unwrap_or_default())
    }

    /// Finds every word matching `pattern` letter for letter, with `' '`
    /// matching any letter. The pattern is upper-cased first.
    ///
    /// # Errors
    ///
    /// [`DawgError::MissingInput`] if `pattern` is empty.
    pub fn find_hangmen(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern: Vec<char> = pattern.to_uppercase().chars().collect();
        if pattern.is_empty() {
            return Err(DawgError::MissingInput("hangman matches"));
        }
        Ok(self
            .root()
            .map(|root| root.hangman_match(&pattern))
            .unwrap_or_default())
    }

    fn sequence_index(&self) -> &HashMap<char, Vec<NodeId>> {
        self.sequence_roots.get_or_init(|| {
            let mut index: HashMap<char, Vec<NodeId>> = HashMap::new();
            if let Some(root) = self.root() {
                root.each_node(|node| {
                    index.entry(node.letter()).or_default().push(node.id());
                    true
                });
            }
            tracing::debug!(
                name = %self.name,
                letters = index.len(),
                nodes = index.values().map(Vec::len).sum::<usize>(),
                "created sequence roots"
            );
            index
        })
    }

    /// Every node that stands for `letter`, anywhere in the graph.
    pub fn sequence_roots(&self, letter: char) -> Vec<NodeRef<'_>> {
        self.sequence_index()
            .get(&letter)
            .map(|ids| ids.iter().map(|&id| self.arena.node_ref(id)).collect())
            .unwrap_or_default()
    }

    /// Finds a sequence root from which `seq` can be spelled, proving that
    /// `seq` occurs somewhere inside some word.
    ///
    /// # Errors
    ///
    /// [`DawgError::MissingInput`] if `seq` is empty and
    /// [`DawgError::NoRoots`] if its first letter is not used by any word.
    pub fn find_sequence(&self, seq: &str) -> Result<Option<NodeRef<'_>>> {
        let chars: Vec<char> = seq.chars().collect();
        let Some(first) = chars.first() else {
            return Err(DawgError::MissingInput("sequences"));
        };
        let roots = self
            .sequence_index()
            .get(first)
            .filter(|roots| !roots.is_empty())
            .ok_or_else(|| DawgError::NoRoots(seq.to_string()))?;
        Ok(roots
            .iter()
            .map(|&id| self.arena.node_ref(id))
            .find(|root| root.match_chars(&chars).is_some()))
    }

    /// True if `seq` occurs somewhere inside some word.
    ///
    /// # Errors
    ///
    /// As for [`find_sequence`](Dictionary::find_sequence).
    pub fn has_sequence(&self, seq: &str) -> Result<bool> {
        Ok(self.find_sequence(seq)?.is_some())
    }

    /// Adds a word, returning `false` if it was empty or already present.
    ///
    /// Parts of the graph shared with other words are copied rather than
    /// changed, so the result is no longer minimal.
    pub fn add_word(&mut self, word: impl IntoWord) -> bool {
        let word = word.collect_word();
        if word.is_empty() || self.arena.contains(self.root, &word) {
            return false;
        }
        let root = self.arena.insert(self.root, &word);
        self.root = Some(root);
        self.sequence_roots.take();
        self.arena.build_lists(root);
        let spelled: String = word.iter().collect();
        tracing::trace!(name = %self.name, word = %spelled, "added word");
        true
    }
}

impl From<Trie> for Dictionary {
    fn from(trie: Trie) -> Self {
        let (arena, root) = trie.into_parts();
        Dictionary {
            name: String::new(),
            arena,
            root,
            sequence_roots: OnceLock::new(),
        }
    }
}
