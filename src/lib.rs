//! # lexidawg
//!
//! Word-game dictionaries stored as a
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph).
//!
//! A [`Trie`](dawg::Trie) is built from a word list and minimized by merging
//! structurally identical sub-tries, then packed into a compact binary format
//! of 32-bit words. A [`Dictionary`](dawg::Dictionary) loads that format
//! (or is filled word by word) and answers word-game queries:
//!
//! - membership and prefix matching
//! - enumeration of all words, or all words with a prefix
//! - anagrams from a rack of letters, with `' '` as a blank tile
//! - hangman patterns, with `' '` matching any letter
//! - whether a letter sequence occurs inside any word
//!
//! ## Quick Start
//!
//! ```
//! use lexidawg::dawg::{Dictionary, Trie};
//!
//! let mut trie = Trie::build(["A", "ANT", "RANT", "TA", "TAN"]);
//! trie.generate_dawg();
//! let bytes = trie.encode().unwrap();
//!
//! let dict = Dictionary::decode("demo", &bytes).unwrap();
//! assert!(dict.has_word("RANT"));
//! assert!(!dict.has_word("RAN"));
//!
//! let anagrams = dict.find_anagrams("NAT ").unwrap();
//! assert_eq!(anagrams["RANT"], " ANT");
//! assert_eq!(dict.find_hangmen("T N").unwrap(), ["TAN"]);
//! assert!(dict.has_sequence("AN").unwrap());
//! ```
//!
//! ## Adding words
//!
//! Words can be added after loading. Shared parts of the graph are copied
//! before they change, so other words are never affected:
//!
//! ```
//! use lexidawg::dawg::{Dictionary, Trie};
//!
//! let mut trie = Trie::build(["BAT", "CAT"]);
//! trie.generate_dawg();
//! let mut dict = Dictionary::from(trie);
//!
//! dict.add_word("CAB");
//! assert!(dict.has_word("CAB"));
//! assert!(!dict.has_word("BAB"));
//! ```

#![warn(missing_docs)]

/// Core DAWG data structures: trie, codec, dictionary and queries.
pub mod dawg;
