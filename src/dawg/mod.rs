/// Packed binary format: descriptor layout, encoding and validated decoding.
pub mod codec;
/// Queryable dictionary loaded from the binary format or built word by word.
pub mod dictionary;
/// Error type shared by the whole crate.
pub mod error;
/// Batch queries that report results through a callback.
pub mod explorer;
/// Lexicon text parsing and one-shot compression.
pub mod lexicon;
/// Graph nodes and the borrowed view used to traverse and search them.
pub mod node;
/// Internal index-addressed node arena with reference counting.
pub(crate) mod node_arena;
/// Word trie with DAWG minimization.
pub mod trie;
/// Conversion of strings and character sequences into words.
pub mod word;

pub use codec::{CHILD_INDEX_SHIFT, END_OF_LIST_BIT_MASK, END_OF_WORD_BIT_MASK, MAX_NODES};
pub use dictionary::Dictionary;
pub use error::{DawgError, Result};
pub use node::{NodeId, NodeRef, Siblings, WILDCARD};
pub use trie::Trie;
pub use word::IntoWord;
