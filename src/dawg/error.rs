use thiserror::Error;

/// Result type alias using [`DawgError`].
pub type Result<T> = std::result::Result<T, DawgError>;

/// Errors raised while building, serializing or querying a dictionary.
#[derive(Debug, Error)]
pub enum DawgError {
    /// An anagram query needs at least two letters.
    #[error("'{0}' is too short to find anagrams")]
    TooShort(String),

    /// A query was given no letters at all.
    #[error("need letters to find {0}")]
    MissingInput(&'static str),

    /// The first letter of a sequence never occurs in the dictionary.
    #[error("'{0}' has no roots")]
    NoRoots(String),

    /// The binary DAWG could not be decoded.
    #[error("corrupt DAWG data: {0}")]
    CorruptData(String),

    /// The graph has more nodes than the child index field can address.
    #[error("{0} nodes is more than the DAWG format can index")]
    TooManyNodes(usize),

    /// Reading a lexicon or dictionary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DawgError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        DawgError::CorruptData(msg.into())
    }
}
