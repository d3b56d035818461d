use smallvec::SmallVec;

/// Trait for types that can be used as a word when inserting into or
/// querying a dictionary.
///
/// Implemented for common string and character sequence types so that
/// [`Trie::add_word`](super::trie::Trie::add_word) and
/// [`Dictionary::add_word`](super::dictionary::Dictionary::add_word) accept
/// them directly without manual conversion.
pub trait IntoWord {
    /// Collects this word into a character buffer.
    fn collect_word(self) -> SmallVec<[char; 32]>;
}

impl IntoWord for &str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord for &[char] {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.iter().copied().collect()
    }
}

impl IntoWord for Vec<char> {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.into_iter().collect()
    }
}

impl IntoWord for &Vec<char> {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.iter().copied().collect()
    }
}

impl<const N: usize> IntoWord for [char; N] {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoWord for &[char; N] {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.iter().copied().collect()
    }
}
