use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::Result;
use super::trie::Trie;
use super::word::IntoWord;

/// Extracts the word from one lexicon line: everything up to the first
/// whitespace, upper-cased. Blank and `#` comment lines give `None`.
fn lexicon_word(line: &str) -> Option<String> {
    if is_comment(line) {
        return None;
    }
    let word = line.split(char::is_whitespace).next().unwrap_or_default();
    (!word.is_empty()).then(|| word.to_uppercase())
}

/// Returns true if this line is a comment.
fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort_unstable();
    words.dedup();
    words
}

/// Parses lexicon text into a sorted, duplicate-free list of upper-case
/// words.
///
/// Each line holds one word. Anything after the first whitespace on a line
/// is a comment, as is a line starting with `#`. Lines that start with
/// whitespace or are empty hold no word.
///
/// ```
/// use lexidawg::dawg::lexicon::parse_lexicon;
///
/// let words = parse_lexicon("zoo\n# animals\nbat winged\n\nZoo\n");
/// assert_eq!(words, ["BAT", "ZOO"]);
/// ```
pub fn parse_lexicon(text: &str) -> Vec<String> {
    sorted(text.lines().filter_map(lexicon_word).collect())
}

/// Reads and parses a lexicon file, see [`parse_lexicon`].
pub fn read_lexicon(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mut words = Vec::new();

    // read_line reuses one buffer instead of allocating per line.
    let mut buf = String::with_capacity(80);
    while reader.read_line(&mut buf)? > 0 {
        words.extend(lexicon_word(buf.trim_end_matches(['\r', '\n'])));
        buf.clear();
    }
    let words = sorted(words);
    tracing::info!(path = %path.display(), words = words.len(), "read lexicon");
    Ok(words)
}

/// Builds, minimizes and encodes a DAWG holding `words`.
pub fn compress<W: IntoWord>(words: impl IntoIterator<Item = W>) -> Result<Vec<u8>> {
    let mut trie = Trie::build(words);
    trie.generate_dawg();
    trie.encode()
}
