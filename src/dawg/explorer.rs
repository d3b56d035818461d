//! Batch queries over a [`Dictionary`], each reporting results through a
//! callback.
//!
//! In the anagram and hangman queries a `.` stands for any letter.

use hashbrown::HashSet;

use super::dictionary::Dictionary;
use super::error::{DawgError, Result};
use super::node::WILDCARD;

fn with_wildcards(word: &str) -> String {
    word.replace('.', &WILDCARD.to_string())
}

/// Reports every word in the dictionary, or with `words` given, every word
/// that extends one of them.
///
/// Longer prefixes are handled first, and no word is reported twice or
/// reported when it is itself one of the prefixes.
pub fn list<S: AsRef<str>>(dictionary: &Dictionary, words: &[S], mut report: impl FnMut(&str)) {
    if words.is_empty() {
        dictionary.each_word(|word, _| report(word));
        return;
    }

    let mut prefixes: Vec<_> = words
        .iter()
        .map(|w| w.as_ref().to_uppercase())
        .filter_map(|w| dictionary.match_word(w.as_str()).map(|node| (w, node)))
        .collect();
    prefixes.sort_by_key(|(w, _)| std::cmp::Reverse(w.chars().count()));

    let mut seen = HashSet::new();
    for (prefix, node) in prefixes {
        let Some(child) = node.child() else {
            continue;
        };
        seen.insert(prefix.clone());
        let mut found = Vec::new();
        child.each_word(&prefix, |word, _| found.push(word.to_string()));
        for word in found {
            if !seen.contains(&word) {
                report(&word);
                seen.insert(word);
            }
        }
    }
}

/// Reports the anagrams of each word that use all of its letters.
///
/// # Errors
///
/// [`DawgError::MissingInput`] if `words` is empty, and anything
/// [`Dictionary::find_anagrams`] returns.
pub fn anagrams<S: AsRef<str>>(
    dictionary: &Dictionary,
    words: &[S],
    mut report: impl FnMut(&str),
) -> Result<()> {
    if words.is_empty() {
        return Err(DawgError::MissingInput("anagrams"));
    }
    for word in words {
        let word = word.as_ref();
        let length = word.chars().count();
        let found = dictionary.find_anagrams(&with_wildcards(word))?;
        found
            .keys()
            .filter(|w| w.chars().count() == length)
            .for_each(|w| report(w));
    }
    Ok(())
}

/// Reports every word that can be spelled from some of the letters of each
/// word.
///
/// # Errors
///
/// As for [`anagrams`].
pub fn arrangements<S: AsRef<str>>(
    dictionary: &Dictionary,
    words: &[S],
    mut report: impl FnMut(&str),
) -> Result<()> {
    if words.is_empty() {
        return Err(DawgError::MissingInput("arrangements"));
    }
    for word in words {
        dictionary
            .find_anagrams(word.as_ref())?
            .keys()
            .for_each(|w| report(w));
    }
    Ok(())
}

/// Reports the hangman matches of each pattern.
///
/// # Errors
///
/// [`DawgError::MissingInput`] if `words` is empty or holds an empty pattern.
pub fn hangmen<S: AsRef<str>>(
    dictionary: &Dictionary,
    words: &[S],
    mut report: impl FnMut(&str),
) -> Result<()> {
    if words.is_empty() {
        return Err(DawgError::MissingInput("hangman matches"));
    }
    for word in words {
        for found in dictionary.find_hangmen(&with_wildcards(word.as_ref()))? {
            report(&found);
        }
    }
    Ok(())
}

/// Reports each word that occurs somewhere inside a dictionary word.
///
/// A word starting with a letter the dictionary never uses is not
/// reported.
///
/// # Errors
///
/// [`DawgError::MissingInput`] if one of the words is empty.
pub fn sequences<S: AsRef<str>>(
    dictionary: &Dictionary,
    words: &[S],
    mut report: impl FnMut(&str),
) -> Result<()> {
    for word in words {
        let word = word.as_ref();
        match dictionary.has_sequence(word) {
            Ok(true) => report(word),
            Ok(false) | Err(DawgError::NoRoots(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const WORDS: &[&str] = &[
        "ATOMIC", "INFINITESIMAL", "MICROSCOPIC", "MINIATURE", "MINUSCULE", "MINUTE", "TEENSY",
        "TEENY", "WEE", "WEENSY", "BABY", "DIMINUTIVE", "DWARF", "ELFIN", "LITTLE", "PETITE",
        "POCKET", "PYGMY", "SMALL", "DINKY", "DWARFISH", "INSIGNIFICANT", "PUNY", "UNDERSIZED",
        "BIG", "BULKY", "BUMPER", "CONSIDERABLE", "EXTENSIVE", "EWE", "GOOD", "GOODLY", "GRAND",
        "GREAT", "GROSS", "HANDSOME", "HANGMAN", "HANGMEN", "HEFTY", "HULKING", "JUMBO", "LARGE",
        "LARGISH", "MAJOR", "OUTSIZED", "OVERGROWN", "OVERSCALE", "OVERSIZED", "SIZEABLE",
        "SUBSTANTIAL", "SUPER", "WHACKING", "WHOPPING", "FORMIDABLE", "GRANDIOSE", "IMPOSING",
        "LOFTY", "MAJESTIC", "MONOLITHIC", "STAGGERING", "STUPENDOUS", "TOWERING", "BOUNDLESS",
        "CAVERNOUS", "IMMEASURABLE", "INFINITE", "VAST", "VOLUMINOUS", "ASTRONOMICAL", "COLOSSAL",
        "COSMIC", "ELEPHANTINE", "ENORMOUS", "GIANT", "GIGANTIC", "HERCULEAN", "HEROIC", "HUGE",
        "IMMENSE", "WEED", "MAMMOTH", "MASSIVE", "MONSTER", "MONSTROUS", "MONUMENTAL",
        "MOUNTAINOUS", "PLANETARY", "PRODIGIOUS", "SWEET", "TITANIC", "TREMENDOUS",
    ];

    fn dictionary() -> Dictionary {
        let mut dict = Dictionary::new("test");
        for word in WORDS {
            dict.add_word(word);
        }
        dict
    }

    fn collect(run: impl FnOnce(&mut dyn FnMut(&str))) -> Vec<String> {
        let mut out = Vec::new();
        run(&mut |w: &str| out.push(w.to_string()));
        out
    }

    #[test]
    fn list_all() {
        let dict = dictionary();
        let found = collect(|r| list::<&str>(&dict, &[], r));
        let mut expected: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn list_some() {
        let dict = dictionary();
        let found = collect(|r| list(&dict, &["wee"], r));
        assert_eq!(found, ["WEED", "WEENSY"]);
    }

    #[test]
    fn list_reports_each_word_once() {
        let dict = dictionary();
        let found = collect(|r| list(&dict, &["OVER", "OVERS", "XYZ"], r));
        assert_eq!(found, ["OVERSCALE", "OVERSIZED", "OVERGROWN"]);
    }

    #[test]
    fn anagrams_use_every_letter() {
        let dict = dictionary();
        let found = collect(|r| anagrams(&dict, &["WEE"], r).unwrap());
        assert_eq!(found, ["EWE", "WEE"]);

        let found = collect(|r| anagrams(&dict, &["W.E"], r).unwrap());
        assert_eq!(found, ["EWE", "WEE"]);

        assert!(matches!(
            anagrams::<&str>(&dict, &[], |_| {}),
            Err(DawgError::MissingInput(_))
        ));
    }

    #[test]
    fn sequences_skip_impossible_words() {
        let dict = dictionary();
        let found = collect(|r| sequences(&dict, &["WEE", "CUTE", "QUA"], r).unwrap());
        assert_eq!(found, ["WEE"]);
    }

    #[test]
    fn arrangements_use_some_letters() {
        let dict = dictionary();
        let found = collect(|r| arrangements(&dict, &["WEENSY"], r).unwrap());
        assert_eq!(found, ["EWE", "WEE", "WEENSY"]);
    }

    #[test]
    fn hangmen_with_dots() {
        let dict = dictionary();
        let found = collect(|r| hangmen(&dict, &["H.NG..N"], r).unwrap());
        assert_eq!(found, ["HANGMAN", "HANGMEN"]);
        assert!(matches!(
            hangmen::<&str>(&dict, &[], |_| {}),
            Err(DawgError::MissingInput(_))
        ));
    }
}
