//! Example: a word-game helper on top of a compressed dictionary.
//!
//! Builds a DAWG from a small word list, round-trips it through the binary
//! format, and runs the kinds of queries a word game needs.
//!
//! Run with: cargo run --example wordlist

use lexidawg::dawg::{lexicon, Dictionary};

fn main() -> lexidawg::dawg::Result<()> {
    let words = lexicon::parse_lexicon(
        "bake\nbaked\nbaker\ncake\ncaked\nfake\nlake\n# a comment\nkea parrot\n",
    );
    let data = lexicon::compress(&words)?;
    println!("{} words packed into {} bytes", words.len(), data.len());

    let dict = Dictionary::decode("demo", &data)?;

    println!("Word lookup:");
    for word in ["BAKE", "BAKER", "BAKES", "CAKE", "LAKE", "MAKE"] {
        println!("  {word}: {}", if dict.has_word(word) { "yes" } else { "no" });
    }

    println!("\nWords starting with BAK:");
    dict.each_word_with_prefix("BAK", |word, _| println!("  {word}"));

    println!("\nAnagrams of 'KAE ':");
    for (word, tiles) in dict.find_anagrams("kae ")? {
        println!("  {word} from '{tiles}'");
    }

    println!("\nHangman '.AKE.':");
    for word in dict.find_hangmen(&".AKE.".replace('.', " "))? {
        println!("  {word}");
    }

    for seq in ["AKE", "KEB"] {
        println!("\n'{seq}' inside a word: {}", dict.has_sequence(seq)?);
    }
    Ok(())
}
