//! Command-line front end: compress a lexicon into a DAWG and explore it.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use lexidawg::dawg::{explorer, lexicon, Dictionary, DawgError};

#[derive(Parser)]
#[command(name = "dawg")]
#[command(about = "Build and explore word-game DAWG dictionaries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Query {
    /// Binary DAWG file to query
    #[arg(long, short = 'd', env = "DAWG_DICTIONARY")]
    dictionary: PathBuf,

    /// Words or patterns to look up
    words: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a lexicon (one word per line) into a binary DAWG
    Compress {
        /// Lexicon text file
        #[arg(value_name = "LEXICON")]
        input: PathBuf,

        /// Where to write the DAWG
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// List every word, or every word extending one of the given words
    List(Query),
    /// Anagrams using all the letters of each word; '.' is a blank
    Anagrams(Query),
    /// Words using some of the letters of each word
    Arrangements(Query),
    /// Hangman matches for each pattern; '.' matches any letter
    Hangmen(Query),
    /// The words that occur inside some dictionary word
    Sequences(Query),
}

fn load(path: &Path) -> anyhow::Result<Dictionary> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let dict = Dictionary::decode(path.display().to_string(), &data)
        .with_context(|| format!("decoding {}", path.display()))?;
    info!(path = %path.display(), nodes = dict.node_count(), "loaded dictionary");
    Ok(dict)
}

fn run_query(
    query: Query,
    explore: fn(&Dictionary, &[String], &mut dyn FnMut(&str)) -> Result<(), DawgError>,
) -> anyhow::Result<()> {
    let dict = load(&query.dictionary)?;
    let mut out = BufWriter::new(io::stdout().lock());
    let mut failed = None;
    explore(&dict, &query.words, &mut |word: &str| {
        if failed.is_none() {
            failed = writeln!(out, "{word}").err();
        }
    })?;
    if let Some(e) = failed {
        return Err(e.into());
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compress { input, output } => {
            let words = lexicon::read_lexicon(&input)
                .with_context(|| format!("reading lexicon {}", input.display()))?;
            let data = lexicon::compress(&words)?;
            std::fs::write(&output, &data)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(
                words = words.len(),
                bytes = data.len(),
                output = %output.display(),
                "wrote DAWG"
            );
        }
        Commands::List(query) => run_query(query, |dict, words, report| {
            explorer::list(dict, words, report);
            Ok(())
        })?,
        Commands::Anagrams(query) => run_query(query, |d, w, r| explorer::anagrams(d, w, r))?,
        Commands::Arrangements(query) => {
            run_query(query, |d, w, r| explorer::arrangements(d, w, r))?
        }
        Commands::Hangmen(query) => run_query(query, |d, w, r| explorer::hangmen(d, w, r))?,
        Commands::Sequences(query) => run_query(query, |d, w, r| explorer::sequences(d, w, r))?,
    }

    Ok(())
}
