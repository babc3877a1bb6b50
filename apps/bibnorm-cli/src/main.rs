//! format-bib
//!
//! Normalizes titles and venue names of a BibTeX file in one pass. Without
//! arguments it reads `body/ref.bib.bk` and writes `body/ref.bib`.

use std::path::PathBuf;

use bibnorm::{Config, MatchMode, Normalizer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "format-bib", version, about)]
struct Cli {
    /// BibTeX file to read (overrides the config)
    input: Option<PathBuf>,

    /// BibTeX file to write (overrides the config)
    output: Option<PathBuf>,

    /// Config file; defaults to ./format-bib.toml or ~/.format-bib/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Match venue keywords on word boundaries only
    #[arg(long)]
    whole_word: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, bibnorm::Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_standard(&std::env::current_dir().unwrap_or_default())?,
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.whole_word {
            config.match_mode = MatchMode::WholeWord;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    tracing::debug!(?config, "resolved configuration");

    let normalizer = Normalizer::from_config(&config)?;
    normalizer.normalize_file(&config.input, &config.output)?;

    Ok(())
}
