//! Loading of configuration, word lists, and reviews from disk.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use word_market_core::{GameConfig, ReviewPool, WordList};

/// Reads a TOML game configuration, or returns the defaults when no path is
/// given. Partial files override only the keys they mention.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game configuration at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid game configuration in {}", path.display()))
}

fn parse_config(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse game configuration toml contents")?;
    config.validate()?;
    Ok(config)
}

/// Reads a newline-separated word list. An empty result is an error because
/// a list that was explicitly requested should contain words.
pub(crate) fn load_words(path: &Path) -> Result<WordList> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read word list at {}", path.display()))?;
    let words = WordList::parse(&contents);
    if words.is_empty() {
        bail!("word list at {} contains no five-letter words", path.display());
    }
    tracing::info!(path = %path.display(), count = words.len(), "loaded word list");
    Ok(words)
}

/// Reads newline-separated reviews; blank lines are skipped.
pub(crate) fn load_reviews(path: &Path) -> Result<ReviewPool> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read reviews at {}", path.display()))?;
    let reviews = ReviewPool::parse(&contents);
    tracing::info!(path = %path.display(), count = reviews.len(), "loaded reviews");
    Ok(reviews)
}
