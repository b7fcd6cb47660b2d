//! Collaborators the engine consults for words and review text.
//!
//! The engine never loads files itself. Adapters build these collaborators
//! from whatever storage they use and hand them to the world at construction
//! time.

use std::fmt;

use rand::{seq::SliceRandom, RngCore};

use crate::{Word, WORD_LENGTH};

/// Decides whether a word is playable.
pub trait WordOracle: fmt::Debug {
    /// Reports whether the word is accepted.
    fn is_valid(&self, word: &Word) -> bool;
}

/// Supplies secret words for critics.
pub trait SecretWordSource: fmt::Debug {
    /// Chooses a secret uniformly, or `None` when no words are available.
    fn draw_secret(&self, rng: &mut dyn RngCore) -> Option<Word>;

    /// Reports whether the source can never produce a word.
    fn is_empty(&self) -> bool;
}

/// Supplies flavour text left behind by departing customers.
pub trait ReviewSource: fmt::Debug {
    /// Chooses a review uniformly, or `None` when the pool is empty.
    fn draw_review(&self, rng: &mut dyn RngCore) -> Option<String>;
}

/// Sorted, deduplicated list of five-letter words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// Parses newline-separated text, keeping every five-letter alphabetic
    /// entry and normalising it to uppercase.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| line.len() == WORD_LENGTH)
            .filter_map(|line| Word::parse(line).ok())
            .collect()
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Reports whether the list holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reports whether the list contains the word.
    #[must_use]
    pub fn contains(&self, word: &Word) -> bool {
        self.words.binary_search(word).is_ok()
    }

    /// Words in alphabetical order.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

impl FromIterator<Word> for WordList {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut words: Vec<Word> = iter.into_iter().collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }
}

impl WordOracle for WordList {
    fn is_valid(&self, word: &Word) -> bool {
        self.contains(word)
    }
}

impl SecretWordSource for WordList {
    fn draw_secret(&self, rng: &mut dyn RngCore) -> Option<Word> {
        self.words.choose(rng).copied()
    }

    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Curated critic vocabulary that falls back to the dictionary when empty.
#[derive(Clone, Debug, Default)]
pub struct FallbackSecrets {
    curated: WordList,
    fallback: WordList,
}

impl FallbackSecrets {
    /// Combines a curated list with a fallback list.
    #[must_use]
    pub fn new(curated: WordList, fallback: WordList) -> Self {
        Self { curated, fallback }
    }
}

impl SecretWordSource for FallbackSecrets {
    fn draw_secret(&self, rng: &mut dyn RngCore) -> Option<Word> {
        self.curated
            .draw_secret(rng)
            .or_else(|| self.fallback.draw_secret(rng))
    }

    fn is_empty(&self) -> bool {
        self.curated.is_empty() && self.fallback.is_empty()
    }
}

/// Pool of negative reviews.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewPool {
    reviews: Vec<String>,
}

impl ReviewPool {
    /// Parses newline-separated text, keeping every non-blank trimmed line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::new(text.lines().map(str::to_owned))
    }

    /// Builds a pool from individual reviews, dropping blank entries.
    #[must_use]
    pub fn new(reviews: impl IntoIterator<Item = String>) -> Self {
        let reviews = reviews
            .into_iter()
            .map(|review| review.trim().to_owned())
            .filter(|review| !review.is_empty())
            .collect();
        Self { reviews }
    }

    /// Number of reviews in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Reports whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

impl ReviewSource for ReviewPool {
    fn draw_review(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.reviews.choose(rng).cloned()
    }
}

/// Everything the engine consults outside its own state.
#[derive(Debug)]
pub struct Collaborators {
    /// Dictionary used to validate submitted words.
    pub oracle: Box<dyn WordOracle>,
    /// Source of critic secrets.
    pub secrets: Box<dyn SecretWordSource>,
    /// Source of departure reviews.
    pub reviews: Box<dyn ReviewSource>,
}

impl Collaborators {
    /// Builds collaborators from in-memory lists; critics draw from `critic_words`
    /// and fall back to the dictionary.
    #[must_use]
    pub fn from_lists(dictionary: WordList, critic_words: WordList, reviews: ReviewPool) -> Self {
        Self {
            oracle: Box::new(dictionary.clone()),
            secrets: Box::new(FallbackSecrets::new(critic_words, dictionary)),
            reviews: Box::new(reviews),
        }
    }
}
