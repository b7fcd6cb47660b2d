#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Word Market engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values describing
//! what happened during the turn. Systems operate on the value types defined
//! here and never touch the world directly.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod lexicon;

pub use config::{
    BagLayout, ConfigError, CriticPolicy, EconomyConfig, Exclusion, GameConfig, LetterCounts,
    PatienceConfig, PositionalDistribution, SeatConfig, SeatRetirement, TileConfig,
};
pub use lexicon::{
    Collaborators, FallbackSecrets, ReviewPool, ReviewSource, SecretWordSource, WordList,
    WordOracle,
};

/// Number of letters in every playable word.
pub const WORD_LENGTH: usize = 5;

/// Number of seats in the shop; one per letter position.
pub const SLOT_COUNT: usize = WORD_LENGTH;

/// Review recorded for a customer when no review text is available.
pub const FALLBACK_REVIEW: &str = "Walked Out";

/// Rounds a monetary amount to whole cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Uppercase ASCII letter used for tiles, prices, and words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(u8);

impl Letter {
    /// Creates a letter from a character, normalising lowercase input.
    #[must_use]
    pub fn from_char(value: char) -> Option<Self> {
        if value.is_ascii_alphabetic() {
            Some(Self(value.to_ascii_uppercase() as u8))
        } else {
            None
        }
    }

    /// Creates a letter from its zero-based alphabet position.
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        u8::try_from(ordinal)
            .ok()
            .filter(|value| *value < 26)
            .map(|value| Self(b'A' + value))
    }

    /// Iterates over the alphabet from `A` to `Z`.
    pub fn alphabet() -> impl Iterator<Item = Letter> {
        (b'A'..=b'Z').map(Self)
    }

    /// Uppercase character representation.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// Zero-based position within the alphabet.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        (self.0 - b'A') as usize
    }
}

impl TryFrom<char> for Letter {
    type Error = InvalidLetter;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_char(value).ok_or(InvalidLetter(value))
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        letter.as_char()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Error produced when a character is not an ASCII letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a letter")]
pub struct InvalidLetter(pub char);

/// Errors raised while parsing a [`Word`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WordError {
    /// The text did not contain exactly five characters.
    #[error("expected 5 letters, found {0}")]
    WrongLength(usize),
    /// The text contained a non-letter character.
    #[error(transparent)]
    InvalidLetter(#[from] InvalidLetter),
}

/// Five uppercase letters; the canonical form of guesses, secrets, and dictionary entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([Letter; WORD_LENGTH]);

impl Word {
    /// Builds a word from exactly five letters.
    #[must_use]
    pub fn from_letters(letters: &[Letter]) -> Option<Self> {
        letters.try_into().ok().map(Self)
    }

    /// Parses a word case-insensitively.
    pub fn parse(text: &str) -> Result<Self, WordError> {
        let count = text.chars().count();
        if count != WORD_LENGTH {
            return Err(WordError::WrongLength(count));
        }

        let mut letters = [Letter(b'A'); WORD_LENGTH];
        for (slot, value) in letters.iter_mut().zip(text.chars()) {
            *slot = Letter::try_from(value)?;
        }
        Ok(Self(letters))
    }

    /// Letters in positional order.
    #[must_use]
    pub const fn letters(&self) -> &[Letter; WORD_LENGTH] {
        &self.0
    }

    /// Letter stored at the provided position.
    #[must_use]
    pub const fn letter_at(&self, index: SlotIndex) -> Letter {
        self.0[index.get()]
    }

    /// Reports whether the letter occurs anywhere in the word.
    #[must_use]
    pub fn contains(&self, letter: Letter) -> bool {
        self.0.contains(&letter)
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.0 {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// Seat position within the shop, matching a letter position in the word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Creates a slot index when the value lies within `0..SLOT_COUNT`.
    #[must_use]
    pub fn new(value: usize) -> Option<Self> {
        if value < SLOT_COUNT {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    /// Iterates over every slot in ascending order.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT as u8).map(Self)
    }

    /// Zero-based position.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = SlotOutOfRange;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(SlotOutOfRange(value))
    }
}

impl From<SlotIndex> for usize {
    fn from(index: SlotIndex) -> Self {
        index.get()
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error produced when a slot index lies outside the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("slot {0} is outside 0..5")]
pub struct SlotOutOfRange(pub usize);

/// Unique identifier assigned to an occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(u32);

impl OccupantId {
    /// Creates a new occupant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Customer waiting for a single letter at a single position.
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    id: OccupantId,
    seed: u64,
    index: SlotIndex,
    letter: Letter,
    willing_price: f64,
    patience: u32,
}

impl Customer {
    /// Creates a customer; the price is rounded to cents.
    #[must_use]
    pub fn new(
        id: OccupantId,
        seed: u64,
        index: SlotIndex,
        letter: Letter,
        willing_price: f64,
        patience: u32,
    ) -> Self {
        Self {
            id,
            seed,
            index,
            letter,
            willing_price: round_cents(willing_price),
            patience,
        }
    }

    /// Letter the customer wants.
    #[must_use]
    pub const fn letter(&self) -> Letter {
        self.letter
    }

    /// Amount the customer pays when satisfied.
    #[must_use]
    pub const fn willing_price(&self) -> f64 {
        self.willing_price
    }

    /// Reports whether the word places the wanted letter at this seat.
    #[must_use]
    pub fn is_satisfied_by(&self, word: &Word) -> bool {
        word.letter_at(self.index) == self.letter
    }
}

/// Critic waiting for the player to guess a secret word.
#[derive(Clone, Debug, PartialEq)]
pub struct Critic {
    id: OccupantId,
    seed: u64,
    index: SlotIndex,
    secret: Word,
    guesses: Vec<Word>,
    patience: u32,
}

impl Critic {
    /// Creates a critic that has not heard any guesses yet.
    #[must_use]
    pub fn new(id: OccupantId, seed: u64, index: SlotIndex, secret: Word, patience: u32) -> Self {
        Self {
            id,
            seed,
            index,
            secret,
            guesses: Vec::new(),
            patience,
        }
    }

    /// Word the critic is waiting for.
    #[must_use]
    pub const fn secret(&self) -> &Word {
        &self.secret
    }

    /// Guesses submitted while this critic has been seated, oldest first.
    #[must_use]
    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    /// Remembers a submitted guess.
    pub fn record_guess(&mut self, guess: Word) {
        self.guesses.push(guess);
    }

    /// Reports whether the guess matches the secret exactly.
    #[must_use]
    pub fn is_defeated_by(&self, guess: &Word) -> bool {
        self.secret == *guess
    }
}

/// Anyone seated in the shop.
#[derive(Clone, Debug, PartialEq)]
pub enum Occupant {
    /// Single-letter customer.
    Customer(Customer),
    /// Whole-word critic.
    Critic(Critic),
}

impl Occupant {
    /// Identifier of the occupant.
    #[must_use]
    pub const fn id(&self) -> OccupantId {
        match self {
            Self::Customer(customer) => customer.id,
            Self::Critic(critic) => critic.id,
        }
    }

    /// Seat held by the occupant.
    #[must_use]
    pub const fn index(&self) -> SlotIndex {
        match self {
            Self::Customer(customer) => customer.index,
            Self::Critic(critic) => critic.index,
        }
    }

    /// Seed presentation layers use to derive an avatar.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        match self {
            Self::Customer(customer) => customer.seed,
            Self::Critic(critic) => critic.seed,
        }
    }

    /// Turns left before the occupant walks out.
    #[must_use]
    pub const fn patience(&self) -> u32 {
        match self {
            Self::Customer(customer) => customer.patience,
            Self::Critic(critic) => critic.patience,
        }
    }

    /// Kind tag of the occupant.
    #[must_use]
    pub const fn kind(&self) -> OccupantKind {
        match self {
            Self::Customer(_) => OccupantKind::Customer,
            Self::Critic(_) => OccupantKind::Critic,
        }
    }

    /// Returns the critic when this occupant is one.
    #[must_use]
    pub const fn as_critic(&self) -> Option<&Critic> {
        match self {
            Self::Critic(critic) => Some(critic),
            Self::Customer(_) => None,
        }
    }

    /// Returns the critic mutably when this occupant is one.
    pub fn as_critic_mut(&mut self) -> Option<&mut Critic> {
        match self {
            Self::Critic(critic) => Some(critic),
            Self::Customer(_) => None,
        }
    }

    /// Returns the customer when this occupant is one.
    #[must_use]
    pub const fn as_customer(&self) -> Option<&Customer> {
        match self {
            Self::Customer(customer) => Some(customer),
            Self::Critic(_) => None,
        }
    }

    /// Spends one turn of patience. Customers also lower their offer by
    /// `reward_decay` when provided, never below zero.
    pub fn wait_one_turn(&mut self, reward_decay: Option<f64>) {
        match self {
            Self::Customer(customer) => {
                customer.patience = customer.patience.saturating_sub(1);
                if let Some(decay) = reward_decay {
                    customer.willing_price = round_cents(customer.willing_price - decay).max(0.0);
                }
            }
            Self::Critic(critic) => {
                critic.patience = critic.patience.saturating_sub(1);
            }
        }
    }
}

/// Discriminant of [`Occupant`] carried by events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantKind {
    /// Single-letter customer.
    Customer,
    /// Whole-word critic.
    Critic,
}

/// Keyboard feedback accumulated from guesses against the active critic.
///
/// Variants are ordered by strength so merging keeps the maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyHint {
    /// The letter does not occur in the secret.
    Absent,
    /// The letter occurs in the secret at another position.
    Present,
    /// The letter was placed at its secret position.
    Correct,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Appends a letter to the word being composed; ignored when full.
    TypeLetter {
        /// Letter to append.
        letter: Letter,
    },
    /// Removes the last composed letter.
    Backspace,
    /// Discards the composed letters.
    ClearBuffer,
    /// Buys the composed word and resolves the turn.
    SubmitWord,
    /// Passes the turn without buying anything.
    SkipTurn,
    /// Enables or disables the dictionary bypass used while debugging.
    SetDebugBypass {
        /// Whether unknown words are accepted.
        enabled: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The composed word changed.
    BufferChanged {
        /// Letters composed so far.
        letters: Vec<Letter>,
    },
    /// A submitted word was refused and the world left untouched.
    TurnRejected {
        /// Why the word was refused.
        reason: RejectReason,
    },
    /// A customer received their letter and paid.
    CustomerSatisfied {
        /// Identifier of the satisfied customer.
        id: OccupantId,
        /// Seat the customer occupied.
        index: SlotIndex,
        /// Amount paid.
        payment: f64,
    },
    /// A guess was added to the active critic's memory.
    GuessRecorded {
        /// Identifier of the critic.
        critic: OccupantId,
        /// Guess that was recorded.
        guess: Word,
    },
    /// The active critic's secret was guessed.
    CriticDefeated {
        /// Identifier of the defeated critic.
        id: OccupantId,
        /// Secret that was guessed.
        secret: Word,
        /// Patience bonus granted to all future occupants.
        patience_bonus: u32,
    },
    /// An occupant ran out of patience and left a review.
    OccupantDeparted {
        /// Identifier of the departed occupant.
        id: OccupantId,
        /// Seat the occupant held.
        index: SlotIndex,
        /// Kind of occupant that departed.
        kind: OccupantKind,
        /// Review left at the seat.
        review: String,
    },
    /// A seat was destroyed for the rest of the session.
    SeatRetired {
        /// Seat that can no longer be filled.
        index: SlotIndex,
    },
    /// A new occupant sat down.
    OccupantSeated {
        /// Identifier allocated to the occupant.
        id: OccupantId,
        /// Seat that was filled.
        index: SlotIndex,
        /// Kind of occupant that arrived.
        kind: OccupantKind,
    },
    /// The turn finished and the counter advanced.
    TurnEnded {
        /// Number of turns completed so far.
        turn: u64,
    },
    /// Every seat is gone; no further occupants will arrive.
    ShopClosed,
}

/// Reasons a submitted word may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RejectReason {
    /// The composed word is shorter than five letters.
    #[error("Word must be 5 letters")]
    WrongLength,
    /// The word is not in the dictionary.
    #[error("Unknown Word")]
    UnknownWord,
    /// The player cannot afford the letters.
    #[error("Too Expensive")]
    TooExpensive,
}

/// Summary of a resolved or skipped turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnReport {
    /// Occupants that left satisfied, including a defeated critic.
    pub happy_departed: Vec<OccupantId>,
    /// Occupants that left after running out of patience.
    pub unhappy_departed: Vec<OccupantId>,
    /// Amount spent on letters.
    pub cost: f64,
    /// Amount received from satisfied customers.
    pub revenue: f64,
    /// Whether the active critic was defeated.
    pub critic_defeated: bool,
    /// Turn counter after the turn ended.
    pub turn: u64,
}

/// Result of submitting a word.
pub type TurnOutcome = Result<TurnReport, RejectReason>;
