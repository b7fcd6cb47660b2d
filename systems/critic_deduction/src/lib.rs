#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure projections of a critic's guess history.
//!
//! Nothing here is stored. Presentation code calls [`deduce`] and
//! [`dead_letters`] whenever it renders a critic, and the world calls
//! [`grade`] and [`merge_hints`] to maintain the keyboard hints.

use std::collections::{BTreeMap, BTreeSet};

use word_market_core::{Critic, KeyHint, Letter, SlotIndex, Word, WORD_LENGTH};

/// What the player has learned about one position of a critic's secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    /// A past guess placed the secret's letter at this position.
    Solved(Letter),
    /// The position is still open.
    Unsolved {
        /// Secret letters already seen in a guess but never tried here.
        pencil_marks: BTreeSet<Letter>,
    },
}

impl SlotStatus {
    /// Returns the solved letter, if any.
    #[must_use]
    pub const fn solved(&self) -> Option<Letter> {
        match self {
            Self::Solved(letter) => Some(*letter),
            Self::Unsolved { .. } => None,
        }
    }
}

/// Derives the solved letters and pencil marks for every position.
#[must_use]
pub fn deduce(critic: &Critic) -> [SlotStatus; WORD_LENGTH] {
    let secret = critic.secret();
    let guesses = critic.guesses();
    let discovered: BTreeSet<Letter> = guesses
        .iter()
        .flat_map(|guess| guess.letters().iter().copied())
        .filter(|letter| secret.contains(*letter))
        .collect();

    std::array::from_fn(|position| {
        let target = secret.letters()[position];
        let mut tried = guesses.iter().map(|guess| guess.letters()[position]);
        if tried.any(|letter| letter == target) {
            return SlotStatus::Solved(target);
        }

        let tried_here: BTreeSet<Letter> = guesses
            .iter()
            .map(|guess| guess.letters()[position])
            .collect();
        SlotStatus::Unsolved {
            pencil_marks: discovered.difference(&tried_here).copied().collect(),
        }
    })
}

/// Letters guessed at least once that appear nowhere in the secret.
#[must_use]
pub fn dead_letters(critic: &Critic) -> BTreeSet<Letter> {
    let secret = critic.secret();
    critic
        .guesses()
        .iter()
        .flat_map(|guess| guess.letters().iter().copied())
        .filter(|letter| !secret.contains(*letter))
        .collect()
}

/// Grades a guess against a secret, honouring repeated letters.
///
/// Exact positions are matched first. Remaining guess letters are then
/// marked present only while unmatched copies remain in the secret.
#[must_use]
pub fn grade(guess: &Word, secret: &Word) -> [KeyHint; WORD_LENGTH] {
    let mut grades = [KeyHint::Absent; WORD_LENGTH];
    let mut unmatched = [0u8; 26];

    for slot in SlotIndex::all() {
        let position = slot.get();
        let wanted = secret.letter_at(slot);
        if guess.letter_at(slot) == wanted {
            grades[position] = KeyHint::Correct;
        } else {
            unmatched[wanted.ordinal()] += 1;
        }
    }

    for slot in SlotIndex::all() {
        let position = slot.get();
        if grades[position] == KeyHint::Correct {
            continue;
        }
        let remaining = &mut unmatched[guess.letter_at(slot).ordinal()];
        if *remaining > 0 {
            *remaining -= 1;
            grades[position] = KeyHint::Present;
        }
    }

    grades
}

/// Folds graded letters into the keyboard, keeping the strongest hint seen
/// for each letter.
pub fn merge_hints(
    keyboard: &mut BTreeMap<Letter, KeyHint>,
    guess: &Word,
    grades: &[KeyHint; WORD_LENGTH],
) {
    for (letter, hint) in guess.letters().iter().zip(grades) {
        let entry = keyboard.entry(*letter).or_insert(*hint);
        if *hint > *entry {
            *entry = *hint;
        }
    }
}
