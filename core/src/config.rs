//! Static parameter table supplied when a game is created.
//!
//! Every section implements [`Default`] and is annotated with
//! `#[serde(default)]`, so a configuration file only needs to name the values
//! it changes. [`GameConfig::validate`] rejects tables the engine cannot run
//! safely; those failures are fatal at startup.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::{Letter, SlotIndex, SLOT_COUNT};

/// Multiset of letters expressed as a count per letter.
pub type LetterCounts = BTreeMap<Letter, u32>;

const SCRABBLE_DISTRIBUTION: [(char, u32); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

/// Complete parameter table for one game session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seat count and retirement policy.
    pub seats: SeatConfig,
    /// Cash, letter prices, and rewards.
    pub economy: EconomyConfig,
    /// Starting patience of new occupants.
    pub patience: PatienceConfig,
    /// Strategy deciding when critics arrive.
    pub critics: CriticPolicy,
    /// Tile bag distributions and positional bans.
    pub tiles: TileConfig,
    /// Accept words missing from the dictionary.
    pub debug_bypass: bool,
}

impl GameConfig {
    /// Checks the table for inconsistencies that would stall or corrupt a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.starting > SLOT_COUNT {
            return Err(ConfigError::SeatsOutOfRange {
                requested: self.seats.starting,
            });
        }

        if self.patience.customer == 0 || self.patience.critic == 0 {
            return Err(ConfigError::ZeroPatience);
        }

        self.economy.validate()?;
        self.validate_critics()?;
        self.tiles.validate()
    }

    fn validate_critics(&self) -> Result<(), ConfigError> {
        match &self.critics {
            CriticPolicy::Disabled => Ok(()),
            CriticPolicy::Threshold { thresholds } => {
                if !self.economy.enabled {
                    return Err(ConfigError::ThresholdsNeedEconomy);
                }
                let increasing = thresholds.windows(2).all(|pair| pair[0] < pair[1]);
                if !increasing || thresholds.iter().any(|value| !value.is_finite()) {
                    return Err(ConfigError::ThresholdsNotIncreasing);
                }
                Ok(())
            }
            CriticPolicy::Count { period, .. } => {
                if *period == 0 {
                    Err(ConfigError::ZeroCountPeriod)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Reports whether the configuration can ever seat a critic.
    #[must_use]
    pub fn critics_enabled(&self) -> bool {
        !matches!(self.critics, CriticPolicy::Disabled)
    }
}

/// Seat count and what happens to a seat when its occupant storms out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeatConfig {
    /// Number of usable seats when the game starts.
    pub starting: usize,
    /// Policy applied when an occupant runs out of patience.
    pub retirement: SeatRetirement,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            starting: SLOT_COUNT,
            retirement: SeatRetirement::Permanent,
        }
    }
}

/// Seat retirement policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatRetirement {
    /// The seat index is broken and never refilled.
    #[default]
    Permanent,
    /// One fewer seat is usable, but any free index may be refilled.
    Shrinking,
}

/// Prices, cash, and customer rewards.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Whether cash and prices are tracked at all.
    pub enabled: bool,
    /// Cash available on the first turn.
    pub start_cash: f64,
    /// Price of every letter on the first turn.
    pub starting_letter_cost: f64,
    /// Multiplier applied to each letter used in a purchase.
    pub inflation_factor: f64,
    /// Multiplier applied to each letter left unused in a turn.
    pub deflation_factor: f64,
    /// Lowest price any letter can reach.
    pub min_letter_cost: f64,
    /// Amount a new customer offers.
    pub base_reward: f64,
    /// Amount a customer's offer drops each turn they wait.
    pub reward_decay: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_cash: 100.0,
            starting_letter_cost: 1.0,
            inflation_factor: 1.2,
            deflation_factor: 0.9,
            min_letter_cost: 0.5,
            base_reward: 2.5,
            reward_decay: 0.5,
        }
    }
}

impl EconomyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        for (name, value) in [
            ("inflation_factor", self.inflation_factor),
            ("deflation_factor", self.deflation_factor),
            ("min_letter_cost", self.min_letter_cost),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveFactor { name });
            }
        }

        for (name, value) in [
            ("start_cash", self.start_cash),
            ("base_reward", self.base_reward),
            ("reward_decay", self.reward_decay),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeAmount { name });
            }
        }

        if self.starting_letter_cost < self.min_letter_cost {
            return Err(ConfigError::StartingCostBelowFloor);
        }
        Ok(())
    }
}

/// Starting patience for each occupant kind, before the critic bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatienceConfig {
    /// Turns a customer waits.
    pub customer: u32,
    /// Turns a critic waits.
    pub critic: u32,
}

impl Default for PatienceConfig {
    fn default() -> Self {
        Self {
            customer: 5,
            critic: 10,
        }
    }
}

/// Strategy deciding when a freed seat goes to a critic.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CriticPolicy {
    /// Critics never arrive.
    Disabled,
    /// A critic arrives each time lifetime earnings cross the next threshold.
    Threshold {
        /// Strictly increasing lifetime-cash thresholds, each used once.
        thresholds: Vec<f64>,
    },
    /// A critic arrives at chosen arrival ordinals.
    Count {
        /// Arrival ordinals (1-based) that bring a critic.
        #[serde(default)]
        spawn_at: Vec<u32>,
        /// Past this ordinal a critic arrives every `period` arrivals.
        #[serde(default = "default_count_ceiling")]
        ceiling: u32,
        /// Spacing between critics once past the ceiling.
        #[serde(default = "default_count_period")]
        period: u32,
    },
}

impl Default for CriticPolicy {
    fn default() -> Self {
        Self::Threshold {
            thresholds: vec![10.0, 30.0, 60.0, 100.0, 150.0, 250.0, 400.0],
        }
    }
}

fn default_count_ceiling() -> u32 {
    60
}

fn default_count_period() -> u32 {
    4
}

/// Whether each position draws from its own bag or all share one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagLayout {
    /// Five independent bags, one per position.
    #[default]
    PerPosition,
    /// A single bag shared by every position.
    Shared,
}

/// Distribution override for one position.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionalDistribution {
    /// Position the override applies to.
    pub slot: usize,
    /// Letter counts used to fill that position's bag.
    pub counts: LetterCounts,
}

/// Letters that may never be requested at a position.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exclusion {
    /// Position the ban applies to.
    pub slot: usize,
    /// Letters banned there.
    pub letters: Vec<Letter>,
}

/// Tile bag configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TileConfig {
    /// Bag layout.
    pub layout: BagLayout,
    /// Counts used for every bag without an override.
    pub distribution: LetterCounts,
    /// Per-position overrides; only meaningful for per-position bags.
    pub positional: Vec<PositionalDistribution>,
    /// Positional letter bans.
    pub exclusions: Vec<Exclusion>,
}

impl Default for TileConfig {
    fn default() -> Self {
        let distribution = SCRABBLE_DISTRIBUTION
            .iter()
            .filter_map(|(value, count)| Letter::from_char(*value).map(|letter| (letter, *count)))
            .collect();
        let exclusions = vec![Exclusion {
            slot: 4,
            letters: ['J', 'Q', 'V']
                .into_iter()
                .filter_map(Letter::from_char)
                .collect(),
        }];
        Self {
            layout: BagLayout::PerPosition,
            distribution,
            positional: Vec::new(),
            exclusions,
        }
    }
}

impl TileConfig {
    /// Letter counts that fill the bag serving `slot`.
    #[must_use]
    pub fn distribution_for(&self, slot: SlotIndex) -> &LetterCounts {
        if self.layout == BagLayout::Shared {
            return &self.distribution;
        }
        self.positional
            .iter()
            .rev()
            .find(|entry| entry.slot == slot.get())
            .map_or(&self.distribution, |entry| &entry.counts)
    }

    /// Letters banned at `slot`.
    pub fn banned_at(&self, slot: SlotIndex) -> impl Iterator<Item = Letter> + '_ {
        self.exclusions
            .iter()
            .filter(move |entry| entry.slot == slot.get())
            .flat_map(|entry| entry.letters.iter().copied())
    }

    /// Checks that every bag is non-empty and can always yield a legal letter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout == BagLayout::Shared && !self.positional.is_empty() {
            return Err(ConfigError::PositionalWithSharedBag);
        }

        let out_of_range = self
            .positional
            .iter()
            .map(|entry| entry.slot)
            .chain(self.exclusions.iter().map(|entry| entry.slot))
            .find(|slot| SlotIndex::new(*slot).is_none());
        if let Some(slot) = out_of_range {
            return Err(ConfigError::SlotOutOfRange { slot });
        }

        for slot in SlotIndex::all() {
            let counts = self.distribution_for(slot);
            if counts.values().all(|count| *count == 0) {
                return Err(ConfigError::EmptyDistribution { slot: slot.get() });
            }

            let banned: Vec<Letter> = self.banned_at(slot).collect();
            let drawable = counts
                .iter()
                .any(|(letter, count)| *count > 0 && !banned.contains(letter));
            if !drawable {
                return Err(ConfigError::UnsatisfiableExclusion { slot: slot.get() });
            }
        }
        Ok(())
    }
}

/// Configuration inconsistencies detected before a game starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// More seats were requested than there are letter positions.
    #[error("{requested} starting seats requested but the shop has 5")]
    SeatsOutOfRange {
        /// Requested seat count.
        requested: usize,
    },
    /// An occupant kind would arrive with no patience at all.
    #[error("starting patience must be at least one turn")]
    ZeroPatience,
    /// A multiplicative price factor or floor is zero, negative, or not finite.
    #[error("economy.{name} must be a positive number")]
    NonPositiveFactor {
        /// Offending field.
        name: &'static str,
    },
    /// A cash amount is negative or not finite.
    #[error("economy.{name} must not be negative")]
    NegativeAmount {
        /// Offending field.
        name: &'static str,
    },
    /// Letters would start below the price floor.
    #[error("economy.starting_letter_cost is below economy.min_letter_cost")]
    StartingCostBelowFloor,
    /// Critic thresholds are not strictly increasing.
    #[error("critic thresholds must be finite and strictly increasing")]
    ThresholdsNotIncreasing,
    /// Threshold spawning relies on lifetime cash, which needs the economy.
    #[error("the threshold critic policy requires the economy to be enabled")]
    ThresholdsNeedEconomy,
    /// Count spawning past the ceiling needs a non-zero spacing.
    #[error("the count critic policy needs a period of at least one")]
    ZeroCountPeriod,
    /// Positional overrides were given for a shared bag.
    #[error("positional distributions require the per_position bag layout")]
    PositionalWithSharedBag,
    /// A positional entry names a slot outside the shop.
    #[error("slot {slot} is outside 0..5")]
    SlotOutOfRange {
        /// Offending slot.
        slot: usize,
    },
    /// A bag would be filled with no tiles.
    #[error("the tile bag for slot {slot} is empty")]
    EmptyDistribution {
        /// Slot served by the empty bag.
        slot: usize,
    },
    /// Every tile in a bag is banned at its position.
    #[error("every tile available to slot {slot} is banned there")]
    UnsatisfiableExclusion {
        /// Slot that could never be served.
        slot: usize,
    },
    /// Critics are enabled but there is no word to give them.
    #[error("critics are enabled but no secret words are available")]
    MissingCriticVocabulary,
}
