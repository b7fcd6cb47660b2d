#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Word Market.
//!
//! The world owns every piece of mutable game state. Adapters mutate it only
//! through [`apply`], [`process_turn`], and [`skip_turn`], and observe it
//! through the read-only functions in [`query`].

mod economy;
mod turn;
mod turn_end;

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use word_market_core::{
    Collaborators, Command, ConfigError, Event, GameConfig, KeyHint, Letter, Occupant,
    TurnOutcome, SLOT_COUNT, WORD_LENGTH,
};
use word_market_system_spawning::{SpawnContext, Spawning};
use word_market_system_tile_supply::TileSupply;

use crate::economy::Ledger;

/// Represents the authoritative Word Market world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    collaborators: Collaborators,
    rng: ChaCha8Rng,
    tiles: TileSupply,
    spawning: Spawning,
    ledger: Option<Ledger>,
    occupants: Vec<Occupant>,
    max_slots: usize,
    retired: [bool; SLOT_COUNT],
    reviews: [Option<String>; SLOT_COUNT],
    buffer: Vec<Letter>,
    keyboard: BTreeMap<Letter, KeyHint>,
    toast: Option<String>,
    patience_bonus: u32,
    turn: u64,
    customers_satisfied: u32,
    critics_defeated: u32,
    debug_bypass: bool,
    opening: Vec<Event>,
}

impl World {
    /// Starts a new game: validates the configuration, fills the tile bags,
    /// and seats the opening customers.
    ///
    /// Every random decision of the session is derived from `seed`.
    pub fn new(
        config: GameConfig,
        collaborators: Collaborators,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.critics_enabled() && collaborators.secrets.is_empty() {
            return Err(ConfigError::MissingCriticVocabulary);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tiles = TileSupply::new(&config.tiles, &mut rng)?;
        let spawning = Spawning::new(&config);
        let ledger = Ledger::open(&config.economy);

        let mut world = Self {
            max_slots: config.seats.starting,
            debug_bypass: config.debug_bypass,
            config,
            collaborators,
            rng,
            tiles,
            spawning,
            ledger,
            occupants: Vec::with_capacity(SLOT_COUNT),
            retired: [false; SLOT_COUNT],
            reviews: Default::default(),
            buffer: Vec::with_capacity(WORD_LENGTH),
            keyboard: BTreeMap::new(),
            toast: None,
            patience_bonus: 0,
            turn: 0,
            customers_satisfied: 0,
            critics_defeated: 0,
            opening: Vec::with_capacity(SLOT_COUNT),
        };

        let context = SpawnContext {
            allow_critics: false,
            ..world.spawn_context()
        };
        world.spawning.fill_vacancies(
            &mut world.occupants,
            context,
            &mut world.tiles,
            world.collaborators.secrets.as_ref(),
            &mut world.rng,
            &mut world.opening,
        );
        tracing::debug!(seated = world.occupants.len(), seed, "opened shop");

        Ok(world)
    }

    /// Seating events for the opening customers, in seat order.
    pub fn opening_events(&self) -> &[Event] {
        &self.opening
    }

    /// Removes and returns the pending one-shot notification.
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    fn spawn_context(&self) -> SpawnContext {
        SpawnContext {
            max_slots: self.max_slots,
            retired: self.retired,
            lifetime_cash: self.ledger.as_ref().map_or(0.0, Ledger::lifetime),
            patience_bonus: self.patience_bonus,
            allow_critics: true,
        }
    }

    fn emit_buffer(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::BufferChanged {
            letters: self.buffer.clone(),
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::TypeLetter { letter } => {
            if world.buffer.len() < WORD_LENGTH {
                world.buffer.push(letter);
                world.emit_buffer(out_events);
            }
        }
        Command::Backspace => {
            if world.buffer.pop().is_some() {
                world.emit_buffer(out_events);
            }
        }
        Command::ClearBuffer => {
            if !world.buffer.is_empty() {
                world.buffer.clear();
                world.emit_buffer(out_events);
            }
        }
        Command::SubmitWord => {
            let _ = process_turn(world, out_events);
        }
        Command::SkipTurn => {
            let _ = skip_turn(world, out_events);
        }
        Command::SetDebugBypass { enabled } => {
            world.debug_bypass = enabled;
        }
    }
}

/// Buys the composed word and resolves the turn.
///
/// A refused word leaves the world untouched and is also broadcast as
/// [`Event::TurnRejected`].
pub fn process_turn(world: &mut World, out_events: &mut Vec<Event>) -> TurnOutcome {
    let outcome = turn::resolve(world, out_events);
    if let Err(reason) = &outcome {
        tracing::debug!(%reason, "rejected word");
        out_events.push(Event::TurnRejected { reason: *reason });
    }
    outcome
}

/// Passes the turn without buying anything.
pub fn skip_turn(world: &mut World, out_events: &mut Vec<Event>) -> TurnOutcome {
    Ok(turn::skip(world, out_events))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeMap;

    use word_market_core::{Critic, KeyHint, Letter, Occupant, SlotIndex};

    use super::World;

    /// Cash on hand, or `None` when the economy is disabled.
    #[must_use]
    pub fn cash(world: &World) -> Option<f64> {
        world.ledger.as_ref().map(|ledger| ledger.cash())
    }

    /// Revenue earned over the whole session, or `None` without an economy.
    #[must_use]
    pub fn lifetime_cash(world: &World) -> Option<f64> {
        world.ledger.as_ref().map(|ledger| ledger.lifetime())
    }

    /// Current price of a letter, or `None` without an economy.
    #[must_use]
    pub fn letter_cost(world: &World, letter: Letter) -> Option<f64> {
        world.ledger.as_ref().map(|ledger| ledger.price(letter))
    }

    /// Seated occupants ordered by seat.
    #[must_use]
    pub fn occupants(world: &World) -> &[Occupant] {
        &world.occupants
    }

    /// The seated critic, if any.
    #[must_use]
    pub fn active_critic(world: &World) -> Option<&Critic> {
        world.occupants.iter().find_map(Occupant::as_critic)
    }

    /// Number of seats that may currently be occupied.
    #[must_use]
    pub fn max_slots(world: &World) -> usize {
        world.max_slots
    }

    /// Reports whether the seat has been destroyed for good.
    #[must_use]
    pub fn is_retired(world: &World, slot: SlotIndex) -> bool {
        world.retired[slot.get()]
    }

    /// Review left at a seat by the last occupant who walked out of it.
    #[must_use]
    pub fn dead_slot_review(world: &World, slot: SlotIndex) -> Option<&str> {
        world.reviews[slot.get()].as_deref()
    }

    /// Keyboard feedback gathered against the current critic.
    #[must_use]
    pub fn keyboard_hints(world: &World) -> &BTreeMap<Letter, KeyHint> {
        &world.keyboard
    }

    /// Letters composed so far.
    #[must_use]
    pub fn buffer(world: &World) -> &[Letter] {
        &world.buffer
    }

    /// Number of turns completed.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Patience added to every newcomer for critics defeated so far.
    #[must_use]
    pub fn patience_bonus(world: &World) -> u32 {
        world.patience_bonus
    }

    /// Number of customers that received their letter.
    #[must_use]
    pub fn customers_satisfied(world: &World) -> u32 {
        world.customers_satisfied
    }

    /// Number of critics whose secret was guessed.
    #[must_use]
    pub fn critics_defeated(world: &World) -> u32 {
        world.critics_defeated
    }

    /// Reports whether unknown words are currently accepted.
    #[must_use]
    pub fn debug_bypass(world: &World) -> bool {
        world.debug_bypass
    }

    /// Reports whether every seat is gone.
    #[must_use]
    pub fn is_closed(world: &World) -> bool {
        world.max_slots == 0
    }

    /// Preview of what submitting `letters` would cost and earn.
    ///
    /// Works for partial words; customers whose seat lies beyond the typed
    /// letters are not counted.
    #[must_use]
    pub fn prediction(world: &World, letters: &[Letter]) -> Prediction {
        let Some(ledger) = world.ledger.as_ref() else {
            return Prediction::default();
        };

        let cost = ledger.cost_of(letters);
        let income: f64 = world
            .occupants
            .iter()
            .filter_map(|seated| {
                let customer = seated.as_customer()?;
                let typed = letters.get(seated.index().get())?;
                (*typed == customer.letter()).then(|| customer.willing_price())
            })
            .sum();

        Prediction {
            cost,
            income,
            profit: income - cost,
        }
    }

    /// Projected effect of a purchase.
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Prediction {
        /// Price of the letters.
        pub cost: f64,
        /// Payment from the customers the letters would satisfy.
        pub income: f64,
        /// Income minus cost.
        pub profit: f64,
    }
}
