#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Customer and critic factory responsible for filling free seats.

use rand::Rng;
use word_market_core::{
    Critic, CriticPolicy, Customer, Event, GameConfig, Occupant, OccupantId, SecretWordSource,
    SlotIndex, SLOT_COUNT,
};
use word_market_system_tile_supply::TileSupply;

/// World facts the factory needs when deciding who sits down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnContext {
    /// Number of seats that may be occupied at once.
    pub max_slots: usize,
    /// Seats destroyed for the rest of the session.
    pub retired: [bool; SLOT_COUNT],
    /// Cash earned over the whole session.
    pub lifetime_cash: f64,
    /// Patience earned by defeating critics, added to every newcomer.
    pub patience_bonus: u32,
    /// Whether a critic may take one of the free seats.
    pub allow_critics: bool,
}

/// Factory that seats customers and critics according to the critic policy.
#[derive(Debug)]
pub struct Spawning {
    policy: CriticPolicy,
    customer_patience: u32,
    critic_patience: u32,
    reward: f64,
    next_threshold: usize,
    arrivals: u32,
    next_id: u32,
}

impl Spawning {
    /// Creates a factory using the supplied configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let reward = if config.economy.enabled {
            config.economy.base_reward
        } else {
            0.0
        };
        Self {
            policy: config.critics.clone(),
            customer_patience: config.patience.customer,
            critic_patience: config.patience.critic,
            reward,
            next_threshold: 0,
            arrivals: 0,
            next_id: 1,
        }
    }

    /// Number of occupants seated so far.
    #[must_use]
    pub const fn arrivals(&self) -> u32 {
        self.arrivals
    }

    /// Index of the next unused lifetime-cash threshold.
    #[must_use]
    pub const fn next_threshold_index(&self) -> usize {
        self.next_threshold
    }

    /// Fills every free, unretired seat in ascending order until the shop
    /// holds `max_slots` occupants, emitting an event for each arrival.
    pub fn fill_vacancies<R: Rng>(
        &mut self,
        occupants: &mut Vec<Occupant>,
        context: SpawnContext,
        tiles: &mut TileSupply,
        secrets: &dyn SecretWordSource,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) {
        for slot in SlotIndex::all() {
            if occupants.len() >= context.max_slots {
                break;
            }
            if context.retired[slot.get()] || occupants.iter().any(|seated| seated.index() == slot)
            {
                continue;
            }

            let critic = if context.allow_critics && self.critic_due(occupants, &context) {
                self.generate_critic(slot, &context, secrets, rng)
            } else {
                None
            };
            let occupant = match critic {
                Some(critic) => Some(critic),
                None => self.generate_customer(occupants, &context, slot, tiles, rng),
            };

            if let Some(occupant) = occupant {
                out.push(Event::OccupantSeated {
                    id: occupant.id(),
                    index: slot,
                    kind: occupant.kind(),
                });
                occupants.push(occupant);
            }
        }
        occupants.sort_by_key(Occupant::index);
    }

    /// Builds a customer for `slot`, or `None` when the shop is full.
    ///
    /// While a critic is seated the requested letter avoids the critic's
    /// secret letter at the same position, within the tile supply's bounded
    /// redraws.
    pub fn generate_customer<R: Rng>(
        &mut self,
        occupants: &[Occupant],
        context: &SpawnContext,
        slot: SlotIndex,
        tiles: &mut TileSupply,
        rng: &mut R,
    ) -> Option<Occupant> {
        if occupants.len() >= context.max_slots {
            return None;
        }

        let avoid = occupants
            .iter()
            .find_map(Occupant::as_critic)
            .map(|critic| critic.secret().letter_at(slot));
        let letter = tiles.draw_avoiding(slot, avoid, rng);
        let id = self.allocate_id();
        self.arrivals = self.arrivals.saturating_add(1);

        Some(Occupant::Customer(Customer::new(
            id,
            rng.gen(),
            slot,
            letter,
            self.reward,
            self.customer_patience.saturating_add(context.patience_bonus),
        )))
    }

    /// Builds a critic for `slot` with a fresh secret, or `None` when the
    /// secret source is empty.
    pub fn generate_critic<R: Rng>(
        &mut self,
        slot: SlotIndex,
        context: &SpawnContext,
        secrets: &dyn SecretWordSource,
        rng: &mut R,
    ) -> Option<Occupant> {
        let secret = secrets.draw_secret(rng)?;
        let id = self.allocate_id();
        self.arrivals = self.arrivals.saturating_add(1);

        Some(Occupant::Critic(Critic::new(
            id,
            rng.gen(),
            slot,
            secret,
            self.critic_patience.saturating_add(context.patience_bonus),
        )))
    }

    /// Decides whether the next arrival is a critic. A threshold that
    /// triggers is consumed.
    fn critic_due(&mut self, occupants: &[Occupant], context: &SpawnContext) -> bool {
        if occupants.iter().any(|seated| seated.as_critic().is_some()) {
            return false;
        }

        match &self.policy {
            CriticPolicy::Disabled => false,
            CriticPolicy::Threshold { thresholds } => {
                let Some(threshold) = thresholds.get(self.next_threshold) else {
                    return false;
                };
                if context.lifetime_cash >= *threshold {
                    self.next_threshold += 1;
                    true
                } else {
                    false
                }
            }
            CriticPolicy::Count {
                spawn_at,
                ceiling,
                period,
            } => {
                let ordinal = self.arrivals.saturating_add(1);
                spawn_at.contains(&ordinal)
                    || (*period > 0 && ordinal > *ceiling && (ordinal - *ceiling) % *period == 0)
            }
        }
    }

    fn allocate_id(&mut self) -> OccupantId {
        let id = OccupantId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}
