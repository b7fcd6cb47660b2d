#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Letter bags from which customer requests are drawn.
//!
//! Each position owns a bag filled from a static frequency table and shuffled
//! with Fisher-Yates. Drawing pops the last tile; an exhausted bag is refilled
//! from the table, so drawing never fails. Letters banned at a position are
//! held aside while drawing and returned to the bag afterwards, which keeps
//! the bag's composition intact.

use rand::{seq::SliceRandom, Rng};
use word_market_core::{BagLayout, ConfigError, Letter, SlotIndex, TileConfig, SLOT_COUNT};

/// Number of redraws attempted before accepting a letter that matches the
/// critic's secret at the same position.
pub const MAX_AVOIDANCE_REDRAWS: usize = 10;

#[derive(Clone, Debug)]
struct Bag {
    template: Vec<Letter>,
    tiles: Vec<Letter>,
}

impl Bag {
    fn new<R: Rng>(template: Vec<Letter>, rng: &mut R) -> Self {
        let mut bag = Self {
            tiles: Vec::with_capacity(template.len()),
            template,
        };
        bag.refill(rng);
        bag
    }

    fn refill<R: Rng>(&mut self, rng: &mut R) {
        self.tiles.extend_from_slice(&self.template);
        self.tiles.shuffle(rng);
    }

    fn pop<R: Rng>(&mut self, rng: &mut R) -> Letter {
        if self.tiles.is_empty() {
            self.refill(rng);
        }
        self.tiles
            .pop()
            .expect("bags refill from a validated non-empty distribution")
    }

    fn put_back<R: Rng>(&mut self, letters: &[Letter], rng: &mut R) {
        self.tiles.extend_from_slice(letters);
        self.tiles.shuffle(rng);
    }
}

/// Per-position letter bags with positional bans.
#[derive(Clone, Debug)]
pub struct TileSupply {
    layout: BagLayout,
    bags: Vec<Bag>,
    banned: [Vec<Letter>; SLOT_COUNT],
}

impl TileSupply {
    /// Fills and shuffles every bag described by the configuration.
    pub fn new<R: Rng>(config: &TileConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;

        let bag_count = match config.layout {
            BagLayout::PerPosition => SLOT_COUNT,
            BagLayout::Shared => 1,
        };
        let bags = SlotIndex::all()
            .take(bag_count)
            .map(|slot| Bag::new(expand(config, slot), rng))
            .collect();
        let banned = std::array::from_fn(|position| {
            SlotIndex::new(position)
                .map(|slot| config.banned_at(slot).collect())
                .unwrap_or_default()
        });

        Ok(Self {
            layout: config.layout,
            bags,
            banned,
        })
    }

    /// Draws the next tile for a position, ignoring bans.
    pub fn draw<R: Rng>(&mut self, slot: SlotIndex, rng: &mut R) -> Letter {
        self.bag_mut(slot).pop(rng)
    }

    /// Draws the next tile that is legal at the position.
    ///
    /// Banned tiles drawn along the way are returned to the bag, which is then
    /// reshuffled.
    pub fn draw_valid<R: Rng>(&mut self, slot: SlotIndex, rng: &mut R) -> Letter {
        let mut held = Vec::new();
        loop {
            let letter = self.draw(slot, rng);
            if self.is_banned(slot, letter) {
                held.push(letter);
                continue;
            }

            if !held.is_empty() {
                self.bag_mut(slot).put_back(&held, rng);
            }
            return letter;
        }
    }

    /// Draws a legal tile that differs from `avoid` when possible.
    ///
    /// A rejected tile goes back into the bag before each redraw. After
    /// [`MAX_AVOIDANCE_REDRAWS`] redraws the last tile is accepted as-is.
    pub fn draw_avoiding<R: Rng>(
        &mut self,
        slot: SlotIndex,
        avoid: Option<Letter>,
        rng: &mut R,
    ) -> Letter {
        let mut letter = self.draw_valid(slot, rng);
        let Some(avoid) = avoid else {
            return letter;
        };

        let mut redraws = 0;
        while letter == avoid && redraws < MAX_AVOIDANCE_REDRAWS {
            self.return_tile(slot, letter, rng);
            letter = self.draw_valid(slot, rng);
            redraws += 1;
        }
        letter
    }

    /// Puts a tile back into the bag serving the position and reshuffles it.
    pub fn return_tile<R: Rng>(&mut self, slot: SlotIndex, letter: Letter, rng: &mut R) {
        self.bag_mut(slot).put_back(&[letter], rng);
    }

    /// Reports whether the letter is banned at the position.
    #[must_use]
    pub fn is_banned(&self, slot: SlotIndex, letter: Letter) -> bool {
        self.banned[slot.get()].contains(&letter)
    }

    /// Number of tiles left in the bag serving the position.
    #[must_use]
    pub fn remaining(&self, slot: SlotIndex) -> usize {
        self.bags[self.bag_position(slot)].tiles.len()
    }

    /// Bag layout in use.
    #[must_use]
    pub const fn layout(&self) -> BagLayout {
        self.layout
    }

    fn bag_position(&self, slot: SlotIndex) -> usize {
        match self.layout {
            BagLayout::PerPosition => slot.get(),
            BagLayout::Shared => 0,
        }
    }

    fn bag_mut(&mut self, slot: SlotIndex) -> &mut Bag {
        let position = self.bag_position(slot);
        &mut self.bags[position]
    }
}

fn expand(config: &TileConfig, slot: SlotIndex) -> Vec<Letter> {
    config
        .distribution_for(slot)
        .iter()
        .flat_map(|(letter, count)| std::iter::repeat(*letter).take(*count as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use word_market_core::{LetterCounts, PositionalDistribution};

    use super::*;

    fn letter(value: char) -> Letter {
        Letter::from_char(value).expect("valid letter")
    }

    fn slot(value: usize) -> SlotIndex {
        SlotIndex::new(value).expect("valid slot")
    }

    #[test]
    fn bag_refills_after_exhaustion() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = TileConfig {
            distribution: LetterCounts::from([(letter('A'), 2), (letter('B'), 1)]),
            exclusions: Vec::new(),
            ..TileConfig::default()
        };
        let mut supply = TileSupply::new(&config, &mut rng).expect("valid tiles");

        let mut first_cycle: Vec<Letter> = (0..3).map(|_| supply.draw(slot(0), &mut rng)).collect();
        first_cycle.sort();
        assert_eq!(first_cycle, vec![letter('A'), letter('A'), letter('B')]);
        assert_eq!(supply.remaining(slot(0)), 0);

        let _ = supply.draw(slot(0), &mut rng);
        assert_eq!(supply.remaining(slot(0)), 2);
    }

    #[test]
    fn shared_layout_serves_every_slot_from_one_bag() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let config = TileConfig {
            layout: BagLayout::Shared,
            exclusions: Vec::new(),
            ..TileConfig::default()
        };
        let mut supply = TileSupply::new(&config, &mut rng).expect("valid tiles");
        let _ = supply.draw(slot(0), &mut rng);
        let _ = supply.draw(slot(4), &mut rng);
        assert_eq!(supply.remaining(slot(2)), 96);
    }

    #[test]
    fn held_tiles_return_to_the_bag() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = TileConfig {
            positional: vec![PositionalDistribution {
                slot: 1,
                counts: LetterCounts::from([(letter('Q'), 4), (letter('E'), 1)]),
            }],
            exclusions: vec![word_market_core::Exclusion {
                slot: 1,
                letters: vec![letter('Q')],
            }],
            ..TileConfig::default()
        };
        let mut supply = TileSupply::new(&config, &mut rng).expect("valid tiles");

        assert_eq!(supply.draw_valid(slot(1), &mut rng), letter('E'));
        assert_eq!(supply.remaining(slot(1)), 4, "banned tiles stay in the bag");
    }

    #[test]
    fn avoidance_gives_up_after_bounded_redraws() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let config = TileConfig {
            positional: vec![PositionalDistribution {
                slot: 0,
                counts: LetterCounts::from([(letter('S'), 3)]),
            }],
            exclusions: Vec::new(),
            ..TileConfig::default()
        };
        let mut supply = TileSupply::new(&config, &mut rng).expect("valid tiles");
        assert_eq!(
            supply.draw_avoiding(slot(0), Some(letter('S')), &mut rng),
            letter('S')
        );
        assert_eq!(supply.remaining(slot(0)), 2);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = TileConfig {
            distribution: LetterCounts::new(),
            ..TileConfig::default()
        };
        assert!(matches!(
            TileSupply::new(&config, &mut rng),
            Err(ConfigError::EmptyDistribution { slot: 0 })
        ));
    }
}
