//! Cash balances and per-letter prices.

use std::collections::BTreeSet;

use word_market_core::{EconomyConfig, Letter};

const ALPHABET_LEN: usize = 26;

/// Cash and letter prices tracked while the economy is enabled.
#[derive(Clone, Debug)]
pub(crate) struct Ledger {
    cash: f64,
    lifetime: f64,
    prices: [f64; ALPHABET_LEN],
    inflation: f64,
    deflation: f64,
    floor: f64,
    reward_decay: f64,
}

impl Ledger {
    /// Opens a ledger, or returns `None` when the economy is disabled.
    pub(crate) fn open(config: &EconomyConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }

        Some(Self {
            cash: config.start_cash,
            lifetime: 0.0,
            prices: [config.starting_letter_cost; ALPHABET_LEN],
            inflation: config.inflation_factor,
            deflation: config.deflation_factor,
            floor: config.min_letter_cost,
            reward_decay: config.reward_decay,
        })
    }

    pub(crate) const fn cash(&self) -> f64 {
        self.cash
    }

    pub(crate) const fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub(crate) const fn reward_decay(&self) -> f64 {
        self.reward_decay
    }

    pub(crate) fn price(&self, letter: Letter) -> f64 {
        self.prices[letter.ordinal()]
    }

    /// Sums the price of every letter, counting repeats.
    pub(crate) fn cost_of(&self, letters: &[Letter]) -> f64 {
        letters.iter().map(|letter| self.price(*letter)).sum()
    }

    pub(crate) fn settle(&mut self, cost: f64, revenue: f64) {
        self.cash = self.cash - cost + revenue;
        self.lifetime += revenue;
    }

    /// Raises a letter's price once for every time it was bought.
    pub(crate) fn inflate(&mut self, letters: &[Letter]) {
        for letter in letters {
            let price = &mut self.prices[letter.ordinal()];
            *price = (*price * self.inflation).max(self.floor);
        }
    }

    /// Lowers the price of every letter that was not used, down to the floor.
    pub(crate) fn deflate_unused(&mut self, used: &BTreeSet<Letter>) {
        for letter in Letter::alphabet().filter(|letter| !used.contains(letter)) {
            let price = &mut self.prices[letter.ordinal()];
            *price = (*price * self.deflation).max(self.floor);
        }
    }
}
