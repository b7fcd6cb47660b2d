//! Resolution of submitted and skipped turns.

use std::collections::BTreeSet;

use word_market_core::{
    Event, Letter, OccupantId, RejectReason, SlotIndex, TurnOutcome, TurnReport, Word,
};
use word_market_system_critic_deduction::{grade, merge_hints};

use crate::{turn_end, World};

#[derive(Clone, Copy, Debug)]
struct Sale {
    id: OccupantId,
    index: SlotIndex,
    payment: f64,
}

/// Validates the buffer and, when every gate passes, commits the purchase
/// and runs the end of the turn. A failed gate leaves the world untouched.
pub(crate) fn resolve(world: &mut World, out_events: &mut Vec<Event>) -> TurnOutcome {
    let word = Word::from_letters(&world.buffer).ok_or(RejectReason::WrongLength)?;
    if !world.debug_bypass && !world.collaborators.oracle.is_valid(&word) {
        return Err(RejectReason::UnknownWord);
    }
    let cost = world
        .ledger
        .as_ref()
        .map_or(0.0, |ledger| ledger.cost_of(word.letters()));
    if world
        .ledger
        .as_ref()
        .is_some_and(|ledger| cost > ledger.cash())
    {
        return Err(RejectReason::TooExpensive);
    }

    let sales: Vec<Sale> = world
        .occupants
        .iter()
        .filter_map(|seated| {
            let customer = seated.as_customer()?;
            customer.is_satisfied_by(&word).then(|| Sale {
                id: seated.id(),
                index: seated.index(),
                payment: customer.willing_price(),
            })
        })
        .collect();
    let revenue: f64 = sales.iter().map(|sale| sale.payment).sum();
    let used: BTreeSet<Letter> = word.letters().iter().copied().collect();
    if let Some(ledger) = world.ledger.as_mut() {
        ledger.settle(cost, revenue);
        ledger.inflate(word.letters());
    }
    tracing::debug!(%word, cost, revenue, matched = sales.len(), "bought word");

    let mut report = TurnReport {
        cost,
        revenue,
        ..TurnReport::default()
    };
    for sale in &sales {
        out_events.push(Event::CustomerSatisfied {
            id: sale.id,
            index: sale.index,
            payment: sale.payment,
        });
        report.happy_departed.push(sale.id);
    }
    world.customers_satisfied = world
        .customers_satisfied
        .saturating_add(sales.len() as u32);

    hear_guess(world, word, &mut report, out_events);
    world
        .occupants
        .retain(|seated| !sales.iter().any(|sale| sale.id == seated.id()));

    turn_end::run(world, &used, &mut report, out_events);
    clear_buffer(world, out_events);
    Ok(report)
}

/// Ends the turn without a purchase.
pub(crate) fn skip(world: &mut World, out_events: &mut Vec<Event>) -> TurnReport {
    let mut report = TurnReport::default();
    turn_end::run(world, &BTreeSet::new(), &mut report, out_events);
    clear_buffer(world, out_events);
    report
}

/// Lets the seated critic hear the guess. An exact match defeats the critic.
fn hear_guess(world: &mut World, word: Word, report: &mut TurnReport, out_events: &mut Vec<Event>) {
    let Some(seated) = world
        .occupants
        .iter_mut()
        .find(|seated| seated.as_critic().is_some())
    else {
        return;
    };
    let id = seated.id();
    let Some(critic) = seated.as_critic_mut() else {
        return;
    };

    critic.record_guess(word);
    out_events.push(Event::GuessRecorded {
        critic: id,
        guess: word,
    });
    if !critic.is_defeated_by(&word) {
        let grades = grade(&word, critic.secret());
        merge_hints(&mut world.keyboard, &word, &grades);
        return;
    }

    let secret = *critic.secret();
    world.occupants.retain(|seated| seated.id() != id);
    world.keyboard.clear();
    world.patience_bonus = world.patience_bonus.saturating_add(1);
    world.critics_defeated = world.critics_defeated.saturating_add(1);
    tracing::info!(%secret, bonus = world.patience_bonus, "critic defeated");

    out_events.push(Event::CriticDefeated {
        id,
        secret,
        patience_bonus: world.patience_bonus,
    });
    report.happy_departed.push(id);
    report.critic_defeated = true;
}

fn clear_buffer(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.buffer.is_empty() {
        world.buffer.clear();
        out_events.push(Event::BufferChanged {
            letters: Vec::new(),
        });
    }
}
