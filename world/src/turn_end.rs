//! Bookkeeping shared by every turn, whether a word was bought or not.

use std::collections::BTreeSet;

use word_market_core::{Event, Letter, Occupant, SeatRetirement, TurnReport, FALLBACK_REVIEW};

use crate::{economy::Ledger, World};

/// Runs the end of the turn in its fixed order: deflation, patience decay,
/// departures, seat retirement, respawn, and the turn counter.
pub(crate) fn run(
    world: &mut World,
    used: &BTreeSet<Letter>,
    report: &mut TurnReport,
    out_events: &mut Vec<Event>,
) {
    if let Some(ledger) = world.ledger.as_mut() {
        ledger.deflate_unused(used);
    }

    let reward_decay = world.ledger.as_ref().map(Ledger::reward_decay);
    for seated in &mut world.occupants {
        seated.wait_one_turn(reward_decay);
    }

    let (departed, remaining): (Vec<Occupant>, Vec<Occupant>) = world
        .occupants
        .drain(..)
        .partition(|seated| seated.patience() == 0);
    world.occupants = remaining;
    for occupant in &departed {
        let review = review_for(world, occupant);
        tracing::info!(id = occupant.id().get(), seat = %occupant.index(), %review, "occupant walked out");
        out_events.push(Event::OccupantDeparted {
            id: occupant.id(),
            index: occupant.index(),
            kind: occupant.kind(),
            review: review.clone(),
        });
        world.reviews[occupant.index().get()] = Some(review);
        report.unhappy_departed.push(occupant.id());
    }

    retire_seats(world, &departed, out_events);
    respawn(world, out_events);

    world.turn = world.turn.saturating_add(1);
    report.turn = world.turn;
    out_events.push(Event::TurnEnded { turn: world.turn });
}

fn review_for(world: &mut World, occupant: &Occupant) -> String {
    match occupant {
        Occupant::Critic(critic) => {
            let review = format!("They wanted: {}", critic.secret());
            world.toast = Some(review.clone());
            world.keyboard.clear();
            review
        }
        Occupant::Customer(_) => world
            .collaborators
            .reviews
            .draw_review(&mut world.rng)
            .unwrap_or_else(|| FALLBACK_REVIEW.to_owned()),
    }
}

fn retire_seats(world: &mut World, departed: &[Occupant], out_events: &mut Vec<Event>) {
    if departed.is_empty() {
        return;
    }

    let was_open = world.max_slots > 0;
    match world.config.seats.retirement {
        SeatRetirement::Permanent => {
            for occupant in departed {
                world.retired[occupant.index().get()] = true;
                out_events.push(Event::SeatRetired {
                    index: occupant.index(),
                });
            }
            let broken = world.retired.iter().filter(|retired| **retired).count();
            world.max_slots = world.config.seats.starting.saturating_sub(broken);
        }
        SeatRetirement::Shrinking => {
            world.max_slots = world.max_slots.saturating_sub(departed.len());
        }
    }

    if was_open && world.max_slots == 0 {
        tracing::info!(turn = world.turn, "shop closed");
        out_events.push(Event::ShopClosed);
    }
}

fn respawn(world: &mut World, out_events: &mut Vec<Event>) {
    let context = world.spawn_context();
    let first_new = out_events.len();
    world.spawning.fill_vacancies(
        &mut world.occupants,
        context,
        &mut world.tiles,
        world.collaborators.secrets.as_ref(),
        &mut world.rng,
        out_events,
    );

    for event in &out_events[first_new..] {
        if let Event::OccupantSeated { id, index, kind } = event {
            tracing::debug!(id = id.get(), seat = %index, ?kind, "occupant seated");
            world.reviews[index.get()] = None;
        }
    }
}
