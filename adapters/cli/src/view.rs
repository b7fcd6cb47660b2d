//! Plain-text rendering of the shop.

use word_market_core::{Event, KeyHint, Letter, Occupant, OccupantKind, SlotIndex};
use word_market_system_critic_deduction::{dead_letters, deduce, SlotStatus};
use word_market_world::{query, World};

/// Renders the whole shop as lines of text.
pub(crate) fn render(world: &World) -> Vec<String> {
    let mut lines = Vec::new();
    let mut header = format!("Turn {}", query::turn(world));
    if let Some(cash) = query::cash(world) {
        header.push_str(&format!("  Cash ${cash:.2}"));
    }
    if query::patience_bonus(world) > 0 {
        header.push_str(&format!("  Patience +{}", query::patience_bonus(world)));
    }
    if query::debug_bypass(world) {
        header.push_str("  [debug]");
    }
    lines.push(header);

    for slot in SlotIndex::all() {
        lines.push(seat_line(world, slot));
    }

    if let Some(critic) = query::active_critic(world) {
        let board: Vec<String> = deduce(critic)
            .iter()
            .map(|status| match status {
                SlotStatus::Solved(letter) => letter.to_string(),
                SlotStatus::Unsolved { pencil_marks } if pencil_marks.is_empty() => "_".to_owned(),
                SlotStatus::Unsolved { pencil_marks } => format!("({})", join(pencil_marks)),
            })
            .collect();
        lines.push(format!("Critic board: {}", board.join(" ")));
        let dead = dead_letters(critic);
        if !dead.is_empty() {
            lines.push(format!("Not in the word: {}", join(&dead)));
        }
        lines.push(hints_line(world));
    }

    if query::cash(world).is_some() {
        let prices: Vec<String> = Letter::alphabet()
            .filter_map(|letter| {
                query::letter_cost(world, letter).map(|cost| format!("{letter}{cost:.2}"))
            })
            .collect();
        lines.push(format!("Prices: {}", prices.join(" ")));
    }
    lines
}

/// One-line preview of buying `letters`.
pub(crate) fn preview(world: &World, letters: &[Letter]) -> String {
    let prediction = query::prediction(world, letters);
    format!(
        "Cost ${:.2}  Income ${:.2}  Profit ${:.2}",
        prediction.cost, prediction.income, prediction.profit
    )
}

/// Messages worth showing for the events of one input line.
pub(crate) fn describe(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TurnRejected { reason } => Some(reason.to_string()),
            Event::CustomerSatisfied { index, payment, .. } => {
                Some(format!("Seat {index} paid ${payment:.2}"))
            }
            Event::CriticDefeated {
                secret,
                patience_bonus,
                ..
            } => Some(format!(
                "Critic defeated with {secret}! Newcomers now have +{patience_bonus} patience."
            )),
            Event::OccupantDeparted {
                index,
                kind: OccupantKind::Customer,
                review,
                ..
            } => Some(format!("Seat {index} walked out: \"{review}\"")),
            Event::SeatRetired { index } => Some(format!("Seat {index} is closed for good.")),
            Event::ShopClosed => Some("Every seat is gone.".to_owned()),
            _ => None,
        })
        .collect()
}

fn seat_line(world: &World, slot: SlotIndex) -> String {
    let occupant = query::occupants(world)
        .iter()
        .find(|seated| seated.index() == slot);
    match occupant {
        Some(Occupant::Customer(customer)) => format!(
            "[{slot}] wants {} for ${:.2} (patience {})",
            customer.letter(),
            customer.willing_price(),
            occupant.map_or(0, Occupant::patience)
        ),
        Some(Occupant::Critic(_)) => format!(
            "[{slot}] CRITIC (patience {})",
            occupant.map_or(0, Occupant::patience)
        ),
        None if query::is_retired(world, slot) => format!(
            "[{slot}] closed: \"{}\"",
            query::dead_slot_review(world, slot).unwrap_or_default()
        ),
        None => match query::dead_slot_review(world, slot) {
            Some(review) => format!("[{slot}] empty: \"{review}\""),
            None => format!("[{slot}] empty"),
        },
    }
}

fn hints_line(world: &World) -> String {
    let hints = query::keyboard_hints(world);
    let group = |wanted: KeyHint| -> String {
        hints
            .iter()
            .filter(|(_, hint)| **hint == wanted)
            .map(|(letter, _)| letter.to_string())
            .collect()
    };
    format!(
        "Keys: correct {} | present {} | absent {}",
        group(KeyHint::Correct),
        group(KeyHint::Present),
        group(KeyHint::Absent)
    )
}

fn join<'a>(letters: impl IntoIterator<Item = &'a Letter>) -> String {
    letters.into_iter().map(Letter::to_string).collect()
}
