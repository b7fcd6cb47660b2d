use std::collections::BTreeMap;

use word_market_core::{
    Collaborators, Command, CriticPolicy, Event, GameConfig, Letter, LetterCounts, Occupant,
    OccupantId, PositionalDistribution, RejectReason, ReviewPool, SeatRetirement, SlotIndex,
    TileConfig, TurnOutcome, WordList,
};
use word_market_world::{self as world, query, World};

fn letter(value: char) -> Letter {
    Letter::from_char(value).expect("valid letter")
}

fn slot(value: usize) -> SlotIndex {
    SlotIndex::new(value).expect("valid slot")
}

/// Every seat wants `Z` except seat 2, which wants `I`.
fn scripted_tiles() -> TileConfig {
    TileConfig {
        distribution: LetterCounts::from([(letter('Z'), 1)]),
        positional: vec![PositionalDistribution {
            slot: 2,
            counts: LetterCounts::from([(letter('I'), 1)]),
        }],
        exclusions: Vec::new(),
        ..TileConfig::default()
    }
}

fn scripted_config() -> GameConfig {
    GameConfig {
        critics: CriticPolicy::Disabled,
        tiles: scripted_tiles(),
        ..GameConfig::default()
    }
}

fn new_world(config: GameConfig, reviews: &str) -> World {
    let collaborators = Collaborators::from_lists(
        WordList::parse("abide\nslate\ncrane\n"),
        WordList::default(),
        ReviewPool::parse(reviews),
    );
    World::new(config, collaborators, 0x5eed).expect("valid world")
}

fn type_word(world: &mut World, word: &str, events: &mut Vec<Event>) {
    for value in word.chars() {
        world::apply(
            world,
            Command::TypeLetter {
                letter: letter(value),
            },
            events,
        );
    }
}

fn submit(world: &mut World, word: &str) -> (TurnOutcome, Vec<Event>) {
    let mut events = Vec::new();
    type_word(world, word, &mut events);
    let outcome = world::process_turn(world, &mut events);
    (outcome, events)
}

fn patience_by_id(world: &World) -> BTreeMap<OccupantId, u32> {
    query::occupants(world)
        .iter()
        .map(|seated| (seated.id(), seated.patience()))
        .collect()
}

fn prices(world: &World) -> Vec<Option<f64>> {
    Letter::alphabet()
        .map(|value| query::letter_cost(world, value))
        .collect()
}

#[test]
fn buying_abide_pays_one_customer_and_moves_prices() {
    let mut config = scripted_config();
    config.economy.start_cash = 10.0;
    config.economy.starting_letter_cost = 1.0;
    config.economy.base_reward = 3.5;
    let mut world = new_world(config, "");

    let (outcome, events) = submit(&mut world, "ABIDE");
    let report = outcome.expect("word accepted");

    assert_eq!(report.cost, 5.0);
    assert_eq!(report.revenue, 3.5);
    assert_eq!(report.happy_departed.len(), 1);
    assert_eq!(query::cash(&world), Some(8.5));
    assert_eq!(query::lifetime_cash(&world), Some(3.5));
    assert_eq!(query::customers_satisfied(&world), 1);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::CustomerSatisfied { index, payment, .. } if *index == slot(2) && *payment == 3.5
    )));

    for value in Letter::alphabet() {
        let expected = if "ABIDE".contains(value.as_char()) {
            1.2
        } else {
            0.9
        };
        let cost = query::letter_cost(&world, value).expect("economy on");
        assert!(
            (cost - expected).abs() < 1e-9,
            "{value} costs {cost}, expected {expected}"
        );
    }
    assert!(query::buffer(&world).is_empty());
    assert_eq!(query::turn(&world), 1);
}

#[test]
fn repeated_letters_inflate_once_per_use() {
    let config = GameConfig {
        debug_bypass: true,
        ..scripted_config()
    };
    let mut world = new_world(config, "");

    let (outcome, _) = submit(&mut world, "LLAMA");
    assert_eq!(outcome.expect("bypass accepts any word").cost, 5.0);

    for (value, expected) in [('L', 1.44), ('A', 1.44), ('M', 1.2), ('B', 0.9)] {
        let cost = query::letter_cost(&world, letter(value)).expect("economy on");
        assert!(
            (cost - expected).abs() < 1e-9,
            "{value} costs {cost}, expected {expected}"
        );
    }
}

#[test]
fn rejected_words_leave_the_world_untouched() {
    let mut config = scripted_config();
    config.economy.start_cash = 4.0;
    let mut world = new_world(config, "");
    let occupants_before: Vec<Occupant> = query::occupants(&world).to_vec();
    let prices_before = prices(&world);

    let cases = [
        ("ABI", RejectReason::WrongLength),
        ("QQQQQ", RejectReason::UnknownWord),
        ("ABIDE", RejectReason::TooExpensive),
    ];
    for (word, expected) in cases {
        let (outcome, events) = submit(&mut world, word);
        assert_eq!(outcome, Err(expected));
        assert!(events.contains(&Event::TurnRejected { reason: expected }));
        assert_eq!(query::cash(&world), Some(4.0));
        assert_eq!(prices(&world), prices_before);
        assert_eq!(query::occupants(&world), occupants_before.as_slice());
        assert_eq!(query::turn(&world), 0);
        assert_eq!(query::buffer(&world).len(), word.len());

        let mut events = Vec::new();
        world::apply(&mut world, Command::ClearBuffer, &mut events);
    }
}

#[test]
fn rejection_messages_match_player_facing_text() {
    assert_eq!(RejectReason::WrongLength.to_string(), "Word must be 5 letters");
    assert_eq!(RejectReason::UnknownWord.to_string(), "Unknown Word");
    assert_eq!(RejectReason::TooExpensive.to_string(), "Too Expensive");
}

#[test]
fn debug_bypass_accepts_unknown_words() {
    let mut world = new_world(scripted_config(), "");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetDebugBypass { enabled: true },
        &mut events,
    );
    assert!(query::debug_bypass(&world));

    let (outcome, _) = submit(&mut world, "ZZZZZ");
    let report = outcome.expect("bypass accepts any five letters");
    assert_eq!(report.happy_departed.len(), 4);
    assert_eq!(report.revenue, 10.0);
}

#[test]
fn patience_drops_by_one_on_resolved_and_skipped_turns() {
    let mut world = new_world(scripted_config(), "");

    let before = patience_by_id(&world);
    let (outcome, _) = submit(&mut world, "SLATE");
    assert!(outcome.expect("word accepted").happy_departed.is_empty());
    for (id, patience) in patience_by_id(&world) {
        assert_eq!(patience + 1, before[&id]);
    }

    let before = patience_by_id(&world);
    let mut events = Vec::new();
    world::apply(&mut world, Command::SkipTurn, &mut events);
    for (id, patience) in patience_by_id(&world) {
        assert_eq!(patience + 1, before[&id]);
    }
    assert_eq!(query::turn(&world), 2);
    assert!(events.contains(&Event::TurnEnded { turn: 2 }));
}

#[test]
fn offers_decay_each_turn_without_going_negative() {
    let mut config = scripted_config();
    config.economy.base_reward = 0.75;
    let mut world = new_world(config, "");

    let mut events = Vec::new();
    world::apply(&mut world, Command::SkipTurn, &mut events);
    let offers: Vec<f64> = query::occupants(&world)
        .iter()
        .filter_map(Occupant::as_customer)
        .map(|customer| customer.willing_price())
        .collect();
    assert!(offers.iter().all(|offer| *offer == 0.25));

    world::apply(&mut world, Command::SkipTurn, &mut events);
    assert!(query::occupants(&world)
        .iter()
        .filter_map(Occupant::as_customer)
        .all(|customer| customer.willing_price() == 0.0));
}

#[test]
fn impatient_customers_retire_their_seats_permanently() {
    let mut config = scripted_config();
    config.patience.customer = 1;
    let mut world = new_world(config, "Too slow!\n");

    let mut events = Vec::new();
    let report = world::skip_turn(&mut world, &mut events).expect("skip never fails");

    assert_eq!(report.unhappy_departed.len(), 5);
    assert_eq!(query::max_slots(&world), 0);
    assert!(query::occupants(&world).is_empty());
    assert!(query::is_closed(&world));
    for position in SlotIndex::all() {
        assert!(query::is_retired(&world, position));
        assert_eq!(query::dead_slot_review(&world, position), Some("Too slow!"));
    }
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::SeatRetired { .. }))
            .count(),
        5
    );
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::ShopClosed))
            .count(),
        1
    );
}

#[test]
fn empty_review_pool_falls_back_to_walked_out() {
    let mut config = scripted_config();
    config.patience.customer = 1;
    let mut world = new_world(config, "");

    let mut events = Vec::new();
    let _ = world::skip_turn(&mut world, &mut events).expect("skip never fails");
    assert_eq!(query::dead_slot_review(&world, slot(3)), Some("Walked Out"));
}

/// Seat 2 walks out on the second turn while the other seats are kept busy.
fn lose_seat_two(retirement: SeatRetirement) -> World {
    let mut config = scripted_config();
    config.patience.customer = 2;
    config.seats.retirement = retirement;
    config.debug_bypass = true;
    let mut world = new_world(config, "");

    let (outcome, _) = submit(&mut world, "ZZZZZ");
    assert_eq!(outcome.expect("bypass").happy_departed.len(), 4);

    let mut events = Vec::new();
    let report = world::skip_turn(&mut world, &mut events).expect("skip never fails");
    assert_eq!(report.unhappy_departed.len(), 1);
    assert_eq!(query::max_slots(&world), 4);
    assert_eq!(query::dead_slot_review(&world, slot(2)), Some("Walked Out"));
    assert_eq!(query::occupants(&world).len(), 4);
    world
}

fn seats(world: &World) -> Vec<usize> {
    query::occupants(world)
        .iter()
        .map(|seated| seated.index().get())
        .collect()
}

#[test]
fn permanent_retirement_never_refills_the_seat() {
    let mut world = lose_seat_two(SeatRetirement::Permanent);
    assert!(query::is_retired(&world, slot(2)));

    let (outcome, _) = submit(&mut world, "ZZZZZ");
    assert_eq!(outcome.expect("bypass").happy_departed.len(), 4);
    assert_eq!(seats(&world), vec![0, 1, 3, 4]);
    assert_eq!(query::dead_slot_review(&world, slot(2)), Some("Walked Out"));
}

#[test]
fn shrinking_retirement_refills_lowest_seats_and_clears_review() {
    let mut world = lose_seat_two(SeatRetirement::Shrinking);
    assert!(!query::is_retired(&world, slot(2)));

    let (outcome, _) = submit(&mut world, "ZZZZZ");
    assert_eq!(outcome.expect("bypass").happy_departed.len(), 4);
    assert_eq!(seats(&world), vec![0, 1, 2, 3]);
    assert_eq!(query::dead_slot_review(&world, slot(2)), None);
    assert_eq!(query::max_slots(&world), 4);
}

#[test]
fn disabled_economy_tracks_no_money() {
    let mut config = scripted_config();
    config.economy.enabled = false;
    let mut world = new_world(config, "");

    assert_eq!(query::cash(&world), None);
    assert_eq!(query::letter_cost(&world, letter('A')), None);
    assert!(query::occupants(&world)
        .iter()
        .filter_map(Occupant::as_customer)
        .all(|customer| customer.willing_price() == 0.0));

    let (outcome, _) = submit(&mut world, "ABIDE");
    let report = outcome.expect("nothing is too expensive");
    assert_eq!(report.cost, 0.0);
    assert_eq!(report.happy_departed.len(), 1);
    assert_eq!(query::customers_satisfied(&world), 1);
}
