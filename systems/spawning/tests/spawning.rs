use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use word_market_core::{
    CriticPolicy, Event, GameConfig, Letter, LetterCounts, Occupant, OccupantKind,
    PositionalDistribution, SlotIndex, Word, WordList, SLOT_COUNT,
};
use word_market_system_spawning::{SpawnContext, Spawning};
use word_market_system_tile_supply::TileSupply;

fn letter(value: char) -> Letter {
    Letter::from_char(value).expect("valid letter")
}

fn slot(value: usize) -> SlotIndex {
    SlotIndex::new(value).expect("valid slot")
}

fn open_shop() -> SpawnContext {
    SpawnContext {
        max_slots: SLOT_COUNT,
        retired: [false; SLOT_COUNT],
        lifetime_cash: 0.0,
        patience_bonus: 0,
        allow_critics: true,
    }
}

fn secrets() -> WordList {
    WordList::parse("scowl\n")
}

#[test]
fn fills_free_seats_in_ascending_order() {
    let config = GameConfig {
        critics: CriticPolicy::Disabled,
        ..GameConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let mut occupants = Vec::new();
    let mut events = Vec::new();

    let context = SpawnContext {
        max_slots: 3,
        retired: [false, true, false, false, false],
        ..open_shop()
    };
    spawning.fill_vacancies(
        &mut occupants,
        context,
        &mut tiles,
        &secrets(),
        &mut rng,
        &mut events,
    );

    let seats: Vec<usize> = occupants.iter().map(|seated| seated.index().get()).collect();
    assert_eq!(seats, vec![0, 2, 3], "retired seat 1 is skipped");
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::OccupantSeated { kind: OccupantKind::Customer, .. })));
    assert_eq!(spawning.arrivals(), 3);
}

#[test]
fn new_customers_use_configured_patience_and_reward() {
    let mut config = GameConfig::default();
    config.patience.customer = 4;
    config.economy.base_reward = 3.456;
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let context = SpawnContext {
        patience_bonus: 2,
        ..open_shop()
    };

    let occupant = spawning
        .generate_customer(&[], &context, slot(0), &mut tiles, &mut rng)
        .expect("shop has room");
    let customer = occupant.as_customer().expect("customer");
    assert_eq!(occupant.patience(), 6);
    assert_eq!(customer.willing_price(), 3.46);
}

#[test]
fn full_shop_generates_nobody() {
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let context = SpawnContext {
        max_slots: 0,
        ..open_shop()
    };

    assert!(spawning
        .generate_customer(&[], &context, slot(0), &mut tiles, &mut rng)
        .is_none());
}

#[test]
fn threshold_policy_seats_a_single_critic_first() {
    let config = GameConfig {
        critics: CriticPolicy::Threshold {
            thresholds: vec![0.0, 50.0],
        },
        ..GameConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let mut occupants = Vec::new();
    let mut events = Vec::new();

    spawning.fill_vacancies(
        &mut occupants,
        open_shop(),
        &mut tiles,
        &secrets(),
        &mut rng,
        &mut events,
    );

    let critics: Vec<&Occupant> = occupants
        .iter()
        .filter(|seated| seated.as_critic().is_some())
        .collect();
    assert_eq!(critics.len(), 1, "only one critic at a time");
    assert_eq!(critics[0].index(), slot(0));
    let critic = critics[0].as_critic().expect("critic");
    assert_eq!(critic.secret(), &Word::parse("SCOWL").expect("word"));
    assert!(critic.guesses().is_empty());
    assert_eq!(critics[0].patience(), config.patience.critic);
    assert_eq!(spawning.next_threshold_index(), 1);
}

#[test]
fn count_policy_places_critic_at_configured_arrival() {
    let config = GameConfig {
        critics: CriticPolicy::Count {
            spawn_at: vec![3],
            ceiling: 60,
            period: 4,
        },
        ..GameConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let mut occupants = Vec::new();
    let mut events = Vec::new();

    spawning.fill_vacancies(
        &mut occupants,
        open_shop(),
        &mut tiles,
        &secrets(),
        &mut rng,
        &mut events,
    );

    let kinds: Vec<OccupantKind> = occupants.iter().map(Occupant::kind).collect();
    assert_eq!(
        kinds,
        vec![
            OccupantKind::Customer,
            OccupantKind::Customer,
            OccupantKind::Critic,
            OccupantKind::Customer,
            OccupantKind::Customer,
        ]
    );
}

#[test]
fn customers_avoid_the_critic_letter_at_their_seat() {
    let mut config = GameConfig::default();
    config.tiles.positional.push(PositionalDistribution {
        slot: 0,
        counts: LetterCounts::from([(letter('S'), 1), (letter('T'), 40)]),
    });
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut tiles = TileSupply::new(&config.tiles, &mut rng).expect("valid tiles");
    let mut spawning = Spawning::new(&config);
    let critic = spawning
        .generate_critic(slot(3), &open_shop(), &secrets(), &mut rng)
        .expect("secret available");
    let occupants = vec![critic];

    for _ in 0..30 {
        let occupant = spawning
            .generate_customer(&occupants, &open_shop(), slot(0), &mut tiles, &mut rng)
            .expect("shop has room");
        let customer = occupant.as_customer().expect("customer");
        assert_eq!(customer.letter(), letter('T'));
    }
}
