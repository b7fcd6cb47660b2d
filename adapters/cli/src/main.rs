#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Word Market session in the terminal.

mod assets;
mod input;
mod view;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use word_market_core::{Collaborators, ReviewPool, WordList};
use word_market_world::{self as world, query, World};

use crate::input::Input;

/// Buy letters, satisfy customers, and outwit the critics.
#[derive(Parser, Debug)]
#[command(name = "word-market")]
struct Args {
    /// Newline-separated dictionary of playable five-letter words
    #[arg(long)]
    dictionary: PathBuf,

    /// Curated secret words for critics; the dictionary is used when absent
    #[arg(long)]
    critic_words: Option<PathBuf>,

    /// Newline-separated reviews left by customers who walk out
    #[arg(long)]
    reviews: Option<PathBuf>,

    /// TOML file overriding the default game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Accept words missing from the dictionary
    #[arg(long)]
    debug: bool,
}

/// Entry point for the Word Market command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut world = build_world(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    play(&mut world, stdin.lock(), stdout.lock())
}

fn build_world(args: &Args) -> Result<World> {
    let mut config = assets::load_config(args.config.as_deref())?;
    if args.debug {
        config.debug_bypass = true;
    }

    let dictionary = assets::load_words(&args.dictionary)?;
    let critic_words = match &args.critic_words {
        Some(path) => assets::load_words(path)?,
        None => WordList::default(),
    };
    let reviews = match &args.reviews {
        Some(path) => assets::load_reviews(path)?,
        None => ReviewPool::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting session");
    let collaborators = Collaborators::from_lists(dictionary, critic_words, reviews);
    World::new(config, collaborators, seed).context("failed to start a new game")
}

/// Runs the read-apply-render loop until the input ends, the player quits,
/// or the shop closes.
fn play(world: &mut World, mut reader: impl BufRead, mut output: impl Write) -> Result<()> {
    loop {
        for line in view::render(world) {
            writeln!(output, "{line}")?;
        }
        if query::is_closed(world) {
            writeln!(
                output,
                "The shop closed after {} turns. {} customers served, {} critics defeated.",
                query::turn(world),
                query::customers_satisfied(world),
                query::critics_defeated(world)
            )?;
            return Ok(());
        }

        write!(output, "> ")?;
        output.flush()?;
        let mut line = String::new();
        if reader.read_line(&mut line).context("failed to read input")? == 0 {
            return Ok(());
        }

        let commands = match input::parse(&line, query::debug_bypass(world)) {
            Ok(Input::Commands(commands)) => commands,
            Ok(Input::Preview(letters)) => {
                writeln!(output, "{}", view::preview(world, &letters))?;
                continue;
            }
            Ok(Input::Quit) => return Ok(()),
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        let mut events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        for message in view::describe(&events) {
            writeln!(output, "{message}")?;
        }
        if let Some(toast) = world.take_toast() {
            writeln!(output, "*** {toast} ***")?;
        }
    }
}
