//! Translation of typed lines into world commands.

use thiserror::Error;
use word_market_core::{Command, Letter, WORD_LENGTH};

/// What the player asked for on one line of input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    /// Commands to apply to the world, in order.
    Commands(Vec<Command>),
    /// Show the cost and income of a word without buying it.
    Preview(Vec<Letter>),
    /// Leave the game.
    Quit,
}

/// Lines that cannot be turned into commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    /// A character outside `A-Z` was typed.
    #[error("'{0}' is not a letter")]
    NotALetter(char),
    /// More letters were typed than fit in a word.
    #[error("Word must be 5 letters")]
    TooLong,
    /// An unrecognised `:` command.
    #[error("unknown command; try :skip, :price WORD, :debug or :quit")]
    UnknownCommand,
}

/// Parses a line of input. `debug_bypass` is the current bypass state so
/// `:debug` can toggle it.
pub(crate) fn parse(line: &str, debug_bypass: bool) -> Result<Input, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Commands(vec![Command::ClearBuffer, Command::SkipTurn]));
    }

    if let Some(command) = line.strip_prefix(':') {
        let mut parts = command.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some("skip" | "s"), None) => {
                Ok(Input::Commands(vec![Command::ClearBuffer, Command::SkipTurn]))
            }
            (Some("quit" | "q"), None) => Ok(Input::Quit),
            (Some("debug"), None) => Ok(Input::Commands(vec![Command::SetDebugBypass {
                enabled: !debug_bypass,
            }])),
            (Some("price" | "p"), Some(word)) => letters(word).map(Input::Preview),
            _ => Err(InputError::UnknownCommand),
        };
    }

    let letters = letters(line)?;
    let mut commands = Vec::with_capacity(letters.len() + 2);
    commands.push(Command::ClearBuffer);
    commands.extend(letters.into_iter().map(|letter| Command::TypeLetter { letter }));
    commands.push(Command::SubmitWord);
    Ok(Input::Commands(commands))
}

fn letters(word: &str) -> Result<Vec<Letter>, InputError> {
    let letters = word
        .chars()
        .map(|value| Letter::from_char(value).ok_or(InputError::NotALetter(value)))
        .collect::<Result<Vec<_>, _>>()?;
    if letters.len() > WORD_LENGTH {
        return Err(InputError::TooLong);
    }
    Ok(letters)
}
