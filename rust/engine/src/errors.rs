use thiserror::Error;

use crate::game::Phase;

/// Why an action was refused. The table is left untouched whenever one of
/// these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    OutOfTurn { expected: usize, actual: usize },
    #[error("Player {0} has already acted this round")]
    AlreadyActed(usize),
    #[error("Player already folded")]
    AlreadyFolded,
    #[error("Action not allowed during {0:?}")]
    InvalidPhaseForAction(Phase),
    #[error("Insufficient chips to call: need {required}, have {available}")]
    InsufficientChipsToCall { required: u32, available: u32 },
    #[error("Raise of {amount} is below the minimum increment of {minimum}")]
    RaiseBelowMinimumIncrement { amount: u32, minimum: u32 },
    #[error("Raise needs {required} chips but only {available} remain")]
    RaiseExceedsOwnStack { required: u32, available: u32 },
    #[error("Opponent cannot cover the raise: needs {required}, has {available}")]
    RaiseExceedsOpponentCoverage { required: u32, available: u32 },
    #[error("No player in seat {0}")]
    UnknownPlayer(usize),
}

/// Table lifecycle errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Match is over, player {winner} won")]
    MatchOver { winner: usize },
    #[error("Deck ran out of cards")]
    DeckExhausted,
    #[error("Player {seat} cannot post the {amount} blind")]
    CannotPostBlind { seat: usize, amount: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
