//! Betting legality for heads-up play: action validators, round completion
//! and turn order. Everything here is a pure function of the players and the
//! round's bet; the table applies the results.

use serde::{Deserialize, Serialize};

use crate::errors::ActionError;
use crate::game::Phase;
use crate::player::{Player, Position};

/// Smallest increment a raise may add on top of the call.
pub const MIN_RAISE_INCREMENT: u32 = 5;

/// A legal action with the chip amounts it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatedAction {
    Fold,
    Check,
    Call {
        amount: u32,
    },
    Raise {
        call_amount: u32,
        increment: u32,
        total: u32,
    },
}

impl ValidatedAction {
    /// Chips this action moves from the player's stack into the pot.
    pub fn chips_committed(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call { amount } => amount,
            ValidatedAction::Raise { total, .. } => total,
        }
    }
}

pub fn is_betting_phase(phase: Phase) -> bool {
    matches!(
        phase,
        Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River
    )
}

pub fn call_amount(player: &Player, current_bet: u32) -> u32 {
    current_bet.saturating_sub(player.current_bet())
}

pub fn validate_fold(player: &Player, phase: Phase) -> Result<ValidatedAction, ActionError> {
    if !is_betting_phase(phase) {
        return Err(ActionError::InvalidPhaseForAction(phase));
    }
    if player.has_folded() {
        return Err(ActionError::AlreadyFolded);
    }
    Ok(ValidatedAction::Fold)
}

/// Validates a call; a call of zero is a check.
pub fn validate_call(
    player: &Player,
    current_bet: u32,
    phase: Phase,
) -> Result<ValidatedAction, ActionError> {
    if !is_betting_phase(phase) {
        return Err(ActionError::InvalidPhaseForAction(phase));
    }
    if player.has_folded() {
        return Err(ActionError::AlreadyFolded);
    }
    let amount = call_amount(player, current_bet);
    if amount > player.chips() {
        return Err(ActionError::InsufficientChipsToCall {
            required: amount,
            available: player.chips(),
        });
    }
    if amount == 0 {
        Ok(ValidatedAction::Check)
    } else {
        Ok(ValidatedAction::Call { amount })
    }
}

/// Validates a raise of `increment` chips on top of the call.
///
/// Besides the player's own stack, a heads-up raise is capped by what the
/// opponent can still put in: the opponent must be able to call it.
///
/// ```
/// use duel_engine::errors::ActionError;
/// use duel_engine::game::Phase;
/// use duel_engine::player::{PlayerBuilder, Position};
/// use duel_engine::rules::{validate_raise, MIN_RAISE_INCREMENT};
///
/// let me = PlayerBuilder::new(0, 90).current_bet(10).build();
/// let opp = PlayerBuilder::new(1, 10).position(Position::BigBlind).current_bet(10).build();
/// let players = [me.clone(), opp];
///
/// let err = validate_raise(&me, 10, 20, Phase::Flop, &players, MIN_RAISE_INCREMENT).unwrap_err();
/// assert!(matches!(err, ActionError::RaiseExceedsOpponentCoverage { .. }));
/// ```
pub fn validate_raise(
    player: &Player,
    current_bet: u32,
    increment: u32,
    phase: Phase,
    players: &[Player],
    min_increment: u32,
) -> Result<ValidatedAction, ActionError> {
    if !is_betting_phase(phase) {
        return Err(ActionError::InvalidPhaseForAction(phase));
    }
    if player.has_folded() {
        return Err(ActionError::AlreadyFolded);
    }
    let call = call_amount(player, current_bet);
    if player.chips() == 0 {
        return Err(ActionError::RaiseExceedsOwnStack {
            required: call.saturating_add(increment),
            available: 0,
        });
    }
    if increment < min_increment {
        return Err(ActionError::RaiseBelowMinimumIncrement {
            amount: increment,
            minimum: min_increment,
        });
    }
    let total = call.saturating_add(increment);
    if total > player.chips() {
        return Err(ActionError::RaiseExceedsOwnStack {
            required: total,
            available: player.chips(),
        });
    }
    if let Some(opp) = opponent_of(player, players) {
        let required = call_amount(opp, current_bet).saturating_add(increment);
        if required > opp.chips() {
            return Err(ActionError::RaiseExceedsOpponentCoverage {
                required,
                available: opp.chips(),
            });
        }
    }
    Ok(ValidatedAction::Raise {
        call_amount: call,
        increment,
        total,
    })
}

/// Largest increment `validate_raise` would accept for this player, or 0.
pub fn max_raise_increment(player: &Player, current_bet: u32, players: &[Player]) -> u32 {
    let own = player
        .chips()
        .saturating_sub(call_amount(player, current_bet));
    match opponent_of(player, players) {
        Some(opp) => own.min(
            opp.chips()
                .saturating_sub(call_amount(opp, current_bet)),
        ),
        None => own,
    }
}

fn opponent_of<'a>(player: &Player, players: &'a [Player]) -> Option<&'a Player> {
    players
        .iter()
        .find(|p| p.id() != player.id() && !p.has_folded())
}

/// True once at most one player is left, or every unfolded player has acted
/// and matched the round's bet.
pub fn is_betting_round_complete(players: &[Player], current_bet: u32) -> bool {
    let active: Vec<&Player> = players.iter().filter(|p| !p.has_folded()).collect();
    if active.len() <= 1 {
        return true;
    }
    active
        .iter()
        .all(|p| p.has_acted() && p.current_bet() == current_bet)
}

/// Heads-up order: the small blind opens preflop, the big blind every later
/// street.
pub fn first_player_index(players: &[Player], phase: Phase) -> Option<usize> {
    let opener = match phase {
        Phase::Preflop => Position::SmallBlind,
        Phase::Flop | Phase::Turn | Phase::River => Position::BigBlind,
        Phase::Waiting | Phase::Showdown => return None,
    };
    players
        .iter()
        .position(|p| p.position() == opener && !p.has_folded())
}

/// Next unfolded seat after `current`, wrapping around. `None` once fewer
/// than two players remain.
pub fn next_active_player_index(players: &[Player], current: usize) -> Option<usize> {
    if players.iter().filter(|p| !p.has_folded()).count() <= 1 {
        return None;
    }
    let n = players.len();
    (1..=n)
        .map(|step| (current + step) % n)
        .find(|&i| !players[i].has_folded())
}
