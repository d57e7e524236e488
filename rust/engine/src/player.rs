use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::ActionError;

/// Blind seat held by a player for the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    SmallBlind,
    BigBlind,
}

/// Action requested by a player. `Call` with nothing owed is a check;
/// `Raise` carries the increment on top of the call.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Call,
    Raise(u32),
}

/// One of the two seats at the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: usize,
    name: String,
    chips: u32,
    position: Position,
    hole: Option<[Card; 2]>,
    current_bet: u32,
    folded: bool,
    acted: bool,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, chips: u32, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            chips,
            position,
            hole: None,
            current_bet: 0,
            folded: false,
            acted: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn is_small_blind(&self) -> bool {
        self.position == Position::SmallBlind
    }
    pub fn is_big_blind(&self) -> bool {
        self.position == Position::BigBlind
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn has_folded(&self) -> bool {
        self.folded
    }
    pub fn has_acted(&self) -> bool {
        self.acted
    }
    pub fn is_all_in(&self) -> bool {
        !self.folded && self.chips == 0
    }

    pub fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    pub fn set_hole_cards(&mut self, cards: [Card; 2]) {
        self.hole = Some(cards);
    }

    pub(crate) fn set_acted(&mut self, acted: bool) {
        self.acted = acted;
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
        self.acted = true;
    }

    /// Clears per-hand state; chips are untouched.
    pub(crate) fn reset_for_hand(&mut self) {
        self.hole = None;
        self.current_bet = 0;
        self.folded = false;
        self.acted = false;
    }

    pub(crate) fn reset_for_round(&mut self) {
        self.current_bet = 0;
        self.acted = false;
    }

    /// Moves `amount` from the stack into this round's bet.
    pub(crate) fn commit(&mut self, amount: u32) -> Result<(), ActionError> {
        if amount > self.chips {
            return Err(ActionError::InsufficientChipsToCall {
                required: amount,
                available: self.chips,
            });
        }
        self.chips -= amount;
        self.current_bet += amount;
        Ok(())
    }

    pub(crate) fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    #[cfg(test)]
    pub(crate) fn set_chips(&mut self, chips: u32) {
        self.chips = chips;
    }
}

/// Builds a player in an arbitrary mid-round state, for exercising the
/// validators without driving a whole hand.
#[derive(Debug, Clone)]
pub struct PlayerBuilder {
    player: Player,
}

impl PlayerBuilder {
    pub fn new(id: usize, chips: u32) -> Self {
        Self {
            player: Player::new(id, format!("P{id}"), chips, Position::SmallBlind),
        }
    }

    pub fn position(mut self, pos: Position) -> Self {
        self.player.position = pos;
        self
    }

    pub fn current_bet(mut self, bet: u32) -> Self {
        self.player.current_bet = bet;
        self
    }

    pub fn folded(mut self) -> Self {
        self.player.folded = true;
        self
    }

    pub fn acted(mut self) -> Self {
        self.player.acted = true;
        self
    }

    pub fn hole(mut self, cards: [Card; 2]) -> Self {
        self.player.hole = Some(cards);
        self
    }

    pub fn build(self) -> Player {
        self.player
    }
}
