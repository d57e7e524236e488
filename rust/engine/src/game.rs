use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::player::{Player, Position};

/// Stage of the current hand. One traversal per hand, in declaration order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// Street that follows a completed betting round.
    pub fn next(self) -> Phase {
        match self {
            Phase::Waiting => Phase::Preflop,
            Phase::Preflop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River | Phase::Showdown => Phase::Showdown,
        }
    }

    /// Community cards revealed on entering this phase.
    pub fn reveal_count(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            _ => 0,
        }
    }
}

/// Mutable state of one heads-up match, owned by the table.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) players: [Player; 2],
    pub(crate) community: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) current_bet: u32,
    pub(crate) deck: Deck,
    small_blind_index: usize,
}

impl GameState {
    pub fn new(players: [Player; 2], deck: Deck) -> Self {
        // derive the small blind from the players' positions, default to seat 0
        let small_blind_index = if players[1].position() == Position::SmallBlind
            && players[0].position() != Position::SmallBlind
        {
            1
        } else {
            0
        };
        let mut gs = Self {
            phase: Phase::Waiting,
            players,
            community: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            deck,
            small_blind_index,
        };
        gs.sync_positions();
        gs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn small_blind_index(&self) -> usize {
        self.small_blind_index
    }
    pub fn big_blind_index(&self) -> usize {
        1 - self.small_blind_index
    }

    /// Chips in stacks plus the pot; constant for the whole match.
    pub fn total_chips(&self) -> u64 {
        self.players
            .iter()
            .map(|p| u64::from(p.chips()))
            .sum::<u64>()
            + u64::from(self.pot)
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.has_folded()).count()
    }

    pub fn rotate_blinds(&mut self) {
        self.small_blind_index = 1 - self.small_blind_index;
        self.sync_positions();
    }

    pub(crate) fn set_small_blind(&mut self, seat: usize) {
        self.small_blind_index = seat.min(1);
        self.sync_positions();
    }

    fn sync_positions(&mut self) {
        let sb = self.small_blind_index;
        self.players[sb].set_position(Position::SmallBlind);
        self.players[1 - sb].set_position(Position::BigBlind);
    }
}
