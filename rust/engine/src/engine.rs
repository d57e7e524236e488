use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::{ActionError, ConfigError, GameError};
use crate::game::{GameState, Phase};
use crate::hand::{compare_hands, describe_with_kicker, evaluate_cards, PokerHand};
use crate::logger::{ActionRecord, HandIds, HandRecord, ShowdownInfo};
use crate::player::{Player, PlayerAction, Position};
use crate::rules::{self, ValidatedAction};

/// Something that happened during a transition, in the order it happened.
/// Presentation layers replay these to pace reveals; the table itself has
/// already moved on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HandEvent {
    HandStarted {
        hand_id: String,
        small_blind: usize,
        big_blind: usize,
    },
    BlindPosted {
        seat: usize,
        position: Position,
        amount: u32,
    },
    HoleCardDealt {
        seat: usize,
        card: Card,
    },
    ActionApplied {
        seat: usize,
        action: ValidatedAction,
    },
    CardBurned,
    CommunityDealt {
        phase: Phase,
        cards: Vec<Card>,
    },
    PhaseChanged {
        phase: Phase,
    },
    Showdown(ShowdownResult),
    PotAwarded {
        seat: usize,
        amount: u32,
    },
    MatchOver {
        winner: usize,
    },
}

/// One player's cards and best hand at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatHand {
    pub seat: usize,
    pub hole: Vec<Card>,
    pub hand: PokerHand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResult {
    pub hands: Vec<SeatHand>,
    /// Both seats on a tie.
    pub winners: Vec<usize>,
    pub tie: bool,
    pub pot: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: usize,
    pub name: String,
    pub chips: u32,
    pub current_bet: u32,
    pub position: Position,
    pub folded: bool,
    pub acted: bool,
    pub hole: Option<[Card; 2]>,
}

/// Read-only view of the table. The deck is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub phase: Phase,
    pub pot: u32,
    pub current_bet: u32,
    pub community: Vec<Card>,
    pub players: Vec<PlayerView>,
    pub to_act: Option<usize>,
    pub showdown: Option<ShowdownResult>,
    pub winner: Option<usize>,
}

/// Result of a successful `start_hand` or `apply_action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub events: Vec<HandEvent>,
    pub snapshot: TableSnapshot,
}

/// Heads-up table: posts blinds, deals, sequences betting rounds, settles
/// pots and ends the match when a stack can no longer cover the big blind.
///
/// # Examples
///
/// ```
/// use duel_engine::config::TableConfig;
/// use duel_engine::engine::Table;
/// use duel_engine::game::Phase;
/// use duel_engine::player::PlayerAction;
///
/// let config = TableConfig { seed: Some(7), ..TableConfig::default() };
/// let mut table = Table::new(config, ["alice", "bot"]).unwrap();
/// table.start_hand().unwrap();
/// assert_eq!(table.pot(), 15);
///
/// let sb = table.state().small_blind_index();
/// table.apply_action(sb, PlayerAction::Call).unwrap();
/// table.apply_action(1 - sb, PlayerAction::Call).unwrap();
/// assert_eq!(table.phase(), Phase::Flop);
/// assert_eq!(table.community_cards().len(), 3);
/// ```
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    state: GameState,
    to_act: Option<usize>,
    hands_played: u32,
    showdown: Option<ShowdownResult>,
    winner: Option<usize>,
    ids: HandIds,
    record: Option<HandRecord>,
    last_hand: Option<HandRecord>,
}

impl Table {
    pub fn new(config: TableConfig, names: [&str; 2]) -> Result<Self, ConfigError> {
        config.validate()?;
        let deck = match config.seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::new(),
        };
        let players = [
            Player::new(0, names[0], config.starting_stack, Position::SmallBlind),
            Player::new(1, names[1], config.starting_stack, Position::BigBlind),
        ];
        Ok(Self {
            config,
            state: GameState::new(players, deck),
            to_act: None,
            hands_played: 0,
            showdown: None,
            winner: None,
            ids: HandIds::new(),
            record: None,
            last_hand: None,
        })
    }

    /// Chooses who posts the small blind on the first hand.
    pub fn with_small_blind(mut self, seat: usize) -> Self {
        self.state.set_small_blind(seat);
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn state(&self) -> &GameState {
        &self.state
    }
    pub fn phase(&self) -> Phase {
        self.state.phase
    }
    pub fn pot(&self) -> u32 {
        self.state.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.state.current_bet
    }
    pub fn players(&self) -> &[Player; 2] {
        &self.state.players
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.state.community
    }
    /// Seat whose action is awaited, if a betting round is open.
    pub fn to_act(&self) -> Option<usize> {
        self.to_act
    }
    pub fn showdown(&self) -> Option<&ShowdownResult> {
        self.showdown.as_ref()
    }
    /// Overall winner once the match has ended.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }
    pub fn last_hand(&self) -> Option<&HandRecord> {
        self.last_hand.as_ref()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let players = self
            .state
            .players
            .iter()
            .map(|p| PlayerView {
                seat: p.id(),
                name: p.name().to_string(),
                chips: p.chips(),
                current_bet: p.current_bet(),
                position: p.position(),
                folded: p.has_folded(),
                acted: p.has_acted(),
                hole: p.hole_cards(),
            })
            .collect();
        TableSnapshot {
            phase: self.state.phase,
            pot: self.state.pot,
            current_bet: self.state.current_bet,
            community: self.state.community.clone(),
            players,
            to_act: self.to_act,
            showdown: self.showdown.clone(),
            winner: self.winner,
        }
    }

    /// Rotates the blinds (except on the first hand), posts them, deals hole
    /// cards and opens preflop betting with the small blind to act.
    pub fn start_hand(&mut self) -> Result<Transition, GameError> {
        if let Some(winner) = self.winner {
            return Err(GameError::MatchOver { winner });
        }
        if rules::is_betting_phase(self.state.phase) {
            return Err(GameError::HandInProgress);
        }

        let (sb_amount, bb_amount) = (self.config.small_blind, self.config.big_blind);
        let mut sb = self.state.small_blind_index();
        if self.hands_played > 0 {
            sb = 1 - sb;
        }
        let bb = 1 - sb;
        if self.state.players[sb].chips() < sb_amount {
            return Err(GameError::CannotPostBlind {
                seat: sb,
                amount: sb_amount,
            });
        }
        if self.state.players[bb].chips() < bb_amount {
            return Err(GameError::CannotPostBlind {
                seat: bb,
                amount: bb_amount,
            });
        }

        if self.hands_played > 0 {
            self.state.rotate_blinds();
        }
        let hand_id = self.ids.next_id();
        let mut events = vec![HandEvent::HandStarted {
            hand_id: hand_id.clone(),
            small_blind: sb,
            big_blind: bb,
        }];

        for p in self.state.players.iter_mut() {
            p.reset_for_hand();
        }
        self.state.community.clear();
        self.state.current_bet = 0;
        self.showdown = None;

        for (seat, amount) in [(sb, sb_amount), (bb, bb_amount)] {
            let player = &mut self.state.players[seat];
            if player.commit(amount).is_err() {
                return Err(GameError::CannotPostBlind { seat, amount });
            }
            self.state.pot += amount;
            events.push(HandEvent::BlindPosted {
                seat,
                position: player.position(),
                amount,
            });
        }
        self.state.current_bet = bb_amount;
        self.check_bankroll();

        self.state.deck.shuffle();
        let mut dealt: [Vec<Card>; 2] = [Vec::with_capacity(2), Vec::with_capacity(2)];
        for _ in 0..2 {
            for seat in [bb, sb] {
                let card = self
                    .state
                    .deck
                    .deal_card()
                    .ok_or(GameError::DeckExhausted)?;
                dealt[seat].push(card);
                events.push(HandEvent::HoleCardDealt { seat, card });
            }
        }
        for (seat, cards) in dealt.iter().enumerate() {
            self.state.players[seat].set_hole_cards([cards[0], cards[1]]);
        }

        self.hands_played += 1;
        self.state.phase = Phase::Preflop;
        self.to_act = rules::first_player_index(&self.state.players, Phase::Preflop);
        self.record = Some(HandRecord::new(hand_id.clone(), self.config.seed, sb));
        events.push(HandEvent::PhaseChanged {
            phase: Phase::Preflop,
        });

        tracing::info!(
            hand_id = %hand_id,
            small_blind = sb,
            big_blind = bb,
            pot = self.state.pot,
            "hand started"
        );

        Ok(self.transition(events))
    }

    /// Applies one action for `seat`. Rejected actions leave the table as it
    /// was.
    pub fn apply_action(
        &mut self,
        seat: usize,
        action: PlayerAction,
    ) -> Result<Transition, ActionError> {
        let validated = self.validate(seat, action).inspect_err(|err| {
            tracing::warn!(seat, action = ?action, error = %err, "action rejected");
        })?;

        let phase = self.state.phase;
        let player = &mut self.state.players[seat];
        match validated {
            ValidatedAction::Fold => player.fold(),
            ValidatedAction::Check => player.set_acted(true),
            ValidatedAction::Call { amount } => {
                player.commit(amount)?;
                player.set_acted(true);
                self.state.pot += amount;
            }
            ValidatedAction::Raise { total, .. } => {
                player.commit(total)?;
                player.set_acted(true);
                self.state.pot += total;
                self.state.current_bet = self.state.players[seat].current_bet();
                for other in self.state.players.iter_mut() {
                    if other.id() != seat && !other.has_folded() {
                        other.set_acted(false);
                    }
                }
            }
        }
        if let Some(record) = self.record.as_mut() {
            record.actions.push(ActionRecord {
                seat,
                phase,
                action: validated,
            });
        }
        tracing::debug!(
            seat,
            phase = ?phase,
            action = ?validated,
            pot = self.state.pot,
            "action applied"
        );

        let mut events = vec![HandEvent::ActionApplied {
            seat,
            action: validated,
        }];
        self.progress(seat, &mut events);
        self.check_bankroll();
        Ok(self.transition(events))
    }

    fn validate(&self, seat: usize, action: PlayerAction) -> Result<ValidatedAction, ActionError> {
        let player = self
            .state
            .players
            .get(seat)
            .ok_or(ActionError::UnknownPlayer(seat))?;
        let phase = self.state.phase;
        if !rules::is_betting_phase(phase) {
            return Err(ActionError::InvalidPhaseForAction(phase));
        }
        let expected = self
            .to_act
            .ok_or(ActionError::InvalidPhaseForAction(phase))?;
        if expected != seat {
            return Err(ActionError::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        if player.has_folded() {
            return Err(ActionError::AlreadyFolded);
        }
        if player.has_acted() {
            return Err(ActionError::AlreadyActed(seat));
        }
        let current_bet = self.state.current_bet;
        match action {
            PlayerAction::Fold => rules::validate_fold(player, phase),
            PlayerAction::Call => rules::validate_call(player, current_bet, phase),
            PlayerAction::Raise(increment) => rules::validate_raise(
                player,
                current_bet,
                increment,
                phase,
                &self.state.players,
                self.config.min_raise,
            ),
        }
    }

    // Moves the hand forward after `last` acted: hands the turn over, closes
    // betting rounds, deals streets and settles the pot when the hand ends.
    fn progress(&mut self, last: usize, events: &mut Vec<HandEvent>) {
        let mut current = last;
        loop {
            if self.state.active_count() <= 1 {
                self.award_uncontested(events);
                return;
            }
            if rules::is_betting_round_complete(&self.state.players, self.state.current_bet) {
                if self.state.phase == Phase::River {
                    self.settle_showdown(events);
                    return;
                }
                self.deal_next_street(events);
                match self.to_act {
                    Some(_) if !self.any_all_in() => return,
                    Some(first) => current = first,
                    None => current = last,
                }
                // once someone is all-in the board runs out without betting
                for p in self.state.players.iter_mut() {
                    p.set_acted(true);
                }
                continue;
            }
            let Some(next) = rules::next_active_player_index(&self.state.players, current) else {
                self.award_uncontested(events);
                return;
            };
            let player = &self.state.players[next];
            if player.chips() == 0 && rules::call_amount(player, self.state.current_bet) == 0 {
                // nothing left to decide for an all-in player
                self.state.players[next].set_acted(true);
                current = next;
                continue;
            }
            self.to_act = Some(next);
            return;
        }
    }

    fn any_all_in(&self) -> bool {
        self.state.players.iter().any(Player::is_all_in)
    }

    fn deal_next_street(&mut self, events: &mut Vec<HandEvent>) {
        let next = self.state.phase.next();
        if self.state.deck.burn_card().is_some() {
            events.push(HandEvent::CardBurned);
        }
        let cards = self.state.deck.deal_cards(next.reveal_count());
        self.state.community.extend_from_slice(&cards);
        for p in self.state.players.iter_mut() {
            p.reset_for_round();
        }
        self.state.current_bet = 0;
        self.state.phase = next;
        self.to_act = rules::first_player_index(&self.state.players, next);

        tracing::debug!(phase = ?next, cards = ?cards, "street dealt");
        events.push(HandEvent::CommunityDealt { phase: next, cards });
        events.push(HandEvent::PhaseChanged { phase: next });
    }

    fn award_uncontested(&mut self, events: &mut Vec<HandEvent>) {
        let Some(seat) = self.state.players.iter().position(|p| !p.has_folded()) else {
            return;
        };
        let amount = self.take_pot();
        self.state.players[seat].add_chips(amount);
        events.push(HandEvent::PotAwarded { seat, amount });
        if let Some(record) = self.record.as_mut() {
            record.result = Some(format!("player {seat} wins {amount} uncontested"));
        }
        tracing::info!(seat, amount, "pot awarded uncontested");

        self.state.phase = Phase::Waiting;
        events.push(HandEvent::PhaseChanged {
            phase: Phase::Waiting,
        });
        self.finish_hand(events);
    }

    fn settle_showdown(&mut self, events: &mut Vec<HandEvent>) {
        self.state.phase = Phase::Showdown;
        events.push(HandEvent::PhaseChanged {
            phase: Phase::Showdown,
        });

        let hands: Vec<SeatHand> = self
            .state
            .players
            .iter()
            .map(|p| {
                let hole: Vec<Card> = p.hole_cards().into_iter().flatten().collect();
                let mut all = hole.clone();
                all.extend_from_slice(&self.state.community);
                SeatHand {
                    seat: p.id(),
                    hole,
                    hand: evaluate_cards(&all),
                }
            })
            .collect();

        let pot = self.take_pot();
        let (winners, description) = match compare_hands(&hands[0].hand, &hands[1].hand) {
            Ordering::Greater => (vec![0], describe_with_kicker(&hands[0].hand, &hands[1].hand)),
            Ordering::Less => (vec![1], describe_with_kicker(&hands[1].hand, &hands[0].hand)),
            Ordering::Equal => (vec![0, 1], format!("Split pot, {}", hands[0].hand.description)),
        };
        let tie = winners.len() == 2;

        let share = pot / winners.len() as u32;
        let odd = pot - share * winners.len() as u32;
        let big_blind = self.state.big_blind_index();
        let awards: Vec<(usize, u32)> = winners
            .iter()
            .map(|&seat| {
                // an odd chip on a split goes to the big blind
                let extra = if !tie || seat == big_blind { odd } else { 0 };
                (seat, share + extra)
            })
            .collect();

        let result = ShowdownResult {
            hands,
            winners: winners.clone(),
            tie,
            pot,
            description: description.clone(),
        };
        events.push(HandEvent::Showdown(result.clone()));
        for (seat, amount) in awards {
            self.state.players[seat].add_chips(amount);
            events.push(HandEvent::PotAwarded { seat, amount });
        }

        tracing::info!(winners = ?winners, tie, pot, hand = %description, "showdown settled");
        if let Some(record) = self.record.as_mut() {
            record.result = Some(description.clone());
            record.showdown = Some(ShowdownInfo {
                winners,
                notes: Some(description),
            });
        }
        self.showdown = Some(result);
        self.finish_hand(events);
    }

    fn take_pot(&mut self) -> u32 {
        std::mem::take(&mut self.state.pot)
    }

    fn finish_hand(&mut self, events: &mut Vec<HandEvent>) {
        self.to_act = None;
        if let Some(mut record) = self.record.take() {
            record.board = self.state.community.clone();
            record.stamp();
            self.last_hand = Some(record);
        }

        let threshold = self.config.bust_threshold;
        let busted: Vec<usize> = self
            .state
            .players
            .iter()
            .filter(|p| p.chips() < threshold)
            .map(Player::id)
            .collect();
        let winner = match busted.as_slice() {
            [] => return,
            [loser] => 1 - loser,
            _ => {
                let [a, b] = &self.state.players;
                if a.chips() >= b.chips() {
                    0
                } else {
                    1
                }
            }
        };
        self.winner = Some(winner);
        events.push(HandEvent::MatchOver { winner });
        tracing::info!(winner, "match over");
    }

    fn check_bankroll(&self) {
        assert_eq!(
            self.state.total_chips(),
            self.config.bankroll(),
            "chip conservation violated"
        );
    }

    fn transition(&self, events: Vec<HandEvent>) -> Transition {
        Transition {
            events,
            snapshot: self.snapshot(),
        }
    }
}
