//! # duel-ai: Computer opponent for heads-up Hold'em
//!
//! Wraps the heuristic policy in [`heuristic`] so it can read a live
//! [`Table`] and hand back actions the table will accept.
//!
//! ## Core Components
//!
//! - [`heuristic`] - Pure decision function, hand strength and sizing
//! - [`get_ai_action`] - Decision for the seat to act, fitted to table limits
//! - [`play_ai_turn`] - Decide and apply in one step
//! - [`AIOpponent`] / [`create_ai`] - Stateful opponent owning its RNG
//!
//! ## Quick Start
//!
//! ```rust
//! use duel_ai::{create_ai, AIOpponent};
//! use duel_engine::config::{Personality, TableConfig};
//! use duel_engine::engine::Table;
//!
//! let config = TableConfig {
//!     personality: Personality::Aggressive,
//!     seed: Some(3),
//!     ..TableConfig::default()
//! };
//! let mut ai = create_ai(&config);
//! let mut table = Table::new(config, ["you", "bot"]).unwrap();
//! table.start_hand().unwrap();
//!
//! let seat = table.to_act().unwrap();
//! let decision = ai.get_action(&table, seat).unwrap();
//! table.apply_action(seat, decision.to_action()).unwrap();
//! ```

use duel_engine::config::{Personality, TableConfig};
use duel_engine::engine::{Table, Transition};
use duel_engine::errors::ActionError;
use duel_engine::rules;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub mod heuristic;

pub use heuristic::{AIAction, AIDecision, DecisionContext, make_decision};

/// Decides for the seat whose turn it is. `None` when no betting round is
/// open.
///
/// Raises come back rounded to the table's raise increment and no larger
/// than both stacks allow; when no legal raise exists the decision becomes a
/// call.
pub fn get_ai_action<R: Rng + ?Sized>(
    table: &Table,
    personality: Personality,
    rng: &mut R,
) -> Option<AIDecision> {
    let seat = table.to_act()?;
    let ctx = DecisionContext {
        player: &table.players()[seat],
        community: table.community_cards(),
        current_bet: table.current_bet(),
        pot: table.pot(),
        phase: table.phase(),
        active_players: table.state().active_count(),
    };
    let decision = make_decision(&ctx, personality, rng);
    Some(fit_to_table(decision, table, seat))
}

fn fit_to_table(decision: AIDecision, table: &Table, seat: usize) -> AIDecision {
    let AIAction::Raise(amount) = decision.action else {
        return decision;
    };
    let step = table.config().min_raise;
    let players = table.players();
    let cap = rules::max_raise_increment(&players[seat], table.current_bet(), players);
    let largest = cap - cap % step;
    if largest < step {
        return AIDecision {
            action: AIAction::Call,
            reasoning: format!("{}; no room to raise, calling", decision.reasoning),
        };
    }
    let rounded = ((amount + step / 2) / step * step).clamp(step, largest);
    AIDecision {
        action: AIAction::Raise(rounded),
        reasoning: decision.reasoning,
    }
}

/// Decides for `seat` and applies the action to the table.
pub fn play_ai_turn<R: Rng + ?Sized>(
    table: &mut Table,
    seat: usize,
    personality: Personality,
    rng: &mut R,
) -> Result<Transition, ActionError> {
    let expected = table
        .to_act()
        .ok_or(ActionError::InvalidPhaseForAction(table.phase()))?;
    if expected != seat {
        return Err(ActionError::OutOfTurn {
            expected,
            actual: seat,
        });
    }
    let decision = get_ai_action(table, personality, rng)
        .ok_or(ActionError::InvalidPhaseForAction(table.phase()))?;
    tracing::info!(seat, action = ?decision.action, reason = %decision.reasoning, "ai acts");
    table.apply_action(seat, decision.to_action())
}

/// An opponent that can be asked for a move.
///
/// # Example Implementation
///
/// ```rust
/// use duel_ai::{AIAction, AIDecision, AIOpponent};
/// use duel_engine::engine::Table;
///
/// struct CallingStation;
///
/// impl AIOpponent for CallingStation {
///     fn get_action(&mut self, table: &Table, seat: usize) -> Option<AIDecision> {
///         (table.to_act() == Some(seat)).then(|| AIDecision {
///             action: AIAction::Call,
///             reasoning: "always calls".into(),
///         })
///     }
///
///     fn name(&self) -> &str {
///         "CallingStation"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Decision for `seat`, or `None` when it is not that seat's turn.
    fn get_action(&mut self, table: &Table, seat: usize) -> Option<AIDecision>;

    fn name(&self) -> &str;
}

/// Heuristic opponent with its own ChaCha20 stream.
#[derive(Debug, Clone)]
pub struct HeuristicAI {
    personality: Personality,
    rng: ChaCha20Rng,
    name: String,
}

impl HeuristicAI {
    pub fn new(personality: Personality, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self {
            personality,
            rng,
            name: format!("HeuristicAI({personality})"),
        }
    }

    /// Opponent playing the table's configured personality, seeded from the
    /// table seed when one is set.
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(config.personality, config.seed)
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }
}

impl AIOpponent for HeuristicAI {
    fn get_action(&mut self, table: &Table, seat: usize) -> Option<AIDecision> {
        if table.to_act() != Some(seat) {
            return None;
        }
        get_ai_action(table, self.personality, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Boxed opponent for `config`; see [`HeuristicAI::from_config`].
pub fn create_ai(config: &TableConfig) -> Box<dyn AIOpponent> {
    Box::new(HeuristicAI::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_engine::game::Phase;
    use duel_engine::player::PlayerAction;

    fn table(seed: u64) -> Table {
        let config = TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        };
        let mut t = Table::new(config, ["p0", "p1"]).unwrap();
        t.start_hand().unwrap();
        t
    }

    #[test]
    fn no_decision_outside_a_betting_round() {
        let config = TableConfig {
            seed: Some(1),
            ..TableConfig::default()
        };
        let t = Table::new(config, ["p0", "p1"]).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(get_ai_action(&t, Personality::Balanced, &mut rng).is_none());
    }

    #[test]
    fn raises_are_rounded_and_capped() {
        let t = table(5);
        let seat = t.to_act().unwrap();
        let cap = rules::max_raise_increment(&t.players()[seat], t.current_bet(), t.players());

        for amount in [1, 7, 13, 500] {
            let d = fit_to_table(
                AIDecision {
                    action: AIAction::Raise(amount),
                    reasoning: String::new(),
                },
                &t,
                seat,
            );
            let AIAction::Raise(fitted) = d.action else {
                panic!("expected a raise, got {:?}", d.action);
            };
            assert_eq!(fitted % 5, 0);
            assert!(fitted >= 5 && fitted <= cap);
        }
    }

    #[test]
    fn raise_without_room_becomes_call() {
        let mut t = table(9);
        let sb = t.to_act().unwrap();
        // small blind shoves the most the big blind can cover
        let cap = rules::max_raise_increment(&t.players()[sb], t.current_bet(), t.players());
        t.apply_action(sb, PlayerAction::Raise(cap)).unwrap();
        let bb = t.to_act().unwrap();

        let d = fit_to_table(
            AIDecision {
                action: AIAction::Raise(10),
                reasoning: "strong".into(),
            },
            &t,
            bb,
        );
        assert_eq!(d.action, AIAction::Call);
        assert!(d.reasoning.starts_with("strong"));
    }

    #[test]
    fn play_ai_turn_rejects_wrong_seat() {
        let mut t = table(2);
        let seat = t.to_act().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let err = play_ai_turn(&mut t, 1 - seat, Personality::Balanced, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ActionError::OutOfTurn {
                expected: seat,
                actual: 1 - seat
            }
        );
        assert_eq!(t.phase(), Phase::Preflop);
        assert_eq!(t.pot(), 15);
    }

    #[test]
    fn opponent_only_answers_for_its_turn() {
        let t = table(4);
        let seat = t.to_act().unwrap();
        let config = TableConfig {
            personality: Personality::Aggressive,
            seed: Some(4),
            ..TableConfig::default()
        };
        let mut ai = create_ai(&config);
        assert!(ai.get_action(&t, 1 - seat).is_none());
        assert!(ai.get_action(&t, seat).is_some());
        assert_eq!(ai.name(), "HeuristicAI(aggressive)");
    }

    #[test]
    fn configured_personality_drives_the_opponent() {
        let t = table(21);
        let seat = t.to_act().unwrap();
        for personality in [
            Personality::Aggressive,
            Personality::Conservative,
            Personality::Balanced,
        ] {
            let config = TableConfig {
                personality,
                seed: Some(21),
                ..TableConfig::default()
            };
            let mut ai = HeuristicAI::from_config(&config);
            assert_eq!(ai.personality(), personality);
            assert_eq!(ai.name(), format!("HeuristicAI({personality})"));

            let mut rng = ChaCha20Rng::seed_from_u64(21);
            let expected = get_ai_action(&t, personality, &mut rng);
            assert_eq!(ai.get_action(&t, seat), expected);
        }
    }

    #[test]
    fn loaded_config_personality_reaches_the_opponent() {
        let config = TableConfig::from_toml_str("personality = \"conservative\"\n").unwrap();
        let ai = create_ai(&config);
        assert_eq!(ai.name(), "HeuristicAI(conservative)");
    }
}
