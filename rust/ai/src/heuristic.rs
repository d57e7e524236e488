//! Heuristic opponent policy.
//!
//! A pure function of the observable state, the personality and a random
//! source. Randomness only picks between raise and call, and decides bluffs;
//! pass a fixed RNG to pin those branches.

use duel_engine::cards::{Card, Rank};
use duel_engine::config::Personality;
use duel_engine::game::Phase;
use duel_engine::hand::{HandCategory, evaluate_hand};
use duel_engine::player::{Player, PlayerAction};
use duel_engine::rules;
use rand::Rng;

/// What the policy wants to do. `Raise` carries the increment over the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AIAction {
    Fold,
    Call,
    Raise(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AIDecision {
    pub action: AIAction,
    pub reasoning: String,
}

impl AIDecision {
    fn new(action: AIAction, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
        }
    }

    pub fn to_action(&self) -> PlayerAction {
        match self.action {
            AIAction::Fold => PlayerAction::Fold,
            AIAction::Call => PlayerAction::Call,
            AIAction::Raise(amount) => PlayerAction::Raise(amount),
        }
    }
}

/// Everything the policy may look at.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub player: &'a Player,
    pub community: &'a [Card],
    pub current_bet: u32,
    pub pot: u32,
    pub phase: Phase,
    pub active_players: usize,
}

/// Strength cutoffs for raising, calling and the weak-hand fold floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub raise: f64,
    pub call: f64,
    pub fold: f64,
}

impl Thresholds {
    pub fn for_personality(personality: Personality) -> Self {
        match personality {
            Personality::Aggressive => Self {
                raise: 0.6,
                call: 0.3,
                fold: 0.1,
            },
            Personality::Conservative => Self {
                raise: 0.8,
                call: 0.5,
                fold: 0.2,
            },
            Personality::Balanced => Self {
                raise: 0.7,
                call: 0.4,
                fold: 0.15,
            },
        }
    }
}

/// Scales the raise target.
pub fn raise_multiplier(personality: Personality) -> f64 {
    match personality {
        Personality::Aggressive => 1.5,
        Personality::Conservative => 0.7,
        Personality::Balanced => 1.0,
    }
}

fn aggression(personality: Personality) -> f64 {
    match personality {
        Personality::Aggressive => 0.9,
        Personality::Conservative => 0.5,
        Personality::Balanced => 0.7,
    }
}

fn bluff_call_chance(personality: Personality) -> f64 {
    match personality {
        Personality::Aggressive => 0.3,
        Personality::Conservative => 0.1,
        Personality::Balanced => 0.2,
    }
}

fn bluff_raise_chance(personality: Personality) -> f64 {
    match personality {
        Personality::Aggressive => 0.15,
        Personality::Conservative => 0.05,
        Personality::Balanced => 0.1,
    }
}

/// Probability of raising rather than calling with a strong hand. Highest
/// preflop, tapering off by the river.
pub fn raise_probability(strength: f64, personality: Personality, phase: Phase) -> f64 {
    let street = match phase {
        Phase::Preflop => 1.0,
        Phase::Flop => 0.9,
        Phase::Turn => 0.8,
        _ => 0.7,
    };
    (strength * aggression(personality) * street).min(1.0)
}

/// Hand strength in 0..=1: made-hand rank scaled by the phase's potential.
pub fn hand_strength(hole: &[Card; 2], community: &[Card], phase: Phase) -> f64 {
    let made = evaluate_hand(hole, community);
    let base = f64::from(made.rank()) / 10.0;
    let potential = match phase {
        Phase::Preflop => preflop_potential(hole),
        Phase::Flop | Phase::Turn => {
            1.0 + (f64::from(count_outs(hole, community, made.category)) / 20.0).min(1.0)
        }
        _ => 1.0,
    };
    (base * potential).min(1.0)
}

/// Multiplier for two hole cards: pairs scale with rank; suited, connected
/// and high cards add up, an Ace with a big kicker most of all.
pub fn preflop_potential(hole: &[Card; 2]) -> f64 {
    let (a, b) = (hole[0].rank.value(), hole[1].rank.value());
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    if high == low {
        return 2.5 + 0.15 * f64::from(high - 2);
    }
    let mut factor = 1.0;
    if hole[0].suit == hole[1].suit {
        factor += 1.0;
    }
    match high - low {
        1 => factor += 1.0,
        2 => factor += 0.5,
        _ => {}
    }
    if high == Rank::Ace.value() {
        factor += if low >= Rank::Ten.value() { 3.0 } else { 1.0 };
    }
    factor += 0.5 * [high, low].iter().filter(|&&r| r >= Rank::Ten.value()).count() as f64;
    factor
}

/// Outs for draws that use at least one hole card: 9 for a four-card flush
/// draw, 8 for an open-ended straight draw.
pub fn count_outs(hole: &[Card; 2], community: &[Card], made: HandCategory) -> u32 {
    let all: Vec<Card> = hole.iter().chain(community).copied().collect();
    let mut outs = 0;

    if made < HandCategory::Flush {
        let flush_draw = hole.iter().any(|h| {
            all.iter().filter(|c| c.suit == h.suit).count() == 4
        });
        if flush_draw {
            outs += 9;
        }
    }

    if made < HandCategory::Straight {
        let mut present = [false; 15];
        for c in &all {
            present[c.rank.value() as usize] = true;
        }
        let hole_ranks = [hole[0].rank.value(), hole[1].rank.value()];
        let open_ended = (2u8..=10).any(|low| {
            let run = low..=low + 3;
            run.clone().all(|r| present[r as usize])
                && hole_ranks.iter().any(|r| run.contains(r))
        });
        if open_ended {
            outs += 8;
        }
    }
    outs
}

/// Share of the final pot the call represents; 0 when checking is free.
pub fn pot_odds(call_amount: u32, pot: u32) -> f64 {
    if call_amount == 0 {
        return 0.0;
    }
    f64::from(call_amount) / f64::from(pot + call_amount)
}

/// Raise increment before table rounding, clamped to
/// `[call + 1, min(chips - call, 4 * call)]`.
pub fn raise_size(call_amount: u32, chips: u32, strength: f64, personality: Personality) -> u32 {
    let min_raise = call_amount + 1;
    let max_raise = chips.saturating_sub(call_amount).min(call_amount * 4);
    if max_raise < min_raise {
        return min_raise;
    }
    let target =
        f64::from(call_amount) * (1.0 + 2.0 * strength) * raise_multiplier(personality);
    target
        .clamp(f64::from(min_raise), f64::from(max_raise))
        .floor() as u32
}

/// Picks fold, call or raise for the player in `ctx`.
pub fn make_decision<R: Rng + ?Sized>(
    ctx: &DecisionContext<'_>,
    personality: Personality,
    rng: &mut R,
) -> AIDecision {
    let player = ctx.player;
    let Some(hole) = player.hole_cards() else {
        return AIDecision::new(AIAction::Call, "no hole cards dealt, defaulting to call");
    };

    let call = rules::call_amount(player, ctx.current_bet);
    if call > player.chips() {
        return AIDecision::new(AIAction::Fold, format!("cannot cover {call} to call"));
    }

    let strength = hand_strength(&hole, ctx.community, ctx.phase);
    let odds = pot_odds(call, ctx.pot);
    let t = Thresholds::for_personality(personality);
    let heads_up = ctx.active_players == 2;
    let can_raise = player.chips() > call;

    let decision = if strength >= t.raise {
        let p = raise_probability(strength, personality, ctx.phase);
        if can_raise && rng.random::<f64>() < p {
            let amount = raise_size(call, player.chips(), strength, personality);
            AIDecision::new(
                AIAction::Raise(amount),
                format!("strong hand ({strength:.2}), raising"),
            )
        } else {
            AIDecision::new(AIAction::Call, format!("strong hand ({strength:.2}), calling"))
        }
    } else if strength >= t.call {
        if strength >= odds {
            AIDecision::new(
                AIAction::Call,
                format!("strength {strength:.2} beats pot odds {odds:.2}"),
            )
        } else if heads_up
            && ctx.phase != Phase::Preflop
            && rng.random::<f64>() < bluff_call_chance(personality)
        {
            AIDecision::new(AIAction::Call, "calling light against a single opponent")
        } else {
            AIDecision::new(
                AIAction::Fold,
                format!("pot odds {odds:.2} too steep for {strength:.2}"),
            )
        }
    } else if call == 0 {
        AIDecision::new(AIAction::Call, "weak hand, checking for free")
    } else if strength <= 0.2
        && matches!(ctx.phase, Phase::Turn | Phase::River)
        && heads_up
        && odds <= 0.3
        && can_raise
        && rng.random::<f64>() < bluff_raise_chance(personality)
    {
        let amount = raise_size(call, player.chips(), strength, personality);
        AIDecision::new(AIAction::Raise(amount), "bluffing with a weak hand")
    } else if strength > t.fold {
        AIDecision::new(AIAction::Call, format!("marginal hand ({strength:.2}), calling"))
    } else {
        AIDecision::new(AIAction::Fold, format!("weak hand ({strength:.2}), folding"))
    };

    tracing::debug!(
        seat = player.id(),
        phase = ?ctx.phase,
        strength,
        pot_odds = odds,
        action = ?decision.action,
        "ai decision"
    );
    decision
}
