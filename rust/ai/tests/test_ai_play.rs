use duel_ai::{create_ai, get_ai_action, play_ai_turn, AIAction};
use duel_engine::config::{Personality, TableConfig};
use duel_engine::engine::Table;
use duel_engine::game::Phase;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const MAX_HANDS: u32 = 2_000;

fn table(seed: u64) -> Table {
    let config = TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    };
    Table::new(config, ["left", "right"]).unwrap()
}

// Plays AI against AI until someone busts or the hand cap is hit.
fn play_match(seed: u64, personalities: [Personality; 2]) -> Table {
    let mut t = table(seed);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    while t.winner().is_none() && t.hands_played() < MAX_HANDS {
        t.start_hand().unwrap();
        while let Some(seat) = t.to_act() {
            play_ai_turn(&mut t, seat, personalities[seat], &mut rng)
                .unwrap_or_else(|e| panic!("ai made an illegal move: {e}"));
            assert_eq!(t.state().total_chips(), 200);
        }
        assert!(matches!(t.phase(), Phase::Waiting | Phase::Showdown));
    }
    t
}

#[test]
fn ai_matches_stay_legal_and_conserve_chips() {
    let pairings = [
        [Personality::Aggressive, Personality::Conservative],
        [Personality::Balanced, Personality::Balanced],
        [Personality::Conservative, Personality::Aggressive],
    ];
    for (i, pair) in pairings.into_iter().enumerate() {
        let t = play_match(100 + i as u64, pair);
        let stacks: u32 = t.players().iter().map(|p| p.chips()).sum();
        assert_eq!(stacks + t.pot(), 200);
        if let Some(w) = t.winner() {
            assert!(t.players()[1 - w].chips() < 10);
        }
    }
}

#[test]
fn same_seed_same_match() {
    let a = play_match(7, [Personality::Balanced, Personality::Aggressive]);
    let b = play_match(7, [Personality::Balanced, Personality::Aggressive]);
    assert_eq!(a.hands_played(), b.hands_played());
    assert_eq!(a.winner(), b.winner());
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn boxed_opponent_plays_a_hand() {
    let mut t = table(11);
    let configs = [
        TableConfig {
            personality: Personality::Conservative,
            seed: Some(1),
            ..TableConfig::default()
        },
        TableConfig {
            personality: Personality::Aggressive,
            seed: Some(2),
            ..TableConfig::default()
        },
    ];
    let mut ais = configs.each_ref().map(create_ai);
    t.start_hand().unwrap();
    while let Some(seat) = t.to_act() {
        let decision = ais[seat].get_action(&t, seat).expect("seat to act");
        t.apply_action(seat, decision.to_action()).unwrap();
    }
    assert_eq!(t.state().total_chips(), 200);
    assert!(t.last_hand().is_some());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ai_raises_fit_table_limits(seed in any::<u64>(), steps in 1usize..40) {
        let mut t = table(seed);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        for _ in 0..steps {
            if t.winner().is_some() {
                break;
            }
            if t.to_act().is_none() {
                t.start_hand().unwrap();
            }
            let seat = t.to_act().unwrap();
            let d = get_ai_action(&t, Personality::Aggressive, &mut rng).unwrap();
            if let AIAction::Raise(amount) = d.action {
                prop_assert!(amount >= t.config().min_raise);
                prop_assert_eq!(amount % t.config().min_raise, 0);
            }
            prop_assert!(t.apply_action(seat, d.to_action()).is_ok());
        }
    }
}
