use duel_engine::config::TableConfig;
use duel_engine::engine::{HandEvent, Table};
use duel_engine::errors::{ActionError, GameError};
use duel_engine::game::Phase;
use duel_engine::player::{PlayerAction as A, Position};
use duel_engine::rules::ValidatedAction;

fn table(seed: u64) -> Table {
    let config = TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    };
    Table::new(config, ["alice", "bob"]).expect("valid config")
}

fn chips(t: &Table) -> [u32; 2] {
    [t.players()[0].chips(), t.players()[1].chips()]
}

#[test]
fn start_hand_posts_blinds_and_deals() {
    let mut t = table(1);
    let tr = t.start_hand().unwrap();

    assert_eq!(t.phase(), Phase::Preflop);
    assert_eq!(t.pot(), 15);
    assert_eq!(t.current_bet(), 10);
    assert_eq!(chips(&t), [95, 90]);
    assert_eq!(t.players()[0].position(), Position::SmallBlind);
    assert_eq!(t.players()[1].position(), Position::BigBlind);
    assert_eq!(t.to_act(), Some(0));
    assert!(t.players().iter().all(|p| p.hole_cards().is_some()));
    assert!(t.community_cards().is_empty());

    // hole cards alternate starting with the big blind
    let deal_order: Vec<usize> = tr
        .events
        .iter()
        .filter_map(|e| match e {
            HandEvent::HoleCardDealt { seat, .. } => Some(*seat),
            _ => None,
        })
        .collect();
    assert_eq!(deal_order, vec![1, 0, 1, 0]);

    assert!(matches!(
        tr.events.first(),
        Some(HandEvent::HandStarted {
            small_blind: 0,
            big_blind: 1,
            ..
        })
    ));
    assert_eq!(
        tr.events.last(),
        Some(&HandEvent::PhaseChanged { phase: Phase::Preflop })
    );
    assert_eq!(tr.snapshot, t.snapshot());
}

#[test]
fn limp_and_check_reaches_flop_with_fresh_round() {
    let mut t = table(2);
    t.start_hand().unwrap();

    t.apply_action(0, A::Call).unwrap();
    assert_eq!(t.pot(), 20);
    assert_eq!(t.phase(), Phase::Preflop);
    assert_eq!(t.to_act(), Some(1));

    let tr = t.apply_action(1, A::Call).unwrap();
    assert_eq!(
        tr.events.first(),
        Some(&HandEvent::ActionApplied {
            seat: 1,
            action: ValidatedAction::Check
        })
    );
    assert_eq!(t.phase(), Phase::Flop);
    assert_eq!(t.community_cards().len(), 3);
    assert_eq!(t.current_bet(), 0);
    assert!(t.players().iter().all(|p| p.current_bet() == 0 && !p.has_acted()));
    // big blind opens every street after preflop
    assert_eq!(t.to_act(), Some(1));
    assert!(tr.events.contains(&HandEvent::CardBurned));
}

#[test]
fn streets_reveal_three_one_one() {
    let mut t = table(3);
    t.start_hand().unwrap();
    let mut seen = Vec::new();
    while let Some(seat) = t.to_act() {
        let tr = t.apply_action(seat, A::Call).unwrap();
        for e in tr.events {
            if let HandEvent::CommunityDealt { phase, cards } = e {
                seen.push((phase, cards.len()));
            }
        }
    }
    assert_eq!(
        seen,
        vec![(Phase::Flop, 3), (Phase::Turn, 1), (Phase::River, 1)]
    );
    assert_eq!(t.phase(), Phase::Showdown);
    assert!(t.showdown().is_some());
    assert_eq!(t.pot(), 0);
    assert_eq!(chips(&t).iter().sum::<u32>(), 200);
}

#[test]
fn out_of_turn_is_rejected_without_side_effects() {
    let mut t = table(4);
    t.start_hand().unwrap();
    let before = t.snapshot();

    let err = t.apply_action(1, A::Raise(10)).unwrap_err();
    assert_eq!(
        err,
        ActionError::OutOfTurn {
            expected: 0,
            actual: 1
        }
    );
    assert_eq!(t.snapshot(), before);

    assert_eq!(t.apply_action(7, A::Fold).unwrap_err(), ActionError::UnknownPlayer(7));
    assert_eq!(t.snapshot(), before);
}

#[test]
fn invalid_raise_leaves_table_unchanged() {
    let mut t = table(5);
    t.start_hand().unwrap();
    let before = t.snapshot();
    assert!(matches!(
        t.apply_action(0, A::Raise(2)),
        Err(ActionError::RaiseBelowMinimumIncrement { amount: 2, minimum: 5 })
    ));
    assert!(matches!(
        t.apply_action(0, A::Raise(500)),
        Err(ActionError::RaiseExceedsOwnStack { .. })
    ));
    assert_eq!(t.snapshot(), before);
}

#[test]
fn no_actions_between_hands() {
    let mut t = table(6);
    assert_eq!(
        t.apply_action(0, A::Call).unwrap_err(),
        ActionError::InvalidPhaseForAction(Phase::Waiting)
    );
    t.start_hand().unwrap();
    assert_eq!(t.start_hand().unwrap_err(), GameError::HandInProgress);
}

#[test]
fn raise_reopens_action_for_opponent() {
    let mut t = table(7);
    t.start_hand().unwrap();

    t.apply_action(0, A::Raise(10)).unwrap();
    assert_eq!(t.current_bet(), 20);
    assert_eq!(t.pot(), 30);
    assert_eq!(t.players()[0].chips(), 80);
    assert_eq!(t.to_act(), Some(1));
    assert!(!t.players()[1].has_acted());

    t.apply_action(1, A::Call).unwrap();
    assert_eq!(t.pot(), 40);
    assert_eq!(t.phase(), Phase::Flop);
}

#[test]
fn fold_awards_pot_and_rotates_blinds() {
    let mut t = table(8);
    t.start_hand().unwrap();

    let tr = t.apply_action(0, A::Fold).unwrap();
    assert!(tr.events.contains(&HandEvent::PotAwarded { seat: 1, amount: 15 }));
    assert_eq!(chips(&t), [95, 105]);
    assert_eq!(t.phase(), Phase::Waiting);
    assert_eq!(t.to_act(), None);
    assert!(t.winner().is_none());

    t.start_hand().unwrap();
    assert_eq!(t.state().small_blind_index(), 1);
    assert_eq!(t.players()[1].position(), Position::SmallBlind);
    assert_eq!(t.to_act(), Some(1));
    assert_eq!(chips(&t), [85, 100]);
    assert_eq!(t.hands_played(), 2);
}

#[test]
fn configured_first_small_blind() {
    let mut t = table(9).with_small_blind(1);
    t.start_hand().unwrap();
    assert_eq!(t.to_act(), Some(1));
    assert_eq!(chips(&t), [90, 95]);
}

#[test]
fn finished_hand_is_recorded() {
    let mut t = table(10);
    t.start_hand().unwrap();
    t.apply_action(0, A::Call).unwrap();
    t.apply_action(1, A::Fold).unwrap();

    let rec = t.last_hand().expect("record");
    let (date, seq) = rec.hand_id.split_once('-').unwrap();
    assert_eq!(date.len(), 8);
    assert_eq!(seq, "000001");
    assert_eq!(rec.seed, Some(10));
    assert_eq!(rec.actions.len(), 2);
    assert_eq!(rec.actions[1].action, ValidatedAction::Fold);
    assert!(rec.ts.is_some());
    assert!(rec.result.as_deref().unwrap_or_default().contains("uncontested"));
    assert!(!rec.to_json_line().unwrap().contains('\n'));
}

#[test]
fn seeded_tables_replay_identically() {
    let run = |seed| {
        let mut t = table(seed);
        t.start_hand().unwrap();
        while let Some(seat) = t.to_act() {
            t.apply_action(seat, A::Call).unwrap();
        }
        (t.community_cards().to_vec(), chips(&t))
    };
    assert_eq!(run(77), run(77));
}
