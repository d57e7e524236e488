use std::io::Write;

use duel_engine::config::{load, load_with_sources, Personality, TableConfig, ValueSource};
use duel_engine::engine::Table;
use duel_engine::errors::ConfigError;
use serial_test::serial;
use tempfile::NamedTempFile;

const VARS: [&str; 4] = ["DUEL_CONFIG", "DUEL_SEED", "DUEL_STACK", "DUEL_PERSONALITY"];

fn clear_env() {
    for k in VARS {
        std::env::remove_var(k);
    }
}

fn config_file(body: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f
}

#[test]
#[serial]
fn defaults_without_file_or_env() {
    clear_env();
    let resolved = load_with_sources().unwrap();
    assert_eq!(resolved.config, TableConfig::default());
    assert_eq!(resolved.sources.seed, ValueSource::Default);
    assert_eq!(resolved.sources.personality, ValueSource::Default);
}

#[test]
#[serial]
fn file_values_are_applied() {
    clear_env();
    let f = config_file("starting_stack = 200\npersonality = \"conservative\"\nseed = 5\n");
    std::env::set_var("DUEL_CONFIG", f.path());

    let resolved = load_with_sources().unwrap();
    assert_eq!(resolved.config.starting_stack, 200);
    assert_eq!(resolved.config.personality, Personality::Conservative);
    assert_eq!(resolved.config.seed, Some(5));
    assert_eq!(resolved.sources.starting_stack, ValueSource::File);
    assert_eq!(resolved.sources.seed, ValueSource::File);
    clear_env();
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let f = config_file("seed = 5\npersonality = \"conservative\"\n");
    std::env::set_var("DUEL_CONFIG", f.path());
    std::env::set_var("DUEL_SEED", "99");
    std::env::set_var("DUEL_PERSONALITY", "aggressive");

    let resolved = load_with_sources().unwrap();
    assert_eq!(resolved.config.seed, Some(99));
    assert_eq!(resolved.config.personality, Personality::Aggressive);
    assert_eq!(resolved.sources.seed, ValueSource::Env);
    assert_eq!(resolved.sources.personality, ValueSource::Env);
    assert_eq!(resolved.sources.starting_stack, ValueSource::Default);
    clear_env();
}

#[test]
#[serial]
fn bad_env_values_are_errors() {
    clear_env();
    std::env::set_var("DUEL_SEED", "not-a-number");
    assert!(matches!(load(), Err(ConfigError::Invalid(_))));
    clear_env();

    std::env::set_var("DUEL_STACK", "5");
    // a stack smaller than the big blind cannot play
    assert!(matches!(load(), Err(ConfigError::Invalid(_))));

    std::env::set_var("DUEL_STACK", "3000000000");
    assert!(matches!(load(), Err(ConfigError::Invalid(_))));
    clear_env();
}

#[test]
#[serial]
fn missing_or_malformed_file() {
    clear_env();
    std::env::set_var("DUEL_CONFIG", "/definitely/not/here.toml");
    assert!(matches!(load(), Err(ConfigError::Io(_))));

    let f = config_file("starting_stack = \"lots\"\n");
    std::env::set_var("DUEL_CONFIG", f.path());
    assert!(matches!(load(), Err(ConfigError::Parse(_))));
    clear_env();
}

#[test]
fn custom_stakes_flow_into_the_table() {
    let config = TableConfig::from_toml_str(
        "starting_stack = 500\nsmall_blind = 10\nbig_blind = 20\nbust_threshold = 20\nseed = 1\n",
    )
    .unwrap();
    let mut t = Table::new(config, ["a", "b"]).unwrap();
    t.start_hand().unwrap();
    assert_eq!(t.pot(), 30);
    assert_eq!(t.players()[0].chips(), 490);
    assert_eq!(t.players()[1].chips(), 480);
}

#[test]
fn table_rejects_invalid_config() {
    let config = TableConfig {
        small_blind: 0,
        ..TableConfig::default()
    };
    assert!(matches!(
        Table::new(config, ["a", "b"]),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn oversized_stack_never_reaches_the_table() {
    let config = TableConfig {
        starting_stack: 3_000_000_000,
        ..TableConfig::default()
    };
    assert!(matches!(
        Table::new(config, ["a", "b"]),
        Err(ConfigError::Invalid(_))
    ));

    let config = TableConfig {
        starting_stack: u32::MAX / 2,
        seed: Some(1),
        ..TableConfig::default()
    };
    let mut t = Table::new(config, ["a", "b"]).unwrap();
    t.start_hand().unwrap();
    t.apply_action(0, duel_engine::player::PlayerAction::Call).unwrap();
    assert_eq!(t.state().total_chips(), u64::from(u32::MAX / 2) * 2);
}
