use std::fmt;
use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Opponent play style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Aggressive,
    Conservative,
    #[default]
    Balanced,
}

impl FromStr for Personality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Ok(Personality::Aggressive),
            "conservative" => Ok(Personality::Conservative),
            "balanced" => Ok(Personality::Balanced),
            other => Err(ConfigError::Invalid(format!("unknown personality '{other}'"))),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Personality::Aggressive => "aggressive",
            Personality::Conservative => "conservative",
            Personality::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

/// Table stakes and opponent settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub min_raise: u32,
    /// A stack below this after a pot award ends the match.
    pub bust_threshold: u32,
    pub personality: Personality,
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_stack: 100,
            small_blind: 5,
            big_blind: 10,
            min_raise: 5,
            bust_threshold: 10,
            personality: Personality::Balanced,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 {
            return Err(ConfigError::Invalid("small_blind must be positive".into()));
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::Invalid(
                "big_blind must be at least small_blind".into(),
            ));
        }
        if self.min_raise == 0 {
            return Err(ConfigError::Invalid("min_raise must be positive".into()));
        }
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::Invalid(
                "starting_stack must cover the big blind".into(),
            ));
        }
        // both stacks together must fit in a u32 pot
        if self.starting_stack.checked_mul(2).is_none() {
            return Err(ConfigError::Invalid(format!(
                "starting_stack must be at most {}",
                u32::MAX / 2
            )));
        }
        if self.bust_threshold < self.big_blind {
            return Err(ConfigError::Invalid(
                "bust_threshold must be at least big_blind".into(),
            ));
        }
        Ok(())
    }

    /// Total chips on the table for the whole match.
    pub fn bankroll(&self) -> u64 {
        u64::from(self.starting_stack) * 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub personality: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            personality: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    starting_stack: Option<u32>,
    small_blind: Option<u32>,
    big_blind: Option<u32>,
    min_raise: Option<u32>,
    bust_threshold: Option<u32>,
    personality: Option<Personality>,
    seed: Option<u64>,
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `DUEL_CONFIG`, then `DUEL_SEED`,
/// `DUEL_STACK` and `DUEL_PERSONALITY`.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("DUEL_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.personality {
            cfg.personality = v;
            sources.personality = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        cfg.small_blind = f.small_blind.unwrap_or(cfg.small_blind);
        cfg.big_blind = f.big_blind.unwrap_or(cfg.big_blind);
        cfg.min_raise = f.min_raise.unwrap_or(cfg.min_raise);
        cfg.bust_threshold = f.bust_threshold.unwrap_or(cfg.bust_threshold);
    }

    if let Some(seed) = non_empty_env("DUEL_SEED") {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(stack) = non_empty_env("DUEL_STACK") {
        cfg.starting_stack = stack
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting stack".into()))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(p) = non_empty_env("DUEL_PERSONALITY") {
        cfg.personality = p.parse()?;
        sources.personality = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
