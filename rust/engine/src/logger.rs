use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Phase;
use crate::rules::ValidatedAction;

/// A single accepted action.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub phase: Phase,
    pub action: ValidatedAction,
}

/// Which seats took the pot at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<usize>,
    /// e.g. "Pair of Kings, Ace kicker" or "split pot"
    #[serde(default)]
    pub notes: Option<String>,
}

/// History of one hand, from blinds to pot award.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// YYYYMMDD-NNNNNN
    pub hand_id: String,
    pub seed: Option<u64>,
    pub small_blind: usize,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub result: Option<String>,
    /// RFC 3339, stamped when the hand finishes
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

impl HandRecord {
    pub fn new(hand_id: String, seed: Option<u64>, small_blind: usize) -> Self {
        Self {
            hand_id,
            seed,
            small_blind,
            actions: Vec::new(),
            board: Vec::new(),
            result: None,
            ts: None,
            showdown: None,
        }
    }

    pub(crate) fn stamp(&mut self) {
        if self.ts.is_none() {
            self.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Issues sequential hand ids for the current UTC date.
#[derive(Debug, Clone)]
pub struct HandIds {
    date: String,
    seq: u32,
}

impl HandIds {
    pub fn new() -> Self {
        Self::with_date(&Utc::now().format("%Y%m%d").to_string())
    }

    pub fn with_date(date: &str) -> Self {
        Self {
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }
}

impl Default for HandIds {
    fn default() -> Self {
        Self::new()
    }
}
