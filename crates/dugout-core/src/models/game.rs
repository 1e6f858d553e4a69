use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtime cache keyed by [`runtime_key`].
pub type RuntimeIndex = BTreeMap<String, RuntimeRecord>;

/// Schedule cache keyed by `YYYYMMDD`.
pub type ScheduleIndex = BTreeMap<String, Vec<ScheduleEntry>>;

/// A finished or scheduled game, reduced to the fields needed to look up
/// its runtime later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub home: String,
    pub away: String,
    #[serde(rename = "g_id", alias = "game_id")]
    pub game_id: String,
    /// `YYYYMMDD`
    #[serde(rename = "g_dt", alias = "game_date")]
    pub game_date: String,
}

impl ScheduleEntry {
    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The other side of the game, if `team` played in it.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.away == team {
            Some(&self.home)
        } else if self.home == team {
            Some(&self.away)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRecord {
    #[serde(rename = "runtime_min")]
    pub runtime_minutes: u32,
}

pub fn runtime_key(game_id: &str, game_date: &str) -> String {
    format!("{}_{}", game_id, game_date)
}

/// A game on today's card for a given team.
///
/// Identifiers may be missing for games that have not been published with a
/// detail link yet; only the rival is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayMatch {
    pub home: String,
    pub away: String,
    pub rival: String,
    pub game_id: Option<String>,
    pub game_date: Option<String>,
}
