//! Data models for scraped KBO statistics.
//!
//! - `RankingRow`, `RankingSnapshot`: the league table and its refresh time
//! - `ScheduleEntry`, `RuntimeRecord`, `TodayMatch`: per-game data used to
//!   compute average game durations
//! - `RecentResults`, `Outcome`: a team's last five results

pub mod game;
pub mod ranking;
pub mod recent;

pub use game::{runtime_key, RuntimeIndex, RuntimeRecord, ScheduleEntry, ScheduleIndex, TodayMatch};
pub use ranking::{RankingRow, RankingSnapshot};
pub use recent::{Outcome, RecentResults, TEAMS};
