use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of recent games shown per team
pub const RECENT_GAMES: usize = 5;

/// Placeholder shown for games not yet played or not found
pub const NO_RESULT: &str = "-";

/// Teams in the league, in the order the recent-results page lists them.
pub const TEAMS: [&str; 10] = ["한화", "LG", "롯데", "KIA", "SSG", "KT", "삼성", "NC", "두산", "키움"];

pub fn is_known_team(team: &str) -> bool {
    TEAMS.contains(&team)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "승" => Some(Outcome::Win),
            "패" => Some(Outcome::Loss),
            "무" => Some(Outcome::Draw),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Outcome::Win => "승",
            Outcome::Loss => "패",
            Outcome::Draw => "무",
        }
    }
}

/// A team's most recent results, newest first, as outcome tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentResults {
    pub team: String,
    pub results: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl RecentResults {
    /// Keep at most five outcomes and pad the rest with placeholders.
    pub fn new(team: &str, outcomes: &[Outcome], fetched_at: DateTime<Utc>) -> Self {
        let mut results: Vec<String> = outcomes
            .iter()
            .take(RECENT_GAMES)
            .map(|o| o.token().to_string())
            .collect();
        results.resize(RECENT_GAMES, NO_RESULT.to_string());
        Self {
            team: team.to_string(),
            results,
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_five() {
        let recent = RecentResults::new("LG", &[Outcome::Win, Outcome::Draw], Utc::now());
        assert_eq!(recent.results, vec!["승", "무", "-", "-", "-"]);
    }

    #[test]
    fn test_truncates_to_five() {
        let outcomes = [Outcome::Loss; 7];
        let recent = RecentResults::new("KT", &outcomes, Utc::now());
        assert_eq!(recent.results, vec!["패"; 5]);
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Outcome::from_token(" 승 "), Some(Outcome::Win));
        assert_eq!(Outcome::from_token("취소"), None);
        assert!(is_known_team("키움"));
        assert!(!is_known_team("Yankees"));
    }
}
