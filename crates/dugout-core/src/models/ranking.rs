use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::time::kst;

/// One team's line in the league table.
///
/// Win/draw/loss counts and games-behind are kept as the site renders them
/// ("-" for the leader's games-behind, "0.5" for half games).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: u32,
    pub team_name: String,
    #[serde(rename = "logo", alias = "logo_url", default)]
    pub logo_url: String,
    #[serde(default)]
    pub gb: String,
    #[serde(default)]
    pub wins: String,
    #[serde(default)]
    pub draws: String,
    #[serde(default)]
    pub losses: String,
}

/// The complete ranking table plus the time it was scraped.
///
/// Replaced as a unit; `updated_at` is only ever set together with a
/// non-empty `rankings` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rankings: Vec<RankingRow>,
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` taken as Korean
/// local time (older caches were written that way).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()?
        .and_local_timezone(kst())
        .single()
        .map(|at| at.with_timezone(&Utc))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp {:?}", raw)))
        })
        .transpose()
}

impl RankingSnapshot {
    pub fn new(rankings: Vec<RankingRow>, updated_at: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(updated_at),
            rankings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.updated_at.map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let Some(minutes) = self.age_minutes() else {
            return "never".to_string();
        };
        if minutes < 1 {
            // Clock skew lands here too
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// A snapshot with no timestamp is always stale.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        match self.updated_at {
            Some(at) => Utc::now() - at > ttl,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: u32, team: &str) -> RankingRow {
        RankingRow {
            rank,
            team_name: team.to_string(),
            logo_url: format!("https://img.example/{}.png", rank),
            gb: "-".to_string(),
            wins: "80".to_string(),
            draws: "2".to_string(),
            losses: "62".to_string(),
        }
    }

    #[test]
    fn test_age_display() {
        let mut snapshot = RankingSnapshot::new(vec![row(1, "LG")], Utc::now());
        assert_eq!(snapshot.age_display(), "just now");

        snapshot.updated_at = Some(Utc::now() - Duration::minutes(5));
        assert_eq!(snapshot.age_display(), "5m ago");

        snapshot.updated_at = Some(Utc::now() - Duration::minutes(95));
        assert_eq!(snapshot.age_display(), "2h ago");

        snapshot.updated_at = Some(Utc::now() - Duration::hours(26));
        assert_eq!(snapshot.age_display(), "1d ago");

        assert_eq!(RankingSnapshot::default().age_display(), "never");
    }

    #[test]
    fn test_is_stale() {
        let ttl = Duration::minutes(10);
        assert!(RankingSnapshot::default().is_stale(ttl));

        let mut snapshot = RankingSnapshot::new(vec![row(1, "LG")], Utc::now());
        assert!(!snapshot.is_stale(ttl));

        snapshot.updated_at = Some(Utc::now() - Duration::minutes(11));
        assert!(snapshot.is_stale(ttl));
    }

    #[test]
    fn test_serializes_logo_field_name() {
        let json = serde_json::to_value(row(3, "한화")).unwrap();
        assert_eq!(json["logo"], "https://img.example/3.png");
        assert!(json.get("logo_url").is_none());

        let parsed: RankingRow = serde_json::from_str(
            r#"{"rank": 2, "team_name": "KIA", "logo_url": "x.png", "gb": "1.5", "wins": "70", "draws": "1", "losses": "60"}"#,
        )
        .unwrap();
        assert_eq!(parsed.logo_url, "x.png");
    }

    #[test]
    fn test_parse_timestamp() {
        use chrono::TimeZone;

        let expected = Utc.with_ymd_and_hms(2025, 8, 1, 3, 34, 56).unwrap();
        assert_eq!(parse_timestamp("2025-08-01T03:34:56Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-08-01T12:34:56+09:00"), Some(expected));
        // No offset: Korean local time
        assert_eq!(parse_timestamp("2025-08-01T12:34:56"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-08-01T12:34:56.123456"),
            Some(expected + Duration::microseconds(123456))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_snapshot_without_offset_deserializes() {
        let snapshot: RankingSnapshot = serde_json::from_str(
            r#"{"updated_at": "2025-08-01T12:34:56.123456", "rankings": [{"rank": 1, "team_name": "LG"}]}"#,
        )
        .unwrap();
        assert!(snapshot.updated_at.is_some());
        assert_eq!(snapshot.rankings.len(), 1);

        let empty: RankingSnapshot = serde_json::from_str(r#"{"updated_at": null, "rankings": []}"#).unwrap();
        assert_eq!(empty, RankingSnapshot::default());
        assert!(serde_json::from_str::<RankingSnapshot>(r#"{"updated_at": "soon"}"#).is_err());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = RankingSnapshot::new(vec![row(1, "LG"), row(2, "한화")], Utc::now());
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let back: RankingSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
