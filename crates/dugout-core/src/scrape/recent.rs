//! Recent results column of the team-rank page.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::text::squashed_text;
use crate::models::recent::RECENT_GAMES;
use crate::models::Outcome;

pub const TEAM_ROW: &str = "li[class*='TableBody_item__']";

struct RecentSelectors {
    row: Selector,
    team_name: Selector,
    result: Selector,
}

static SELECTORS: LazyLock<RecentSelectors> = LazyLock::new(|| RecentSelectors {
    row: parse(TEAM_ROW),
    team_name: parse("[class*='TeamInfo_team_name__']"),
    result: parse("div[class*='ResultInfo_result__'] > span.blind"),
});

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {:?}: {}", css, e))
}

/// Last five outcomes for every team on the page, keyed by team name.
/// Tokens other than win/loss/draw (e.g. rain-outs) are skipped.
pub fn parse_recent_results(html: &str) -> HashMap<String, Vec<Outcome>> {
    let document = Html::parse_document(html);
    let s = &*SELECTORS;

    document
        .select(&s.row)
        .filter_map(|row| {
            let team = row.select(&s.team_name).next().map(squashed_text)?;
            if team.is_empty() {
                return None;
            }
            let outcomes = row
                .select(&s.result)
                .filter_map(|span| Outcome::from_token(&squashed_text(span)))
                .take(RECENT_GAMES)
                .collect();
            Some((team, outcomes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fixtures::RECENT_PAGE;

    #[test]
    fn test_parse_recent_results() {
        let recent = parse_recent_results(RECENT_PAGE);
        assert_eq!(recent.len(), 2);
        assert_eq!(
            recent["LG"],
            vec![Outcome::Win, Outcome::Win, Outcome::Loss, Outcome::Draw, Outcome::Win]
        );
        // Cancelled games are skipped
        assert_eq!(recent["한화"], vec![Outcome::Loss, Outcome::Win]);
    }

    #[test]
    fn test_unknown_layout() {
        assert!(parse_recent_results("<p>no table</p>").is_empty());
    }
}
