//! Game-card parser for the KBO game center.
//!
//! The card markup differs between page versions, so each field is filled
//! by a chain of strategies, each one only consulted for fields the earlier
//! ones left empty:
//!
//! 1. attributes on the card element (`home_nm`, `away_nm`, `g_id`, `g_dt`)
//! 2. team emblem `alt` text
//! 3. a free-text "A vs B" pattern in the card
//! 4. `gameId=` / `gameDate=` parameters of the detail link

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::text::{attr, spaced_text};
use crate::models::{ScheduleEntry, TodayMatch};

pub const GAME_CARD: &str = "li.game-cont";
const GAME_CARD_LOOSE: &str = "li[class*='game-cont']";

struct CardSelectors {
    card: Selector,
    card_loose: Selector,
    home_emblem: Selector,
    away_emblem: Selector,
    detail_link: Selector,
}

static SELECTORS: LazyLock<CardSelectors> = LazyLock::new(|| CardSelectors {
    card: parse(GAME_CARD),
    card_loose: parse(GAME_CARD_LOOSE),
    home_emblem: parse(".team.home .emb img"),
    away_emblem: parse(".team.away .emb img"),
    detail_link: parse("a[href*='GameCenter/Main.aspx'][href*='gameId='][href*='gameDate=']"),
});

static VERSUS: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?i)([A-Za-z가-힣]+)\s*vs\s*([A-Za-z가-힣]+)"));
static GAME_ID_PARAM: LazyLock<Regex> = LazyLock::new(|| regex(r"gameId=([A-Z0-9]+)"));
static GAME_DATE_PARAM: LazyLock<Regex> = LazyLock::new(|| regex(r"gameDate=(\d{8})"));

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {:?}: {}", css, e))
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex {:?}: {}", pattern, e))
}

/// Whatever could be recovered from one game card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameCard {
    pub home: Option<String>,
    pub away: Option<String>,
    pub game_id: Option<String>,
    pub game_date: Option<String>,
}

impl GameCard {
    fn has_teams(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }

    fn has_ids(&self) -> bool {
        self.game_id.is_some() && self.game_date.is_some()
    }

    /// A schedule entry, only when all four fields were found.
    pub fn to_entry(&self) -> Option<ScheduleEntry> {
        Some(ScheduleEntry {
            home: self.home.clone()?,
            away: self.away.clone()?,
            game_id: self.game_id.clone()?,
            game_date: self.game_date.clone()?,
        })
    }

    /// The card as seen from `team`, if both sides are known and `team` is one.
    pub fn match_for(&self, team: &str) -> Option<TodayMatch> {
        let home = self.home.as_deref()?;
        let away = self.away.as_deref()?;
        let rival = if away == team {
            home
        } else if home == team {
            away
        } else {
            return None;
        };
        Some(TodayMatch {
            home: home.to_string(),
            away: away.to_string(),
            rival: rival.to_string(),
            game_id: self.game_id.clone(),
            game_date: self.game_date.clone(),
        })
    }
}

/// Every game card in the document.
pub fn parse_game_cards(html: &str) -> Vec<GameCard> {
    let document = Html::parse_document(html);
    let s = &*SELECTORS;

    let mut cards: Vec<ElementRef<'_>> = document.select(&s.card).collect();
    if cards.is_empty() {
        cards = document.select(&s.card_loose).collect();
    }
    cards.into_iter().map(extract_card).collect()
}

/// Complete schedule entries only; partial cards are dropped.
pub fn parse_schedule(html: &str) -> Vec<ScheduleEntry> {
    parse_game_cards(html)
        .iter()
        .filter_map(GameCard::to_entry)
        .collect()
}

pub fn extract_card(card: ElementRef<'_>) -> GameCard {
    let mut info = from_attributes(card);
    if !info.has_teams() {
        fill_from_emblems(card, &mut info);
    }
    if !info.has_teams() {
        fill_from_text(card, &mut info);
    }
    if !info.has_ids() {
        fill_from_detail_link(card, &mut info);
    }
    info
}

fn from_attributes(card: ElementRef<'_>) -> GameCard {
    GameCard {
        home: attr(card, "home_nm"),
        away: attr(card, "away_nm"),
        game_id: attr(card, "g_id"),
        game_date: attr(card, "g_dt"),
    }
}

fn fill_from_emblems(card: ElementRef<'_>, info: &mut GameCard) {
    let s = &*SELECTORS;
    if info.away.is_none() {
        info.away = card.select(&s.away_emblem).next().and_then(|img| attr(img, "alt"));
    }
    if info.home.is_none() {
        info.home = card.select(&s.home_emblem).next().and_then(|img| attr(img, "alt"));
    }
}

/// Cards list the away side first: "LG vs 두산" is LG at 두산.
fn fill_from_text(card: ElementRef<'_>, info: &mut GameCard) {
    let text = spaced_text(card);
    if let Some(caps) = VERSUS.captures(&text) {
        if info.away.is_none() {
            info.away = Some(caps[1].to_string());
        }
        if info.home.is_none() {
            info.home = Some(caps[2].to_string());
        }
    }
}

fn fill_from_detail_link(card: ElementRef<'_>, info: &mut GameCard) {
    let Some(href) = card
        .select(&SELECTORS.detail_link)
        .next()
        .and_then(|a| a.value().attr("href"))
    else {
        return;
    };
    if info.game_id.is_none() {
        info.game_id = GAME_ID_PARAM.captures(href).map(|c| c[1].to_string());
    }
    if info.game_date.is_none() {
        info.game_date = GAME_DATE_PARAM.captures(href).map(|c| c[1].to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fixtures::SCHEDULE_PAGE;

    #[test]
    fn test_each_fallback_stage() {
        let cards = parse_game_cards(SCHEDULE_PAGE);
        assert_eq!(cards.len(), 5);

        // Attributes only
        assert_eq!(
            cards[0],
            GameCard {
                home: Some("LG".into()),
                away: Some("두산".into()),
                game_id: Some("20250401OBLG0".into()),
                game_date: Some("20250401".into()),
            }
        );

        // Emblem alt text for teams, detail link for identifiers
        assert_eq!(cards[1].home.as_deref(), Some("한화"));
        assert_eq!(cards[1].away.as_deref(), Some("KIA"));
        assert_eq!(cards[1].game_id.as_deref(), Some("20250401HTHH0"));
        assert_eq!(cards[1].game_date.as_deref(), Some("20250401"));

        // Free text, away side first
        assert_eq!(cards[2].away.as_deref(), Some("SSG"));
        assert_eq!(cards[2].home.as_deref(), Some("NC"));

        // Attribute wins over emblem for the field it provides
        assert_eq!(cards[3].home.as_deref(), Some("삼성"));
        assert_eq!(cards[3].away.as_deref(), Some("KT"));

        // Nothing to go on
        assert_eq!(cards[4].home, None);
    }

    #[test]
    fn test_parse_schedule_drops_incomplete_cards() {
        let entries = parse_schedule(SCHEDULE_PAGE);
        let ids: Vec<&str> = entries.iter().map(|e| e.game_id.as_str()).collect();
        assert_eq!(ids, vec!["20250401OBLG0", "20250401HTHH0", "20250401SKNC0", "20250401KTSS0"]);
    }

    #[test]
    fn test_loose_card_selector() {
        let html = r#"<ul><li class="game-cont-new" home_nm="키움" away_nm="롯데" g_id="20250401LTWO0" g_dt="20250401"></li></ul>"#;
        let entries = parse_schedule(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].home, "키움");
    }

    #[test]
    fn test_match_for() {
        let cards = parse_game_cards(SCHEDULE_PAGE);
        let m = cards[0].match_for("두산").unwrap();
        assert_eq!(m.rival, "LG");
        assert_eq!(m.game_id.as_deref(), Some("20250401OBLG0"));
        assert!(cards[0].match_for("KIA").is_none());
        assert!(cards[4].match_for("KIA").is_none());
    }
}
