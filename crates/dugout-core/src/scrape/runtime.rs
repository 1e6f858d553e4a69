//! Game duration from the review panel of a finished game.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::text::{spaced_text, squashed_text};

/// "3:07", "3 : 07", full-width "3：07"
static HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| regex(r"(\d{1,2})\s*[:：]\s*(\d{2})"));

/// Labelled runtime anywhere in the page text, e.g. "경기시간 : 3:07"
static LABELLED_RUNTIME: LazyLock<Regex> =
    LazyLock::new(|| regex(r"경기\s*시간\s*[:：]?\s*(\d{1,2}\s*[:：]\s*\d{2})"));

static REVIEW_RUNTIME: LazyLock<Selector> = LazyLock::new(|| parse("div.record-etc span#txtRunTime"));
static ANY_RUNTIME: LazyLock<Selector> = LazyLock::new(|| parse("#txtRunTime"));
static BODY: LazyLock<Selector> = LazyLock::new(|| parse("body"));

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {:?}: {}", css, e))
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex {:?}: {}", pattern, e))
}

/// "H:MM" -> total minutes.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    let caps = HOURS_MINUTES.captures(text)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Runtime in minutes, looked up in the review panel first, then anywhere
/// the runtime span appears, then in labelled page text.
pub fn parse_runtime(html: &str) -> Option<u32> {
    let document = Html::parse_document(html);

    let from_span = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(squashed_text)
            .and_then(|text| parse_duration_minutes(&text))
    };

    from_span(&*REVIEW_RUNTIME)
        .or_else(|| from_span(&*ANY_RUNTIME))
        .or_else(|| {
            let text = spaced_text(document.select(&BODY).next()?);
            let caps = LABELLED_RUNTIME.captures(&text)?;
            parse_duration_minutes(&caps[1])
        })
}
