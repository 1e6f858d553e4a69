//! League table parser for the mobile Naver Sports record page.
//!
//! Class names on that page carry build hashes (`TableBody_item__eCenH`), so
//! every selector matches on the stable prefix only.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::text::squashed_text;
use crate::models::RankingRow;

/// Container that only exists once the table has rendered
pub const RANKINGS_CONTAINER: &str = "ol[class*='TableBody_list__']";
pub const RANKINGS_ROW: &str = "li[class*='TableBody_item__']";

/// Cells per row: team, win rate, games behind, wins, draws, losses, ...
const MIN_CELLS: usize = 6;

struct RankingSelectors {
    container: Selector,
    row: Selector,
    cell: Selector,
    team_name: Selector,
    ranking: Selector,
    emblem: Selector,
    blind: Selector,
}

static SELECTORS: LazyLock<RankingSelectors> = LazyLock::new(|| RankingSelectors {
    container: parse(RANKINGS_CONTAINER),
    row: parse(RANKINGS_ROW),
    cell: parse("div[class*='TableBody_cell__']"),
    team_name: parse("[class*='TeamInfo_team_name__']"),
    ranking: parse("[class*='TeamInfo_ranking__']"),
    emblem: parse("[class*='TeamInfo_emblem__'] img"),
    blind: parse("span.blind"),
});

fn parse(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {:?}: {}", css, e))
}

/// Extract every parseable team row. Rows without a team name or a numeric
/// rank are dropped.
pub fn parse_rankings(html: &str) -> Vec<RankingRow> {
    let document = Html::parse_document(html);
    let s = &*SELECTORS;

    let Some(table) = document.select(&s.container).next() else {
        debug!("Ranking container not found in document");
        return Vec::new();
    };

    table.select(&s.row).filter_map(parse_row).collect()
}

fn parse_row(row: ElementRef<'_>) -> Option<RankingRow> {
    let s = &*SELECTORS;
    let cells: Vec<ElementRef<'_>> = row.select(&s.cell).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let team_info = cells[0];
    let team_name = team_info
        .select(&s.team_name)
        .next()
        .map(squashed_text)
        .filter(|name| !name.is_empty())?;
    let rank = team_info
        .select(&s.ranking)
        .next()
        .map(squashed_text)
        .and_then(|text| parse_rank(&text))?;
    let logo_url = team_info
        .select(&s.emblem)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    Some(RankingRow {
        rank,
        team_name,
        logo_url,
        gb: stat_text(cells[2]),
        wins: stat_text(cells[3]),
        draws: stat_text(cells[4]),
        losses: stat_text(cells[5]),
    })
}

/// "3위" -> 3
fn parse_rank(text: &str) -> Option<u32> {
    text.trim().trim_end_matches('위').trim().parse().ok()
}

/// Stat cells render as `<span class="blind">승</span>80`; the value is the
/// text right after the screen-reader label, or the whole cell otherwise.
fn stat_text(cell: ElementRef<'_>) -> String {
    let after_label = cell
        .select(&SELECTORS.blind)
        .next()
        .and_then(|blind| blind.next_sibling())
        .map(|node| match node.value() {
            Node::Text(text) => {
                let s: &str = &text.text;
                s.trim().to_string()
            }
            Node::Element(_) => ElementRef::wrap(node).map(squashed_text).unwrap_or_default(),
            _ => String::new(),
        })
        .filter(|s| !s.is_empty());

    after_label.unwrap_or_else(|| squashed_text(cell))
}
