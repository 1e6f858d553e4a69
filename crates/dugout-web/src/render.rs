//! Plain HTML pages. Every interpolated value goes through [`escape`].

use axum::response::Html;
use dugout_core::classify::DurationBand;
use dugout_core::models::{RankingSnapshot, RecentResults, TEAMS};

use crate::handlers::hour::HourView;

const STYLE: &str = "\
body{font-family:sans-serif;margin:1.5rem;color:#222}\
table{border-collapse:collapse}td,th{padding:.3rem .6rem;border-bottom:1px solid #ddd;text-align:center}\
img.logo{width:24px;height:24px;vertical-align:middle}\
.fast{color:#1b7f3b}.normal{color:#1f5fa8}.bit-long{color:#c77700}.long{color:#b3261e}\
.muted{color:#777;font-size:.9rem}\
.W{color:#1f5fa8}.L{color:#b3261e}.D{color:#777}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"ko\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape(title),
        STYLE,
        body
    ))
}

pub fn dashboard() -> Html<String> {
    page(
        "KBO",
        "<h1>KBO</h1><ul>\
         <li><a href=\"/team-ranking\">팀 순위</a></li>\
         <li><a href=\"/hour\">평균 경기시간</a></li>\
         <li><a href=\"/recent\">최근 5경기</a></li>\
         </ul>",
    )
}

pub fn ranking_page(snapshot: &RankingSnapshot) -> Html<String> {
    let mut body = String::from("<h1>팀 순위</h1>");
    let updated = match snapshot.updated_at {
        Some(at) => format!("{} ({})", at.with_timezone(&dugout_core::time::kst()).format("%Y-%m-%d %H:%M"), snapshot.age_display()),
        None => "-".to_string(),
    };
    body.push_str(&format!("<p class=\"muted\">업데이트: {}</p>", escape(&updated)));

    if snapshot.is_empty() {
        body.push_str("<p>순위 정보를 불러오지 못했습니다.</p>");
        return page("팀 순위", &body);
    }

    body.push_str("<table><tr><th>순위</th><th>팀</th><th>승</th><th>무</th><th>패</th><th>게임차</th></tr>");
    for row in &snapshot.rankings {
        let logo = if row.logo_url.is_empty() {
            String::new()
        } else {
            format!(
                "<img class=\"logo\" alt=\"\" src=\"/proxy-logo?url={}\"> ",
                escape(&urlencoding::encode(&row.logo_url))
            )
        };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.rank,
            logo,
            escape(&row.team_name),
            escape(&row.wins),
            escape(&row.draws),
            escape(&row.losses),
            escape(&row.gb)
        ));
    }
    body.push_str("</table>");
    page("팀 순위", &body)
}

pub fn hour_page(view: &HourView) -> Html<String> {
    let mut body = String::from("<h1>평균 경기시간</h1><form method=\"post\" action=\"/hour\"><select name=\"myteam\">");
    body.push_str("<option value=\"\">팀 선택</option>");
    for team in TEAMS {
        let selected = if view.team.as_deref() == Some(team) { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(team),
            selected
        ));
    }
    body.push_str("</select> <button type=\"submit\">확인</button></form>");

    for line in &view.lines {
        body.push_str(&format!("<p>{}</p>", escape(line)));
    }
    if let Some(band) = view.band {
        body.push_str(&band_message(band));
    }
    page("평균 경기시간", &body)
}

fn band_message(band: DurationBand) -> String {
    format!(
        "<p class=\"{}\"><strong>{}</strong></p>",
        band.css_class(),
        escape(band.message())
    )
}

pub fn recent_page(results: &[RecentResults]) -> Html<String> {
    let mut body = String::from("<h1>최근 5경기</h1><table><tr><th>팀</th><th colspan=\"5\">결과</th></tr>");
    for team in results {
        body.push_str(&format!("<tr><td>{}</td>", escape(&team.team)));
        for token in &team.results {
            let class = match token.as_str() {
                "승" => "W",
                "패" => "L",
                "무" => "D",
                _ => "muted",
            };
            body.push_str(&format!("<td class=\"{}\">{}</td>", class, escape(token)));
        }
        body.push_str("</tr>");
    }
    body.push_str("</table>");
    page("최근 5경기", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape("한화"), "한화");
    }

    #[test]
    fn test_ranking_page_proxies_encoded_logo() {
        let snapshot = RankingSnapshot::new(
            vec![dugout_core::models::RankingRow {
                rank: 1,
                team_name: "LG".to_string(),
                logo_url: "https://img.example/a b.png?x=1".to_string(),
                gb: "-".to_string(),
                wins: "85".to_string(),
                draws: "3".to_string(),
                losses: "56".to_string(),
            }],
            chrono::Utc::now(),
        );
        let Html(html) = ranking_page(&snapshot);
        assert!(html.contains("src=\"/proxy-logo?url=https%3A%2F%2Fimg.example%2Fa%20b.png%3Fx%3D1\""));
    }

    #[test]
    fn test_hour_page_marks_selected_team_and_band() {
        let view = HourView {
            team: Some("KIA".to_string()),
            lines: vec!["오늘 KIA의 상대팀은 <한화>입니다.".to_string()],
            average_minutes: Some(180.0),
            band: Some(DurationBand::Normal),
        };
        let Html(html) = hour_page(&view);
        assert!(html.contains("<option value=\"KIA\" selected>KIA</option>"));
        assert!(html.contains("&lt;한화&gt;"));
        assert!(html.contains("class=\"normal\""));
    }
}
