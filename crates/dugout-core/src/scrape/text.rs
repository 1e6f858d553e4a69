use scraper::ElementRef;

/// All text nodes trimmed and concatenated: `<b> 3 </b><i>위</i>` -> "3위".
pub fn squashed_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// All text nodes trimmed and joined by single spaces.
pub fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed attribute value, `None` when missing or blank.
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
