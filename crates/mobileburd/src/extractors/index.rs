// ABOUTME: Front page extraction: page headers and the grouped trip report listing.
// ABOUTME: Relies on positional heuristics tied to the site's current markup.

//! Front page extractor.
//!
//! The front page has no semantic markup. Everything here is located by
//! position: the first `<td>`, the second `<p>` after the first `<nobr>`, the
//! second link into `challenge/`. The yearly report tables are found through
//! their `<font>` header, which happens to be the only place that legacy tag
//! is used on the page. All of these rules are brittle to upstream markup
//! changes; a missing anchor surfaces as `MalformedSourcePage`.

use scraper::{ElementRef, Html};

use crate::dom::{
    ancestor, children_by_tag, descendants_by_tag, elements_by_tag, find_next, first_by_tag,
    href_matches, last_segment, text, trim_newlines,
};
use crate::error::ScrapeError;
use crate::result::{PageHeaders, ReportGroup, ReportSummary, Result};

const OP: &str = "ExtractIndex";

/// Tag that marks each yearly group header.
pub const GROUP_HEADER_TAG: &str = "font";

const CHALLENGE_PATTERN: &str = "challenge/";

/// Extract the headers and the grouped listing from a parsed front page.
pub fn extract_index(doc: &Html) -> Result<(PageHeaders, Vec<ReportGroup>)> {
    let headers = extract_headers(doc)?;
    let groups = extract_groups(doc)?;
    tracing::debug!(
        groups = groups.len(),
        reports = groups.iter().map(|g| g.entries.len()).sum::<usize>(),
        "extracted index"
    );
    Ok((headers, groups))
}

/// Extract the page-level headers.
pub fn extract_headers(doc: &Html) -> Result<PageHeaders> {
    let title = first_by_tag(doc, "title")
        .map(text)
        .ok_or_else(|| ScrapeError::malformed(OP, "<title>"))?;

    let summary_text = first_by_tag(doc, "td")
        .map(|td| trim_newlines(&text(td)).to_string())
        .ok_or_else(|| ScrapeError::malformed(OP, "summary <td>"))?;

    let last_update = first_by_tag(doc, "i").map(text);

    // Second <p> after the first <nobr>.
    let nobr = first_by_tag(doc, "nobr").ok_or_else(|| ScrapeError::malformed(OP, "<nobr>"))?;
    let disclaimer = find_next(*nobr, "p")
        .and_then(|p| find_next(*p, "p"))
        .map(|p| trim_newlines(&text(p)).to_string())
        .ok_or_else(|| ScrapeError::malformed(OP, "disclaimer <p>"))?;

    // The first challenge link is the generic one; the second carries the year.
    let challenge_links = href_matches(doc, CHALLENGE_PATTERN);
    let challenge_year = challenge_links
        .get(1)
        .and_then(|el| el.value().attr("href"))
        .map(challenge_year_from_href)
        .ok_or_else(|| ScrapeError::malformed(OP, "second challenge/ link"))?;

    Ok(PageHeaders {
        title,
        summary_text,
        last_update,
        disclaimer,
        challenge_year,
    })
}

/// The part of a challenge href after `challenge/`, without a trailing slash.
fn challenge_year_from_href(href: &str) -> String {
    let rest = match href.rfind(CHALLENGE_PATTERN) {
        Some(pos) => &href[pos + CHALLENGE_PATTERN.len()..],
        None => href,
    };
    rest.trim_end_matches('/').to_string()
}

/// Extract every report group, in page order.
pub fn extract_groups(doc: &Html) -> Result<Vec<ReportGroup>> {
    let headers: Vec<ElementRef<'_>> = elements_by_tag(doc, GROUP_HEADER_TAG).collect();
    if headers.is_empty() {
        return Err(ScrapeError::malformed(OP, "<font> group header"));
    }

    headers.into_iter().map(extract_group).collect()
}

/// Build one group from its header marker: row 0 is the label, every later row a report.
fn extract_group(marker: ElementRef<'_>) -> Result<ReportGroup> {
    let table =
        ancestor(marker, "table").ok_or_else(|| ScrapeError::malformed(OP, "group <table>"))?;

    let mut rows = descendants_by_tag(table, "tr");
    let label = rows
        .next()
        .map(|row| text(row).trim().to_string())
        .ok_or_else(|| ScrapeError::malformed(OP, "group label row"))?;

    let entries = rows.map(extract_summary).collect::<Result<Vec<_>>>()?;
    Ok(ReportGroup { label, entries })
}

fn extract_summary(row: ElementRef<'_>) -> Result<ReportSummary> {
    let mut cells = children_by_tag(row, "td");
    let date = cells
        .next()
        .map(|td| text(td).trim().to_string())
        .ok_or_else(|| ScrapeError::malformed(OP, "report date cell"))?;
    let name_cell = cells
        .next()
        .ok_or_else(|| ScrapeError::malformed(OP, "report name cell"))?;

    let anchor = descendants_by_tag(name_cell, "a")
        .next()
        .ok_or_else(|| ScrapeError::malformed(OP, "report link"))?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::malformed(OP, "report link href"))?;

    // Any image next to the link is the "new" badge.
    let is_new = descendants_by_tag(name_cell, "img").next().is_some();

    Ok(ReportSummary {
        date,
        name: text(anchor).trim().to_string(),
        relative_url: last_segment(href).to_string(),
        is_new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn challenge_year_strips_prefix_and_slash() {
        assert_eq!(challenge_year_from_href("challenge/2019/"), "2019");
        assert_eq!(challenge_year_from_href("../challenge/2020"), "2020");
        assert_eq!(challenge_year_from_href("2021"), "2021");
    }

    #[test]
    fn group_with_only_header_row_is_empty() {
        let doc = parse_document(
            "<table><tr><td><font>2024 Sierra Peaks</font></td></tr></table>",
        );
        let groups = extract_groups(&doc).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "2024 Sierra Peaks");
        assert!(groups[0].entries.is_empty());
    }

    #[test]
    fn page_without_group_marker_is_malformed() {
        let doc = parse_document("<table><tr><td>nothing</td></tr></table>");
        assert!(extract_groups(&doc).unwrap_err().is_malformed());
    }

    #[test]
    fn row_without_link_is_malformed() {
        let doc = parse_document(
            "<table><tr><td><font>2024</font></td></tr><tr><td>Jan 1</td><td>no link</td></tr></table>",
        );
        assert!(extract_groups(&doc).unwrap_err().is_malformed());
    }
}
