// ABOUTME: Trip report page extraction: linked people, peaks, tracks, maps, body, date, comments, footer.
// ABOUTME: Links are collected by href pattern and rewritten to absolute URLs through UrlRewriter.

//! Trip report extractor.
//!
//! Every link category is recognized by a fragment of its href. Positional
//! rules (the first `<b>` is the date, the second photo link is the lead
//! photo, the two `<i>` runs after the index link are the footer) mirror the
//! current page layout and will break if the site's templates change.

use scraper::Html;

use crate::dom::{by_id, find_next, first_by_tag, href_matches, prettify_fragment, text};
use crate::error::ScrapeError;
use crate::result::{NamedLink, Result, TripReport};
use crate::rewrite::{Category, UrlRewriter};

use super::comments::extract_comments;

const OP: &str = "ExtractReport";

/// Id of the element wrapping the report body.
pub const SCROLL_CONTAINER_ID: &str = "scrollbox";

/// Inline style that forces a scrollbar on the body container.
const SCROLLBAR_STYLE: &str = r#" style="height:auto;overflow-y:scroll""#;

const PEOPLE_PATTERN: &str = "/bob/people";
const PEAK_PATTERN: &str = "/dayhikes/peak";
const GPX_PATTERN: &str = "/trip_maps/";
const MAPS_PATTERN: &str = "/maps/";
const PHOTO_PATTERN: &str = "/trip_photos/";
const INDEX_LINK_PATTERN: &str = "/bob/index.html";

/// Extract a full report from a parsed trip report page.
pub fn extract_report(doc: &Html, rewriter: &UrlRewriter) -> Result<TripReport> {
    let (maps, profiles) = extract_maps_and_profiles(doc, rewriter);
    let (last_updated, contact) = extract_footer(doc)?;

    let report = TripReport {
        participants: extract_links(doc, PEOPLE_PATTERN, Category::Person, rewriter),
        peaks: extract_peaks(doc, rewriter),
        gpx_tracks: extract_links(doc, GPX_PATTERN, Category::Gpx, rewriter),
        maps,
        profiles,
        body: extract_body(doc)?,
        date: extract_date(doc),
        comments: extract_comments(doc)?,
        last_updated,
        contact,
        lead_photo_url: extract_lead_photo(doc, rewriter)?,
    };

    tracing::debug!(
        participants = report.participants.len(),
        peaks = report.peaks.len(),
        maps = report.maps.len(),
        profiles = report.profiles.len(),
        comments = report.comments.len(),
        "extracted report"
    );
    Ok(report)
}

/// Every element whose href matches `pattern`, as a link rewritten under `category`.
pub fn extract_links(
    doc: &Html,
    pattern: &str,
    category: Category,
    rewriter: &UrlRewriter,
) -> Vec<NamedLink> {
    href_matches(doc, pattern)
        .into_iter()
        .map(|el| NamedLink {
            name: text(el),
            url: rewriter.rewrite(el.value().attr("href").unwrap_or_default(), category),
        })
        .collect()
}

/// Peak links; their text carries stray leading spaces.
pub fn extract_peaks(doc: &Html, rewriter: &UrlRewriter) -> Vec<NamedLink> {
    extract_links(doc, PEAK_PATTERN, Category::Peak, rewriter)
        .into_iter()
        .map(|mut link| {
            link.name = link.name.trim_start_matches(' ').to_string();
            link
        })
        .collect()
}

/// Map and elevation profile links share the `/maps/` path; "profile" in the href tells them apart.
pub fn extract_maps_and_profiles(
    doc: &Html,
    rewriter: &UrlRewriter,
) -> (Vec<NamedLink>, Vec<NamedLink>) {
    let mut maps = Vec::new();
    let mut profiles = Vec::new();
    for el in href_matches(doc, MAPS_PATTERN) {
        let href = el.value().attr("href").unwrap_or_default();
        if href.contains("profile") {
            profiles.push(NamedLink {
                name: text(el),
                url: rewriter.rewrite(href, Category::Profile),
            });
        } else {
            maps.push(NamedLink {
                name: text(el),
                url: rewriter.rewrite(href, Category::Map),
            });
        }
    }
    (maps, profiles)
}

/// The report body without the forced scrollbar, re-parsed and indented.
pub fn extract_body(doc: &Html) -> Result<String> {
    let container =
        by_id(doc, SCROLL_CONTAINER_ID).ok_or_else(|| ScrapeError::malformed(OP, "#scrollbox"))?;
    let cleaned = container.html().replace(SCROLLBAR_STYLE, "").replace('\n', "");
    Ok(prettify_fragment(&cleaned))
}

/// Text of the first `<b>` on the page.
///
/// Not scoped to the report body, so any earlier bold text wins.
pub fn extract_date(doc: &Html) -> Option<String> {
    first_by_tag(doc, "b").map(text)
}

/// The last-updated and contact `<i>` runs following the link back to the site index.
pub fn extract_footer(doc: &Html) -> Result<(String, String)> {
    let index_link = href_matches(doc, INDEX_LINK_PATTERN)
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::malformed(OP, "index page link"))?;
    let last_updated = find_next(*index_link, "i")
        .ok_or_else(|| ScrapeError::malformed(OP, "last updated <i>"))?;
    let contact = find_next(*last_updated, "i")
        .ok_or_else(|| ScrapeError::malformed(OP, "contact <i>"))?;
    Ok((text(last_updated), text(contact)))
}

/// The second photo link is the lead photo; the first links the whole album.
pub fn extract_lead_photo(doc: &Html, rewriter: &UrlRewriter) -> Result<String> {
    href_matches(doc, PHOTO_PATTERN)
        .get(1)
        .and_then(|el| el.value().attr("href"))
        .map(|href| rewriter.rewrite(href, Category::Photo))
        .ok_or_else(|| ScrapeError::malformed(OP, "second trip photo link"))
}
