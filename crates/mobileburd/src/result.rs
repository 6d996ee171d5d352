// ABOUTME: Plain data records produced by the extractors: index headers, report groups, trip reports.
// ABOUTME: Everything here is owned and serializable so the presentation shell can render or emit JSON.

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Convenience alias for results carrying a ScrapeError.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Page-level metadata from the front page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageHeaders {
    pub title: String,
    pub summary_text: String,
    pub last_update: Option<String>,
    pub disclaimer: String,
    pub challenge_year: String,
}

/// One row of the front page listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportSummary {
    pub date: String,
    pub name: String,
    /// Bare filename of the report page, e.g. `trip.html`.
    pub relative_url: String,
    pub is_new: bool,
}

/// A labelled table of reports, e.g. "2018 Sierra Peaks".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportGroup {
    pub label: String,
    pub entries: Vec<ReportSummary>,
}

/// The whole front page: headers plus groups in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IndexPage {
    pub headers: PageHeaders,
    pub groups: Vec<ReportGroup>,
}

impl IndexPage {
    /// Total number of reports across all groups.
    pub fn report_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Reports flagged as new, in listing order.
    pub fn new_reports(&self) -> impl Iterator<Item = &ReportSummary> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .filter(|e| e.is_new)
    }
}

/// Display text plus an absolute URL; used for people, peaks, tracks, maps and profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NamedLink {
    pub name: String,
    pub url: String,
}

/// A node from the comment section, drawn verbatim from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CommentNode {
    Text { text: String },
    Element { tag: String, html: String },
}

impl CommentNode {
    /// Markup for this node; text is escaped, elements are emitted as serialized.
    pub fn to_html(&self) -> String {
        match self {
            CommentNode::Text { text } => text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
            CommentNode::Element { html, .. } => html.clone(),
        }
    }

    pub fn is_element(&self, name: &str) -> bool {
        matches!(self, CommentNode::Element { tag, .. } if tag == name)
    }
}

/// Everything extracted from a single trip report page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TripReport {
    pub participants: Vec<NamedLink>,
    pub peaks: Vec<NamedLink>,
    pub gpx_tracks: Vec<NamedLink>,
    pub maps: Vec<NamedLink>,
    pub profiles: Vec<NamedLink>,
    /// Report body with the scrollbar styling removed, indented one node per line.
    pub body: String,
    pub date: Option<String>,
    pub comments: Vec<CommentNode>,
    pub last_updated: String,
    pub contact: String,
    pub lead_photo_url: String,
}
