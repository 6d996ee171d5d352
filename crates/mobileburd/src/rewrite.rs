// ABOUTME: URL rewriting for hrefs scraped from trip report pages.
// ABOUTME: Maps a relative or partial href plus a Category onto an absolute URL under the site's sub-paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::options::SiteConfig;

/// The kind of link being rewritten. Each category has its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Photo,
    Person,
    Peak,
    Map,
    Profile,
    Gpx,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Photo,
        Category::Person,
        Category::Peak,
        Category::Map,
        Category::Profile,
        Category::Gpx,
    ];

    /// How many trailing path segments identify the linked resource.
    ///
    /// Photos and peaks live one directory deep (`<album>/<photo>`, `<id>/<name>`).
    pub fn tail_segments(self) -> usize {
        match self {
            Category::Photo | Category::Peak => 2,
            Category::Person | Category::Map | Category::Profile | Category::Gpx => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Photo => "photo",
            Category::Person => "person",
            Category::Peak => "peak",
            Category::Map => "map",
            Category::Profile => "profile",
            Category::Gpx => "gpx",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScrapeError::invalid_category(s))
    }
}

/// Rewrites scraped hrefs into absolute URLs using the configured base per category.
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    photo: String,
    person: String,
    peak: String,
    map: String,
    profile: String,
    gpx: String,
}

fn normalize_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

impl UrlRewriter {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            photo: normalize_base(&site.photo_base),
            person: normalize_base(&site.person_base),
            peak: normalize_base(&site.peak_base),
            map: normalize_base(&site.map_base),
            profile: normalize_base(&site.profile_base),
            gpx: normalize_base(&site.gpx_base),
        }
    }

    /// Base URL for a category, always ending in exactly one `/`.
    pub fn base(&self, category: Category) -> &str {
        match category {
            Category::Photo => &self.photo,
            Category::Person => &self.person,
            Category::Peak => &self.peak,
            Category::Map => &self.map,
            Category::Profile => &self.profile,
            Category::Gpx => &self.gpx,
        }
    }

    /// Keep the last one or two path segments of `href` and append them to the category base.
    pub fn rewrite(&self, href: &str, category: Category) -> String {
        let base = self.base(category);
        debug_assert!(base.ends_with('/') && !base.ends_with("//"));

        let mut tail: Vec<&str> = href.rsplit('/').take(category.tail_segments()).collect();
        tail.reverse();
        let tail = tail.join("/");
        format!("{}{}", base, tail.trim_start_matches('/'))
    }
}

impl Default for UrlRewriter {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}
