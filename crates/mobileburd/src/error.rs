// ABOUTME: Error types for the MobileBurd scraper including the ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the different categories of scrape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Transport failure, timeout, non-200 status, or an access-denied page.
    UpstreamUnavailable,
    /// The page was fetched but an anchor the extractors rely on is missing.
    MalformedSourcePage,
    /// An unknown URL category name reached the rewriter.
    InvalidCategory,
    /// A configured base URL or a report filename is not usable.
    InvalidUrl,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::UpstreamUnavailable => "upstream unavailable",
            ErrorCode::MalformedSourcePage => "malformed source page",
            ErrorCode::InvalidCategory => "invalid category",
            ErrorCode::InvalidUrl => "invalid URL",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for fetch and extraction operations.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mobileburd: {}", self.op)?;
        if !self.url.is_empty() {
            write!(f, " {}", self.url)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    /// Create an UpstreamUnavailable error.
    pub fn upstream(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::UpstreamUnavailable,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a MalformedSourcePage error naming the anchor that was not found.
    pub fn malformed(op: impl Into<String>, anchor: &str) -> Self {
        Self {
            code: ErrorCode::MalformedSourcePage,
            url: String::new(),
            op: op.into(),
            source: Some(anyhow::anyhow!("missing {}", anchor)),
        }
    }

    /// Create an InvalidCategory error.
    pub fn invalid_category(name: &str) -> Self {
        Self {
            code: ErrorCode::InvalidCategory,
            url: String::new(),
            op: "Rewrite".to_string(),
            source: Some(anyhow::anyhow!("unknown category {:?}", name)),
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Attach the URL of the page being extracted.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns true if the upstream site could not be reached or refused access.
    pub fn is_upstream_unavailable(&self) -> bool {
        self.code == ErrorCode::UpstreamUnavailable
    }

    /// Returns true if the page shape did not match what the extractors expect.
    pub fn is_malformed(&self) -> bool {
        self.code == ErrorCode::MalformedSourcePage
    }

    /// Returns true if this is an InvalidCategory error.
    pub fn is_invalid_category(&self) -> bool {
        self.code == ErrorCode::InvalidCategory
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }
}
