// ABOUTME: Configuration for the MobileBurd client: SiteConfig base URLs, Options, and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::error::ScrapeError;

/// Origin of the trip report site.
pub const DEFAULT_ORIGIN: &str = "https://www.snwburd.com";

/// Every absolute URL the scraper needs to know about the source site.
///
/// Base URLs end with a single `/`; rewritten tails are appended directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub index_url: String,
    pub report_base: String,
    pub photo_base: String,
    pub person_base: String,
    pub peak_base: String,
    pub map_base: String,
    pub profile_base: String,
    pub gpx_base: String,
}

impl SiteConfig {
    /// Build the standard site layout under another origin, e.g. a mock server.
    pub fn with_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            index_url: format!("{}/bob/", origin),
            report_base: format!("{}/bob/trip_reports/", origin),
            photo_base: format!("{}/bob/trip_photos/", origin),
            person_base: format!("{}/bob/people/", origin),
            peak_base: format!("{}/dayhikes/peak/", origin),
            map_base: format!("{}/bob/maps/", origin),
            profile_base: format!("{}/bob/maps/", origin),
            gpx_base: format!("{}/bob/trip_maps/", origin),
        }
    }

    /// Check that every configured URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let fields = [
            &self.index_url,
            &self.report_base,
            &self.photo_base,
            &self.person_base,
            &self.peak_base,
            &self.map_base,
            &self.profile_base,
            &self.gpx_base,
        ];
        for raw in fields {
            let parsed = url::Url::parse(raw).map_err(|e| {
                ScrapeError::invalid_url(
                    raw.as_str(),
                    "SiteConfig",
                    Some(anyhow::anyhow!("invalid URL: {}", e)),
                )
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ScrapeError::invalid_url(
                    raw.as_str(),
                    "SiteConfig",
                    Some(anyhow::anyhow!("scheme must be http or https")),
                ));
            }
        }
        Ok(())
    }

    /// Target of the photo passthrough route: the photo base plus the requested path.
    pub fn photo_redirect(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.photo_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }
}

/// Configuration options for the MobileBurd client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub site: SiteConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "MobileBurd/0.1".to_string(),
            http_client: None,
            headers: HashMap::new(),
            site: SiteConfig::default(),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the whole site layout.
    pub fn site(mut self, site: SiteConfig) -> Self {
        self.opts.site = site;
        self
    }

    /// Point every site URL at another origin.
    pub fn origin(mut self, origin: &str) -> Self {
        self.opts.site = SiteConfig::with_origin(origin);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, ScrapeError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
