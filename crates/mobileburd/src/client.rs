// ABOUTME: The main Client struct that fetches pages from the trip report site and runs the extractors.
// ABOUTME: Provides async index() and report() plus parse_*_html() for already-fetched markup.

use crate::error::ScrapeError;
use crate::extractors::{extract_index, extract_report};
use crate::options::{ClientBuilder, Options, SiteConfig};
use crate::resource::{fetch, parse_checked, FetchOptions};
use crate::result::{IndexPage, TripReport};
use crate::rewrite::{Category, UrlRewriter};

/// Fetches and extracts pages from the trip report site.
///
/// Each call fetches, parses and extracts independently; nothing is shared
/// between calls except the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    opts: Options,
    rewriter: UrlRewriter,
}

impl Client {
    /// Create a builder with default options.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from options. Fails when a configured site URL is unusable.
    pub fn new(opts: Options) -> Result<Self, ScrapeError> {
        opts.site.validate()?;

        let http = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(opts.user_agent.clone())
                .timeout(opts.timeout)
                .build()
                .map_err(|e| {
                    ScrapeError::invalid_url(
                        "",
                        "BuildClient",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };
        let rewriter = UrlRewriter::new(&opts.site);

        Ok(Self {
            http,
            opts,
            rewriter,
        })
    }

    /// The site layout this client targets.
    pub fn site(&self) -> &SiteConfig {
        &self.opts.site
    }

    /// The rewriter built from the site layout.
    pub fn rewriter(&self) -> &UrlRewriter {
        &self.rewriter
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.headers.clone(),
        }
    }

    /// Fetch and extract the front page.
    pub async fn index(&self) -> Result<IndexPage, ScrapeError> {
        let url = self.opts.site.index_url.clone();
        let fetched = fetch(&self.http, &url, &self.fetch_options()).await?;
        self.parse_index_html(&fetched.text(), &fetched.final_url)
    }

    /// Fetch and extract a single report by its bare filename, e.g. `trip.html`.
    pub async fn report(&self, filename: &str) -> Result<TripReport, ScrapeError> {
        let url = self.report_url(filename)?;
        let fetched = fetch(&self.http, &url, &self.fetch_options()).await?;
        self.parse_report_html(&fetched.text(), &fetched.final_url)
    }

    /// URL of a report page; the filename must be a single path segment.
    pub fn report_url(&self, filename: &str) -> Result<String, ScrapeError> {
        let filename = filename.trim();
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == "."
            || filename == ".."
        {
            return Err(ScrapeError::invalid_url(
                filename,
                "ReportUrl",
                Some(anyhow::anyhow!("report name must be a single path segment")),
            ));
        }
        Ok(format!("{}{}", self.opts.site.report_base, filename))
    }

    /// Extract the front page from HTML that was fetched elsewhere.
    pub fn parse_index_html(&self, html: &str, url: &str) -> Result<IndexPage, ScrapeError> {
        let doc = parse_checked(html, url)?;
        let (headers, groups) = extract_index(&doc).map_err(|e| e.with_url(url))?;
        Ok(IndexPage { headers, groups })
    }

    /// Extract a report page from HTML that was fetched elsewhere.
    pub fn parse_report_html(&self, html: &str, url: &str) -> Result<TripReport, ScrapeError> {
        let doc = parse_checked(html, url)?;
        extract_report(&doc, &self.rewriter).map_err(|e| e.with_url(url))
    }

    /// Rewrite a scraped href under the given category.
    pub fn rewrite(&self, href: &str, category: Category) -> String {
        self.rewriter.rewrite(href, category)
    }

    /// Where the photo passthrough route should redirect for `path`.
    pub fn photo_redirect(&self, path: &str) -> String {
        self.opts.site.photo_redirect(path)
    }
}
