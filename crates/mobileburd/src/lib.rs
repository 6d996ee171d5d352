// ABOUTME: Main library entry point for the MobileBurd trip report scraper.
// ABOUTME: Re-exports the public API: Client, extractors, UrlRewriter, data records and ScrapeError.

//! MobileBurd - structured data from Bob Burd's trip report site.
//!
//! This crate fetches pages from the trip report site, parses the markup
//! (which was never meant to be machine-readable) and returns plain records
//! that a presentation layer can render for small screens.
//!
//! # Example
//!
//! ```no_run
//! use mobileburd::{Client, ScrapeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build()?;
//!     let index = client.index().await?;
//!     for group in &index.groups {
//!         println!("{} ({} reports)", group.label, group.entries.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod result;
pub mod rewrite;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::extractors::{extract_comments, extract_index, extract_report, CommentStream};
pub use crate::options::{ClientBuilder, Options, SiteConfig};
pub use crate::result::{
    CommentNode, IndexPage, NamedLink, PageHeaders, ReportGroup, ReportSummary, Result,
    TripReport,
};
pub use crate::rewrite::{Category, UrlRewriter};
