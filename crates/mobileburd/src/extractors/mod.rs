// ABOUTME: Extraction strategies for the two page shapes served by the trip report site.
// ABOUTME: Index extraction for the front page, report and comment extraction for single reports.

//! Content extraction module.
//!
//! Submodules:
//! - `index`: headers and grouped report listing from the front page.
//! - `report`: structured record from a single trip report page.
//! - `comments`: lazy walk over the comment section of a report page.

pub mod comments;
pub mod index;
pub mod report;

pub use self::comments::{extract_comments, CommentStream};
pub use self::index::extract_index;
pub use self::report::extract_report;
