//! Visitors domain - unique visitor counter shown on the portfolio
//!
//! Browsers keep a random visitor id in local storage and report it once per
//! page load. Ids are hashed before storage; the count is the number of
//! distinct hashes ever seen.

pub mod actions;
pub mod errors;
pub mod models;

pub use actions::{track_visitor, visitor_count};
pub use errors::VisitorError;
pub use models::{SiteVisitor, VisitorStats};

pub const VISITOR_ID_MAX_CHARS: usize = 128;
