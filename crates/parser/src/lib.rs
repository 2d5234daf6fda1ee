//! Page parsing without a browser: email matching, result-card extraction
//! and a plain HTTP page driver.

pub mod email;
pub mod http;
pub mod listing;

pub use email::{extract_email, first_email};
pub use http::HttpPage;
pub use listing::{job_records, parse_listing, ListingCard};
