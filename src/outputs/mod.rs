//! Output generation.
//!
//! - [`json`]: renders the enriched listing as the JSON array printed on stdout

pub mod json;
