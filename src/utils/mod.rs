//! Shared helpers.
//!
//! - `date`: calendar dates for publication markers and sitemaps
//! - `html`: escaping and class helpers

pub mod date;
pub mod html;
