//! Output side: human-readable reports and the JSON dump.
pub mod json;
pub mod report;
