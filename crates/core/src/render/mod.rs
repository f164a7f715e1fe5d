//! Turning report artifacts into renderable parts.
//!
//! Everything here is pure: the same input always gives the same output,
//! and the source sections are never modified.

pub mod sections;
pub mod table;

pub use sections::{compliance_document, investment_document, stock_document};
pub use table::{align_table, split_tables};

use ad_protocol::report_models::{ContentPart, ReportSection};

/// Rendered body of `section`.
pub fn render_section(section: &ReportSection) -> Vec<ContentPart> {
    split_tables(&section.body)
}
