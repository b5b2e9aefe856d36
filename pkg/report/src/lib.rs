pub mod aggregate;
pub mod render;

pub use aggregate::{IssueSection, SUMMARY_DOMAINS, SummaryRow, aggregate, breakdown, summary_rows};
pub use render::{RenderOptions, render_json, render_text};
