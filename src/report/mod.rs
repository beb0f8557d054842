pub mod formatter;
pub mod html;

pub use formatter::{
    format_candidate_detail, format_score, format_scored_table, format_tsv, should_use_colors,
};
pub use html::{render_html, render_plain, ReportContext, DEFAULT_TOP_N};
