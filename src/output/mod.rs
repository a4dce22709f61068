pub mod formatter;

pub use formatter::{
    format_bounds_report, format_score, format_scored_groups, format_scored_groups_json,
    should_use_colors,
};
