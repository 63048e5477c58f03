//! Consumers of closed positions: summary table, chart annotations, JSON.

use thiserror::Error;

pub mod chart_script;
pub mod json;
pub mod summary;

pub use chart_script::{render_chart_script, write_chart_script, AggregationPeriod, ChartOptions};
pub use json::write_positions_json;
pub use summary::{append_summary, write_summary, SUMMARY_HEADER};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
