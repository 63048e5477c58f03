//! Summary table of closed positions, one row per position.

use super::ReportError;
use crate::domain::ClosedPosition;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const SUMMARY_HEADER: [&str; 8] = [
    "Symbol",
    "Long/Short",
    "Entry DateTime",
    "Exit DateTime",
    "Num Shares",
    "Buy Price/Share",
    "Sell Price/Share",
    "Commissions",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn summary_row(position: &ClosedPosition) -> [String; 8] {
    [
        position.symbol.to_string(),
        position.direction.label().to_string(),
        position.entry_time.format(TIMESTAMP_FORMAT).to_string(),
        position.exit_time.format(TIMESTAMP_FORMAT).to_string(),
        position.share_count.to_string(),
        format!("{:.4}", position.avg_buy_price()),
        format!("{:.4}", position.avg_sell_price()),
        format!("{:.2}", position.total_commission),
    ]
}

/// Write summary rows, optionally preceded by the header. Returns rows written.
pub fn write_summary<W: Write>(
    writer: W,
    positions: &[ClosedPosition],
    with_header: bool,
) -> Result<usize, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    if with_header {
        writer.write_record(SUMMARY_HEADER)?;
    }
    for position in positions {
        writer.write_record(summary_row(position))?;
    }
    writer.flush()?;

    Ok(positions.len())
}

/// Append rows to an existing summary table, creating it (with header) if
/// missing or empty.
pub fn append_summary(
    path: impl AsRef<Path>,
    positions: &[ClosedPosition],
) -> Result<usize, ReportError> {
    let path = path.as_ref();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;

    let written = write_summary(file, positions, is_new)?;
    tracing::info!(path = %path.display(), rows = written, "Appended closed positions to summary");
    Ok(written)
}
