//! Flat JSON export of closed positions.

use super::ReportError;
use crate::domain::ClosedPosition;
use std::io::Write;

/// Write positions, with their entry and exit fills, as one JSON array.
pub fn write_positions_json<W: Write>(
    mut writer: W,
    positions: &[ClosedPosition],
) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, positions)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
