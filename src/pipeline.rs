//! Ledger -> normalizer -> matcher -> output action.

use crate::config::{Action, Config};
use crate::domain::Execution;
use crate::engine::{normalize_with, DateFix, MatchOutcome, MatchStats, PositionMatcher};
use crate::error::AppError;
use crate::ledger::{CsvLedger, ExecutionSource};
use crate::report::{
    append_summary, render_chart_script, write_chart_script, write_positions_json, ChartOptions,
    ReportError,
};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub action: Action,
    pub stats: MatchStats,
    pub output_path: PathBuf,
}

/// Normalize and match an already-validated ledger.
pub fn close_positions(executions: Vec<Execution>, fix: &DateFix, parallel: bool) -> MatchOutcome {
    let executions = normalize_with(executions, fix);
    PositionMatcher::new()
        .parallel(parallel)
        .match_positions(executions)
}

/// Run against the CSV ledger named in `config`, dating repaired fills today.
pub fn run(config: &Config) -> Result<RunReport, AppError> {
    let source = CsvLedger::new(&config.ledger_path);
    run_with_source(&source, config, Local::now().date_naive())
}

pub fn run_with_source(
    source: &dyn ExecutionSource,
    config: &Config,
    today: NaiveDate,
) -> Result<RunReport, AppError> {
    let executions = source.load_executions()?;
    let fix = DateFix::new(config.date_fix_threshold, today);
    let outcome = close_positions(executions, &fix, config.parallel_matching);

    match config.action {
        Action::Summarize => {
            append_summary(&config.output_path, &outcome.positions)?;
        }
        Action::Chart => {
            let options = ChartOptions {
                utc_offset_hours: config.chart_utc_offset_hours,
            };
            let lines = render_chart_script(&outcome.positions, &options);
            write_chart_script(&config.output_path, &lines)?;
        }
        Action::Json => {
            let file = std::fs::File::create(&config.output_path).map_err(ReportError::from)?;
            write_positions_json(std::io::BufWriter::new(file), &outcome.positions)?;
        }
    }

    tracing::info!(
        action = ?config.action,
        output = %config.output_path.display(),
        closed = outcome.stats.closed,
        "Pipeline finished"
    );

    Ok(RunReport {
        action: config.action,
        stats: outcome.stats,
        output_path: config.output_path.clone(),
    })
}
