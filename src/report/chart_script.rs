//! Renders closed positions as chart-study script that paints an arrow at
//! every execution: up for buys, down for sells.

use super::ReportError;
use crate::domain::{ClosedPosition, Execution, Side, Symbol};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::path::Path;

const COLORS: [&str; 3] = ["Color.CYAN", "Color.PINK", "Color.LIGHT_ORANGE"];
const SEPARATOR: &str = "#################################################################";

/// Chart bar periods the markers are positioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPeriod {
    TwoMin = 2,
    FiveMin = 5,
}

impl AggregationPeriod {
    pub fn minutes(&self) -> u32 {
        *self as u32
    }

    fn chart_flag(&self) -> &'static str {
        match self {
            AggregationPeriod::TwoMin => "Is2MinChart",
            AggregationPeriod::FiveMin => "Is5MinChart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Hours added to execution times to reach the chart's time zone.
    pub utc_offset_hours: i64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { utc_offset_hours: 3 }
    }
}

/// Start of the bar containing `timestamp`, shifted into the chart's time
/// zone, as `HHMM`.
pub fn bar_time(timestamp: NaiveDateTime, period: AggregationPeriod, options: &ChartOptions) -> String {
    let minute = timestamp.minute() - timestamp.minute() % period.minutes();
    let bar = NaiveTime::from_hms_opt(timestamp.hour(), minute, 0).unwrap_or_default();
    let (shifted, _) = bar.overflowing_add_signed(Duration::hours(options.utc_offset_hours));
    shifted.format("%H%M").to_string()
}

fn identifier(symbol: &Symbol) -> String {
    symbol
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn header() -> Vec<String> {
    vec![
        "#".to_string(),
        "# Common Header".to_string(),
        "#".to_string(),
        "def Is5MinChart = (GetAggregationPeriod() == AggregationPeriod.FIVE_MIN);".to_string(),
        "def Is2MinChart = (GetAggregationPeriod() == AggregationPeriod.TWO_MIN);".to_string(),
        String::new(),
    ]
}

fn plot_lines(
    lines: &mut Vec<String>,
    plot: &str,
    guard: &str,
    color: &str,
    execution: &Execution,
    options: &ChartOptions,
) {
    let arrow = match execution.side {
        Side::Buy => "PaintingStrategy.ARROW_UP",
        Side::Sell => "PaintingStrategy.ARROW_DOWN",
    };
    let date = execution.timestamp.format("%Y%m%d");

    lines.push(format!("plot {};", plot));
    lines.push(format!("{}.SetPaintingStrategy({});", plot, arrow));
    lines.push(format!("{}.SetDefaultColor({});", plot, color));
    lines.push(format!("{}.SetLineWeight(3);", plot));

    for (keyword, period) in [
        ("if", AggregationPeriod::FiveMin),
        ("else if", AggregationPeriod::TwoMin),
    ] {
        lines.push(format!("{} {}", keyword, period.chart_flag()));
        lines.push("{".to_string());
        lines.push(format!(
            "\t{} = if {} and GetYYYYMMDD() == {} and SecondsTillTime({}) == 0 then {} else Double.NaN;",
            plot,
            guard,
            date,
            bar_time(execution.timestamp, period, options),
            execution.price
        ));
        lines.push("}".to_string());
    }
    lines.push("else".to_string());
    lines.push("{".to_string());
    lines.push(format!("\t{} = Double.NaN;", plot));
    lines.push("}".to_string());
    lines.push(String::new());
}

/// Script lines for one position, numbered `id` (from 1) within its day and
/// symbol.
fn render_position(position: &ClosedPosition, id: usize, options: &ChartOptions) -> Vec<String> {
    let name = identifier(&position.symbol);
    let guard = format!("correctSymbol{}{}", name, id);
    let color = COLORS[(id - 1) % COLORS.len()];

    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("def {} = (GetSymbol() == \"{}\");", guard, position.symbol),
    ];
    for fills in [position.buys(), position.sells()] {
        for (n, execution) in fills.iter().enumerate() {
            let prefix = match execution.side {
                Side::Buy => "buy",
                Side::Sell => "sell",
            };
            let plot = format!("{}Plot{}{}_{}", prefix, name, id, n + 1);
            plot_lines(&mut lines, &plot, &guard, color, execution, options);
        }
    }
    lines
}

/// Script for all positions. Positions are grouped by entry date, then by
/// symbol, and numbered from 1 within each group so that repeated trades in
/// one symbol on one day get distinct names and colours.
pub fn render_chart_script(positions: &[ClosedPosition], options: &ChartOptions) -> Vec<String> {
    let mut days: Vec<(NaiveDate, Vec<(&Symbol, Vec<&ClosedPosition>)>)> = Vec::new();
    for position in positions {
        let day = position.entry_time.date();
        let slot = match days.iter().position(|(d, _)| *d == day) {
            Some(slot) => slot,
            None => {
                days.push((day, Vec::new()));
                days.len() - 1
            }
        };
        let symbols = &mut days[slot].1;
        match symbols.iter_mut().find(|(s, _)| *s == &position.symbol) {
            Some((_, group)) => group.push(position),
            None => symbols.push((&position.symbol, vec![position])),
        }
    }

    let mut lines = header();
    for (_, symbols) in &days {
        for (_, group) in symbols {
            for (index, position) in group.iter().enumerate() {
                lines.extend(render_position(position, index + 1, options));
            }
        }
    }
    lines
}

/// Write script lines to `path`, one per line.
pub fn write_chart_script(path: impl AsRef<Path>, lines: &[String]) -> Result<(), ReportError> {
    let mut text = lines.join("\n");
    text.push('\n');
    std::fs::write(path.as_ref(), text)?;
    tracing::info!(path = %path.as_ref().display(), lines = lines.len(), "Wrote chart script");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn dt(h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 3, 12)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn exec(symbol: &str, side: Side, px: f64, ts: NaiveDateTime) -> Execution {
        Execution::new(ts, Symbol::new(symbol), side, 10.0, px, 0.0).unwrap()
    }

    fn long(symbol: &str, entry: NaiveDateTime, exit: NaiveDateTime) -> ClosedPosition {
        ClosedPosition::from_sides(
            Symbol::new(symbol),
            Direction::Long,
            vec![exec(symbol, Side::Buy, 10.5, entry)],
            vec![exec(symbol, Side::Sell, 11.0, exit)],
        )
    }

    #[test]
    fn test_bar_time_floors_and_shifts() {
        let options = ChartOptions::default();
        assert_eq!(bar_time(dt(6, 37, 42), AggregationPeriod::FiveMin, &options), "0935");
        assert_eq!(bar_time(dt(6, 37, 42), AggregationPeriod::TwoMin, &options), "0936");
        assert_eq!(bar_time(dt(13, 4, 0), AggregationPeriod::FiveMin, &options), "1600");
    }

    #[test]
    fn test_bar_time_wraps_midnight() {
        let options = ChartOptions { utc_offset_hours: 3 };
        assert_eq!(bar_time(dt(22, 10, 0), AggregationPeriod::FiveMin, &options), "0110");
    }

    #[test]
    fn test_render_position_layout() {
        let position = long("AAPL", dt(6, 31, 0), dt(6, 44, 0));
        let lines = render_position(&position, 1, &ChartOptions::default());

        assert_eq!(lines[0], SEPARATOR);
        assert_eq!(lines[1], "def correctSymbolAAPL1 = (GetSymbol() == \"AAPL\");");
        assert_eq!(lines[2], "plot buyPlotAAPL1_1;");
        assert_eq!(lines[3], "buyPlotAAPL1_1.SetPaintingStrategy(PaintingStrategy.ARROW_UP);");
        assert_eq!(lines[4], "buyPlotAAPL1_1.SetDefaultColor(Color.CYAN);");
        assert_eq!(lines[5], "buyPlotAAPL1_1.SetLineWeight(3);");
        assert_eq!(lines[6], "if Is5MinChart");
        assert_eq!(
            lines[8],
            "\tbuyPlotAAPL1_1 = if correctSymbolAAPL1 and GetYYYYMMDD() == 20140312 and SecondsTillTime(0930) == 0 then 10.5 else Double.NaN;"
        );
        assert_eq!(lines[10], "else if Is2MinChart");
        assert!(lines.contains(&"plot sellPlotAAPL1_1;".to_string()));
        assert!(lines.contains(&"sellPlotAAPL1_1.SetPaintingStrategy(PaintingStrategy.ARROW_DOWN);".to_string()));
    }

    #[test]
    fn test_identifier_sanitizes_symbol() {
        let position = long("BRK.B", dt(6, 31, 0), dt(6, 44, 0));
        let lines = render_position(&position, 2, &ChartOptions::default());
        assert_eq!(lines[1], "def correctSymbolBRK_B2 = (GetSymbol() == \"BRK.B\");");
        assert_eq!(lines[4], "buyPlotBRK_B2_1.SetDefaultColor(Color.PINK);");
    }

    #[test]
    fn test_render_chart_script_numbers_within_day_and_symbol() {
        let next_day = NaiveDate::from_ymd_opt(2014, 3, 13)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let positions = vec![
            long("AAPL", dt(6, 31, 0), dt(6, 44, 0)),
            long("MSFT", dt(6, 50, 0), dt(7, 10, 0)),
            long("AAPL", dt(8, 0, 0), dt(8, 30, 0)),
            long("AAPL", next_day, next_day + Duration::minutes(5)),
        ];
        let lines = render_chart_script(&positions, &ChartOptions::default());

        assert_eq!(lines[0], "#");
        assert_eq!(lines[5], "");
        let guards: Vec<&String> = lines.iter().filter(|l| l.starts_with("def correctSymbol")).collect();
        assert_eq!(guards.len(), 4);
        assert!(guards[0].starts_with("def correctSymbolAAPL1 "));
        assert!(guards[1].starts_with("def correctSymbolAAPL2 "));
        assert!(guards[2].starts_with("def correctSymbolMSFT1 "));
        assert!(guards[3].starts_with("def correctSymbolAAPL1 "));
    }

    #[test]
    fn test_colours_cycle_from_the_first_position() {
        let positions: Vec<ClosedPosition> = (0..4)
            .map(|n| long("AAPL", dt(6, n * 10, 0), dt(6, n * 10 + 5, 0)))
            .collect();
        let lines = render_chart_script(&positions, &ChartOptions::default());

        let colours: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with("buyPlot") && l.contains("SetDefaultColor"))
            .collect();
        assert_eq!(colours.len(), 4);
        assert!(colours[0].ends_with("(Color.CYAN);"));
        assert!(colours[1].ends_with("(Color.PINK);"));
        assert!(colours[2].ends_with("(Color.LIGHT_ORANGE);"));
        assert_eq!(colours[3], &"buyPlotAAPL4_1.SetDefaultColor(Color.CYAN);".to_string());
    }

    #[test]
    fn test_write_chart_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.ts");
        write_chart_script(&path, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
