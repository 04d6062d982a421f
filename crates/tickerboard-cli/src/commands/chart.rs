use serde_json::{Map, Value};
use tickerboard_core::DashboardReport;

use crate::error::CliError;

use super::{report_result, CommandResult};

/// Data is the bare Vega-Lite document so it can be piped into a renderer.
pub fn run(report: &DashboardReport) -> Result<CommandResult, CliError> {
    let data = match &report.chart {
        Some(chart) => chart.to_json()?,
        None => Value::Object(Map::new()),
    };

    report_result(report, data)
}
