use serde::Serialize;
use tickerboard_core::{DashboardReport, MetricsDisplay, MetricsRow, Period};

use crate::error::CliError;

use super::{report_result, CommandResult};

#[derive(Debug, Serialize)]
struct MetricsResponseData<'a> {
    period: Period,
    summary: Vec<MetricsDisplay>,
    metrics: &'a [MetricsRow],
}

pub fn run(report: &DashboardReport) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(MetricsResponseData {
        period: report.period,
        summary: report.metrics.iter().map(MetricsRow::display).collect(),
        metrics: &report.metrics,
    })?;

    report_result(report, data)
}
