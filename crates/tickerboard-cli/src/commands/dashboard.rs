use serde::Serialize;
use tickerboard_core::{
    CanonicalTable, ChartSpec, ChartStyle, DashboardReport, DataInfo, MetricsDisplay, MetricsRow,
    Period, Symbol,
};

use crate::error::CliError;

use super::{report_result, CommandResult};

#[derive(Debug, Serialize)]
struct DashboardResponseData<'a> {
    tickers: Vec<Symbol>,
    period: Period,
    style: ChartStyle,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'a DataInfo>,
    summary: Vec<MetricsDisplay>,
    metrics: &'a [MetricsRow],
    prices: &'a CanonicalTable,
    chart: Option<&'a ChartSpec>,
}

pub fn run(report: &DashboardReport) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(DashboardResponseData {
        tickers: report.loaded_tickers(),
        period: report.period,
        style: report.style,
        status: &report.status,
        info: report.info.as_ref(),
        summary: report.metrics.iter().map(MetricsRow::display).collect(),
        metrics: &report.metrics,
        prices: &report.table,
        chart: report.chart.as_ref(),
    })?;

    report_result(report, data)
}
