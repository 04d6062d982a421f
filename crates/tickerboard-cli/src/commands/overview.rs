use serde::Serialize;
use time::Date;
use tickerboard_core::{ChartSpec, MarketOverview, Pipeline, Trend};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct OverviewResponseData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trend: Option<Trend>,
    overview: Option<&'a MarketOverview>,
    chart: Option<&'a ChartSpec>,
}

pub async fn run(pipeline: &Pipeline, as_of: Date) -> Result<CommandResult, CliError> {
    let report = pipeline.overview(as_of).await;
    let data = serde_json::to_value(OverviewResponseData {
        summary: report.overview.as_ref().map(MarketOverview::summary),
        trend: report.overview.as_ref().map(MarketOverview::trend),
        overview: report.overview.as_ref(),
        chart: report.chart.as_ref(),
    })?;

    CommandResult::ok(data).with_diagnostics(&report.diagnostics)
}
