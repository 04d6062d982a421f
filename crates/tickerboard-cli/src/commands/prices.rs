use serde::Serialize;
use tickerboard_core::{CanonicalTable, DashboardReport, Period};

use crate::error::CliError;

use super::{report_result, CommandResult};

#[derive(Debug, Serialize)]
struct PricesResponseData<'a> {
    period: Period,
    status: &'a str,
    prices: &'a CanonicalTable,
}

pub fn run(report: &DashboardReport) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(PricesResponseData {
        period: report.period,
        status: &report.status,
        prices: &report.table,
    })?;

    report_result(report, data)
}
