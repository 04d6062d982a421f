mod chart;
mod dashboard;
mod metrics;
mod overview;
mod prices;
mod sources;

use std::time::Instant;

use serde_json::Value;
use tickerboard_core::domain::date::{parse_date, today_utc};
use tickerboard_core::{
    DashboardReport, Diagnostic, Envelope, EnvelopeError, EnvelopeMeta, Pipeline,
    RequestContext, SourceBuilder, SourceConfig, SourceKind,
};
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command, TickerArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Blocking diagnostics become envelope errors, the rest warnings.
    pub fn with_diagnostics(mut self, diagnostics: &[Diagnostic]) -> Result<Self, CliError> {
        for diagnostic in diagnostics {
            if diagnostic.is_blocking() {
                self.errors
                    .push(EnvelopeError::new(diagnostic.code(), diagnostic.to_string())?);
            } else {
                self.warnings.push(diagnostic.to_string());
            }
        }
        Ok(self)
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let config = source_config(cli)?;
    let source = config.kind;

    let command_result = match &cli.command {
        Command::Sources => sources::run(&config)?,
        Command::Overview => {
            let pipeline = Pipeline::new(SourceBuilder::new(config).build()?);
            overview::run(&pipeline, as_of(cli)?).await?
        }
        Command::Dashboard(args) => dashboard::run(&report(cli, config, args).await?)?,
        Command::Prices(args) => prices::run(&report(cli, config, args).await?)?,
        Command::Metrics(args) => metrics::run(&report(cli, config, args).await?)?,
        Command::Chart(args) => chart::run(&report(cli, config, args).await?)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), source, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Environment first, then explicit flags on top.
fn source_config(cli: &Cli) -> Result<SourceConfig, CliError> {
    let mut config = SourceConfig::from_env()?;
    if let Some(selector) = cli.source {
        config = config.with_kind(SourceKind::from(selector));
    }
    if let Some(dir) = &cli.snapshot_dir {
        config = config.with_snapshot_dir(dir.clone());
    }
    if let Some(url) = &cli.snapshot_url {
        config = config.with_snapshot_url(url.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    debug!(source = %config.kind, "resolved source configuration");
    Ok(config)
}

fn as_of(cli: &Cli) -> Result<time::Date, CliError> {
    match &cli.as_of {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(today_utc()),
    }
}

async fn report(
    cli: &Cli,
    config: SourceConfig,
    args: &TickerArgs,
) -> Result<DashboardReport, CliError> {
    let pipeline = Pipeline::new(SourceBuilder::new(config).build()?);
    let ctx = RequestContext::new(args.tickers.as_str(), args.period.as_str(), as_of(cli)?)
        .with_style(args.style.into());
    Ok(pipeline.run(&ctx).await)
}

/// Shared tail of the ticker commands.
fn report_result(report: &DashboardReport, data: Value) -> Result<CommandResult, CliError> {
    CommandResult::ok(data)
        .with_warnings(report.warnings.iter().cloned())
        .with_diagnostics(&report.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerboard_core::Period;

    #[test]
    fn splits_blocking_and_advisory_diagnostics() {
        let diagnostics = vec![
            Diagnostic::InvalidPeriod {
                label: String::from("7W"),
                fallback: Period::DEFAULT,
            },
            Diagnostic::EmptyInput,
        ];

        let result = CommandResult::ok(Value::Null)
            .with_diagnostics(&diagnostics)
            .expect("diagnostics have codes and messages");

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "pipeline.empty_input");
    }
}
