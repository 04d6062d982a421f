use std::collections::BTreeMap;

use serde::Serialize;
use tickerboard_core::{SourceConfig, SourceKind};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SourceStatus {
    id: SourceKind,
    active: bool,
    description: &'static str,
    settings: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    sources: Vec<SourceStatus>,
}

pub fn run(config: &SourceConfig) -> Result<CommandResult, CliError> {
    let sources = SourceKind::ALL
        .into_iter()
        .map(|id| SourceStatus {
            id,
            active: id == config.kind,
            description: describe(id),
            settings: config.settings(id).into_iter().collect(),
        })
        .collect::<Vec<_>>();

    let data = serde_json::to_value(SourcesResponseData { sources })?;
    Ok(CommandResult::ok(data))
}

const fn describe(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Live => "remote daily chart API, one request per ticker",
        SourceKind::Snapshot => "pre-generated JSON documents, URL then directory",
        SourceKind::Synthetic => "seeded random walk, reproducible per ticker",
    }
}
