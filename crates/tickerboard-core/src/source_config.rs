//! Strategy selection.
//!
//! Exactly one [`DataSource`] serves a deployment. [`SourceConfig`] collects
//! the knobs from the environment (overridable by CLI flags) and
//! [`SourceBuilder`] turns them into a ready-to-use source.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TICKERBOARD_SOURCE` | `synthetic` |
//! | `TICKERBOARD_SNAPSHOT_DIR` | `data` |
//! | `TICKERBOARD_SNAPSHOT_URL` | unset |
//! | `TICKERBOARD_TIMEOUT_MS` | `10000` |
//! | `TICKERBOARD_SYNTHETIC_VOLATILITY` | `0.02` |
//! | `TICKERBOARD_SYNTHETIC_SEED` | `0` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::adapters::{
    DirSnapshotLoader, HttpSnapshotLoader, LiveSource, SnapshotLoader, SnapshotSource,
    SyntheticConfig, SyntheticSource,
};
use crate::data_source::DataSource;
use crate::http_client::{HttpClient, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{SourceKind, ValidationError};

pub const ENV_SOURCE: &str = "TICKERBOARD_SOURCE";
pub const ENV_SNAPSHOT_DIR: &str = "TICKERBOARD_SNAPSHOT_DIR";
pub const ENV_SNAPSHOT_URL: &str = "TICKERBOARD_SNAPSHOT_URL";
pub const ENV_TIMEOUT_MS: &str = "TICKERBOARD_TIMEOUT_MS";
pub const ENV_SYNTHETIC_VOLATILITY: &str = "TICKERBOARD_SYNTHETIC_VOLATILITY";
pub const ENV_SYNTHETIC_SEED: &str = "TICKERBOARD_SYNTHETIC_SEED";

pub const DEFAULT_SNAPSHOT_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub snapshot_dir: PathBuf,
    pub snapshot_url: Option<String>,
    pub timeout_ms: u64,
    pub synthetic: SyntheticConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            snapshot_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Reads the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(ENV_SOURCE) {
            config.kind = SourceKind::from_str(&value)?;
        }
        if let Some(value) = read(ENV_SNAPSHOT_DIR) {
            config.snapshot_dir = PathBuf::from(value);
        }
        config.snapshot_url = read(ENV_SNAPSHOT_URL);
        if let Some(value) = read(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_number(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = read(ENV_SYNTHETIC_VOLATILITY) {
            config.synthetic.volatility = parse_number(ENV_SYNTHETIC_VOLATILITY, &value)?;
        }
        if let Some(value) = read(ENV_SYNTHETIC_SEED) {
            config.synthetic.base_seed = parse_number(ENV_SYNTHETIC_SEED, &value)?;
        }

        config.synthetic.validate()?;
        Ok(config)
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_snapshot_url(mut self, url: impl Into<String>) -> Self {
        self.snapshot_url = Some(url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Human-readable settings of one strategy, for the `sources` listing.
    pub fn settings(&self, kind: SourceKind) -> Vec<(&'static str, String)> {
        match kind {
            SourceKind::Live => vec![("timeout_ms", self.timeout_ms.to_string())],
            SourceKind::Snapshot => {
                let mut settings = Vec::with_capacity(3);
                if let Some(url) = &self.snapshot_url {
                    settings.push(("url", url.clone()));
                }
                settings.push(("dir", self.snapshot_dir.display().to_string()));
                settings.push(("timeout_ms", self.timeout_ms.to_string()));
                settings
            }
            SourceKind::Synthetic => vec![
                ("volatility", self.synthetic.volatility.to_string()),
                ("seed", self.synthetic.base_seed.to_string()),
            ],
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidConfig {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

/// Builds the configured strategy.
///
/// ```rust,ignore
/// let source = SourceBuilder::new(SourceConfig::from_env()?).build()?;
/// let pipeline = Pipeline::new(source);
/// ```
pub struct SourceBuilder {
    config: SourceConfig,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl SourceBuilder {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            http_client: None,
        }
    }

    /// Overrides the transport used by network-backed strategies.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn build(self) -> Result<Arc<dyn DataSource>, ValidationError> {
        let http_client = || -> Arc<dyn HttpClient> {
            match &self.http_client {
                Some(client) => Arc::clone(client),
                None => Arc::new(ReqwestHttpClient::new()),
            }
        };

        let source: Arc<dyn DataSource> = match self.config.kind {
            SourceKind::Live => {
                Arc::new(LiveSource::new(http_client()).with_timeout_ms(self.config.timeout_ms))
            }
            SourceKind::Snapshot => {
                let mut loaders: Vec<Arc<dyn SnapshotLoader>> = Vec::with_capacity(2);
                if let Some(url) = &self.config.snapshot_url {
                    loaders.push(Arc::new(
                        HttpSnapshotLoader::new(http_client(), url.clone())
                            .with_timeout_ms(self.config.timeout_ms),
                    ));
                }
                loaders.push(Arc::new(DirSnapshotLoader::new(
                    self.config.snapshot_dir.clone(),
                )));
                Arc::new(SnapshotSource::new(loaders))
            }
            SourceKind::Synthetic => Arc::new(SyntheticSource::new(self.config.synthetic)?),
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_synthetic() {
        let config = SourceConfig::from_lookup(|_| None).expect("defaults are valid");
        assert_eq!(config, SourceConfig::default());
        assert_eq!(config.kind, SourceKind::Synthetic);
        assert_eq!(config.snapshot_dir, PathBuf::from("data"));
    }

    #[test]
    fn reads_every_variable() {
        let config = SourceConfig::from_lookup(lookup(&[
            (ENV_SOURCE, "snapshot"),
            (ENV_SNAPSHOT_DIR, "/srv/prices"),
            (ENV_SNAPSHOT_URL, "https://example.test/data"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_SYNTHETIC_VOLATILITY, "0.05"),
            (ENV_SYNTHETIC_SEED, "99"),
        ]))
        .expect("valid config");

        assert_eq!(config.kind, SourceKind::Snapshot);
        assert_eq!(config.snapshot_dir, PathBuf::from("/srv/prices"));
        assert_eq!(config.snapshot_url.as_deref(), Some("https://example.test/data"));
        assert_eq!(config.timeout_ms, 2_500);
        assert_eq!(config.synthetic.volatility, 0.05);
        assert_eq!(config.synthetic.base_seed, 99);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = SourceConfig::from_lookup(lookup(&[(ENV_SNAPSHOT_URL, "  ")]))
            .expect("valid config");
        assert!(config.snapshot_url.is_none());
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = SourceConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")]))
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::InvalidConfig { ref key, .. } if key == ENV_TIMEOUT_MS
        ));
    }

    #[test]
    fn builds_selected_strategy() {
        for kind in SourceKind::ALL {
            let source = SourceBuilder::new(SourceConfig::default().with_kind(kind))
                .build()
                .expect("builds");
            assert_eq!(source.id(), kind);
        }
    }

    #[test]
    fn snapshot_settings_list_url_before_dir() {
        let config = SourceConfig::default().with_snapshot_url("https://example.test");
        let keys = config
            .settings(SourceKind::Snapshot)
            .into_iter()
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["url", "dir", "timeout_ms"]);
    }
}
