//! # Price Strategies
//!
//! | Strategy | Backend | Network |
//! |----------|---------|---------|
//! | [`LiveSource`] | Yahoo Finance v8 chart API | yes |
//! | [`SnapshotSource`] | `stock_data.json` and friends, via ordered loaders | optional |
//! | [`SyntheticSource`] | seeded random walk | no |
//!
//! Exactly one strategy serves a deployment; see
//! [`SourceBuilder`](crate::SourceBuilder).

pub mod live;
pub mod snapshot;
pub mod synthetic;

pub use live::LiveSource;
pub use snapshot::{DirSnapshotLoader, HttpSnapshotLoader, SnapshotLoader, SnapshotSource};
pub use synthetic::{base_price, symbol_seed, SyntheticConfig, SyntheticSource};
