// SPDX-License-Identifier: BUSL-1.1
//! # Application State
//!
//! Shared state passed to all route handlers via the `State` extractor:
//! the immutable configuration and the usage evaluator. Both sit behind
//! `Arc`, so cloning the state per request is cheap and never copies data.

use std::sync::Arc;

use crate::config::StubConfig;
use crate::metering::UsageEvaluator;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<StubConfig>,
    pub evaluator: Arc<dyn UsageEvaluator>,
}

impl AppState {
    /// Build state using the evaluator selected by `config.metering_mode`.
    pub fn new(config: StubConfig) -> Self {
        let evaluator = config.metering_mode.evaluator();
        Self::with_evaluator(config, evaluator)
    }

    /// Build state with an explicit evaluator, ignoring `metering_mode`.
    pub fn with_evaluator(config: StubConfig, evaluator: Arc<dyn UsageEvaluator>) -> Self {
        Self {
            config: Arc::new(config),
            evaluator,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StubConfig::default())
    }
}
