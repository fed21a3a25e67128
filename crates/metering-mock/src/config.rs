// SPDX-License-Identifier: BUSL-1.1
//! Mock server configuration.
//!
//! Loaded once from the environment at startup and shared read-only with
//! every handler through [`crate::state::AppState`].

use crate::auth::TokenSet;
use crate::metering::{MeteringMode, UnknownModeError};

pub const DEFAULT_REGISTRATION_TOKENS: &str = "validtoken";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CUSTOMER_ID: &str = "somecustomer";
pub const DEFAULT_PRODUCT_CODE: &str = "someproduct";

/// Settings for the mock metering server.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Registration tokens accepted by `ResolveCustomer`.
    pub registration_tokens: TokenSet,
    /// Bind host, an IP literal or a resolvable name.
    pub host: String,
    pub port: u16,
    /// Customer identifier returned for every valid token.
    pub customer_id: String,
    /// Product code returned for every valid token.
    pub product_code: String,
    /// How `BatchMeterUsage` decides which records are processed.
    pub metering_mode: MeteringMode,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            registration_tokens: TokenSet::parse(DEFAULT_REGISTRATION_TOKENS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            product_code: DEFAULT_PRODUCT_CODE.to_string(),
            metering_mode: MeteringMode::default(),
        }
    }
}

impl StubConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REGISTRATION_TOKENS` (default: `validtoken`, comma-separated)
    /// - `HOST` (default: `0.0.0.0`)
    /// - `PORT` (default: `8080`)
    /// - `CUSTOMER_ID` (default: `somecustomer`)
    /// - `PRODUCT_CODE` (default: `someproduct`)
    /// - `METERING_MODE` (default: `random`; also `accept`, `reject`)
    ///
    /// A variable that is set, even to the empty string, overrides its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let registration_tokens = lookup("REGISTRATION_TOKENS")
            .map(|raw| TokenSet::parse(&raw))
            .unwrap_or(defaults.registration_tokens);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidPort(raw.clone(), e.to_string()))?,
            None => defaults.port,
        };

        let metering_mode = match lookup("METERING_MODE") {
            Some(raw) => raw.parse::<MeteringMode>()?,
            None => defaults.metering_mode,
        };

        Ok(Self {
            registration_tokens,
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            customer_id: lookup("CUSTOMER_ID").unwrap_or(defaults.customer_id),
            product_code: lookup("PRODUCT_CODE").unwrap_or(defaults.product_code),
            metering_mode,
        })
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: {1}")]
    InvalidPort(String, String),
    #[error("invalid METERING_MODE: {0}")]
    InvalidMeteringMode(#[from] UnknownModeError),
}
