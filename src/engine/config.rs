// SOMX Feed — Configuration
// feed.toml + SOMX_* environment overrides. Every key has a default, so an
// empty or absent file yields a working mainnet configuration.

use crate::atoms::constants::*;
use crate::atoms::error::{EngineError, EngineResult};
use log::info;
use serde::{Deserialize, Serialize};
use somx_core::{Scale, TierSchedule, MAX_DECIMALS, PRESALE_TARGET};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Blockscout v2 API root, without trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Presale contract whose transactions and balance are read.
    #[serde(default = "default_contract")]
    pub contract_address: String,
    /// Prefix for the `explorerLink` of each purchase.
    #[serde(default = "default_explorer_tx_base")]
    pub explorer_tx_base: String,
    /// Decimals of the raised coin (18 for SOMI).
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Fundraising target in display units.
    #[serde(default = "default_target")]
    pub presale_target: f64,
    #[serde(default = "default_bind")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String { DEFAULT_API_BASE.into() }
fn default_contract() -> String { DEFAULT_CONTRACT.into() }
fn default_explorer_tx_base() -> String { DEFAULT_EXPLORER_TX_BASE.into() }
fn default_decimals() -> u32 { somx_core::amount::DEFAULT_DECIMALS }
fn default_target() -> f64 { PRESALE_TARGET }
fn default_bind() -> String { DEFAULT_BIND.into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_timeout() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.into() }

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            api_base: default_api_base(),
            contract_address: default_contract(),
            explorer_tx_base: default_explorer_tx_base(),
            decimals: default_decimals(),
            presale_target: default_target(),
            bind_address: default_bind(),
            port: default_port(),
            request_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        toml::from_str(s).map_err(|e| EngineError::Config(format!("Invalid feed config: {}", e)))
    }

    /// `{config_dir}/somx/feed.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path` (must exist), else the default path (if present),
    /// else built-in defaults. Environment overrides apply on top.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let mut config = match path {
            Some(p) => Self::read_file(p)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => Self::read_file(&p)?,
                None => FeedConfig::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Read {}: {}", path.display(), e)))?;
        info!("[config] Loaded {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Apply SOMX_BIND / SOMX_PORT / SOMX_CONTRACT / SOMX_API_BASE.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> EngineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("SOMX_BIND") {
            self.bind_address = bind;
        }
        if let Some(port) = lookup("SOMX_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| EngineError::Config(format!("SOMX_PORT is not a port: '{}'", port)))?;
        }
        if let Some(contract) = lookup("SOMX_CONTRACT") {
            self.contract_address = contract;
        }
        if let Some(base) = lookup("SOMX_API_BASE") {
            self.api_base = base;
        }
        Ok(())
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.api_base.trim().is_empty() {
            return Err(EngineError::Config("api_base must not be empty".into()));
        }
        if self.contract_address.trim().is_empty() {
            return Err(EngineError::Config("contract_address must not be empty".into()));
        }
        if !(self.presale_target.is_finite() && self.presale_target > 0.0) {
            return Err(EngineError::Config(format!(
                "presale_target must be a positive number, got {}",
                self.presale_target
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(EngineError::Config("request_timeout_secs must be at least 1".into()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(EngineError::Config(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }

    pub fn transactions_url(&self) -> String {
        format!(
            "{}/addresses/{}/transactions?{}",
            self.api_base.trim_end_matches('/'),
            self.contract_address.trim(),
            TRANSACTIONS_FILTER
        )
    }

    pub fn balance_history_url(&self) -> String {
        format!(
            "{}/addresses/{}/coin-balance-history",
            self.api_base.trim_end_matches('/'),
            self.contract_address.trim()
        )
    }

    pub fn scale(&self) -> Scale {
        Scale::new(self.decimals)
    }

    pub fn tier_schedule(&self) -> TierSchedule {
        TierSchedule::with_target(self.presale_target)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
