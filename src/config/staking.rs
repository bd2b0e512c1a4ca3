// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Read-only, process-lifetime staking configuration.
///
/// The activity-checker address doubles as the contract variant selector:
/// the zero address is a sentinel meaning "legacy staking deployment", any
/// other value selects the newer token staking deployment and routes the
/// liveness-ratio read through the activity checker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingConfig {
    pub on_chain_service_id: Option<u64>,
    pub staking_contract_address: Address,
    pub activity_checker_address: Address,
    pub safe_contract_address: Address,
    pub sender_address: Address,
    pub poll_interval: Duration,
}

impl Default for StakingConfig {
    fn default() -> Self {
        StakingConfig {
            on_chain_service_id: None,
            staking_contract_address: Address::zero(),
            activity_checker_address: Address::zero(),
            safe_contract_address: Address::zero(),
            sender_address: Address::zero(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl StakingConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        StakingConfig {
            on_chain_service_id: std::env::var("ON_CHAIN_SERVICE_ID")
                .ok()
                .and_then(|raw| raw.parse().ok()),
            staking_contract_address: env_address("STAKING_CONTRACT_ADDRESS"),
            activity_checker_address: env_address("ACTIVITY_CHECKER_ADDRESS"),
            safe_contract_address: env_address("SAFE_CONTRACT_ADDRESS"),
            sender_address: env_address("SENDER_ADDRESS"),
            poll_interval: std::env::var("STAKING_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
        }
    }

    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Whether the newer token staking deployment backs the staking
    /// capability.
    pub fn use_activity_checker(&self) -> bool {
        self.activity_checker_address != Address::zero()
    }
}

fn env_address(key: &str) -> Address {
    std::env::var(key)
        .ok()
        .and_then(|raw| Address::from_str(&raw).ok())
        .unwrap_or_else(Address::zero)
}
