// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::StakingConfig;
use crate::consensus::ConsensusClient;
use crate::contracts::{ContractGateway, ContractReader};

use super::engine::CheckpointCall;
use super::payload::CheckpointPayload;

/// Runs checkpoint activations against the configured contracts.
///
/// One activation at a time: the keeper builds a fresh `CheckpointCall` for
/// each run, drives it to its payload, submits that payload once and awaits
/// round finalization. Configuration and collaborator handles are the only
/// state shared between activations, and both are read-only.
#[derive(Clone)]
pub struct CheckpointKeeper {
    config: StakingConfig,
    gateway: Arc<dyn ContractGateway>,
    consensus: Arc<dyn ConsensusClient>,
}

impl CheckpointKeeper {
    pub fn new(
        config: StakingConfig,
        gateway: Arc<dyn ContractGateway>,
        consensus: Arc<dyn ConsensusClient>,
    ) -> Self {
        CheckpointKeeper {
            config,
            gateway,
            consensus,
        }
    }

    /// Run one checkpoint activation to completion.
    ///
    /// Any fault inside the engine (timeout, invalid derived hash) aborts
    /// the activation here, before anything reaches the consensus engine.
    pub async fn run_activation(&self) -> Result<CheckpointPayload> {
        let synced_timestamp = self.consensus.last_round_transition_timestamp().await;
        let reader = ContractReader::new(Arc::clone(&self.gateway), &self.config);
        let call = CheckpointCall::new(self.config.clone(), reader, synced_timestamp);

        let payload = call
            .run()
            .await
            .context("checkpoint activation failed before producing a payload")?;

        info!(
            "submitting checkpoint payload (state {}, transaction {})",
            payload.staking_state,
            if payload.tx_hex.is_some() {
                "prepared"
            } else {
                "none"
            }
        );
        self.consensus
            .submit(&payload)
            .await
            .context("failed to submit the checkpoint payload")?;
        self.consensus
            .wait_round_finalized()
            .await
            .context("failed while awaiting round finalization")?;

        Ok(payload)
    }
}
