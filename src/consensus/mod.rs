use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::staking::CheckpointPayload;

/// Seam to the replicated round-consensus engine.
///
/// The engine itself is an external collaborator; this crate only needs the
/// last agreed round-transition time, a way to hand over the activation's
/// payload, and a way to await round finalization before the activation is
/// discarded.
#[async_trait]
pub trait ConsensusClient: Send + Sync {
    /// Unix time of the last agreed round transition. All replicas receive
    /// the same value, so due/not-due verdicts are clock-independent.
    async fn last_round_transition_timestamp(&self) -> u64;

    /// Submit the activation's payload for round agreement. Called exactly
    /// once per activation.
    async fn submit(&self, payload: &CheckpointPayload) -> Result<()>;

    /// Block until the current round is finalized.
    async fn wait_round_finalized(&self) -> Result<()>;
}

// Mock consensus for testing
pub struct MockConsensus {
    timestamp: u64,
    submissions: RwLock<Vec<CheckpointPayload>>,
    finalized_rounds: RwLock<usize>,
}

impl MockConsensus {
    pub fn new(timestamp: u64) -> Self {
        MockConsensus {
            timestamp,
            submissions: RwLock::new(Vec::new()),
            finalized_rounds: RwLock::new(0),
        }
    }

    pub async fn submissions(&self) -> Vec<CheckpointPayload> {
        self.submissions.read().await.clone()
    }

    pub async fn finalized_rounds(&self) -> usize {
        *self.finalized_rounds.read().await
    }
}

#[async_trait]
impl ConsensusClient for MockConsensus {
    async fn last_round_transition_timestamp(&self) -> u64 {
        self.timestamp
    }

    async fn submit(&self, payload: &CheckpointPayload) -> Result<()> {
        self.submissions.write().await.push(payload.clone());
        Ok(())
    }

    async fn wait_round_finalized(&self) -> Result<()> {
        *self.finalized_rounds.write().await += 1;
        Ok(())
    }
}
