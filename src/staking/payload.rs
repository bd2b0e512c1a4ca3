use ethers::types::Address;
use serde::{Deserialize, Serialize};

use super::state::StakingState;

/// Round identifier carried in the payload's `tx_submitter` field so the
/// settlement side can attribute the transaction to the checkpoint round.
pub const CALL_CHECKPOINT_ROUND_ID: &str = "call_checkpoint";

/// Terminal record of one checkpoint activation.
///
/// Exactly one payload is produced per activation and handed to the
/// consensus collaborator; the activation context is discarded afterwards.
/// `tx_hex` is `None` whenever no transaction is to be settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointPayload {
    pub sender: Address,
    pub tx_submitter: String,
    pub tx_hex: Option<String>,
    pub staking_state: StakingState,
}

impl CheckpointPayload {
    pub fn new(
        sender: Address,
        tx_submitter: &str,
        tx_hex: Option<String>,
        staking_state: StakingState,
    ) -> Self {
        CheckpointPayload {
            sender,
            tx_submitter: tx_submitter.to_string(),
            tx_hex,
            staking_state,
        }
    }
}
