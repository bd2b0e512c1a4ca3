// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod config;
pub mod consensus;
pub mod contracts;
pub mod staking;
pub mod utils;

// Re-export main types
pub use config::{StakingConfig, DEFAULT_POLL_INTERVAL};
pub use consensus::{ConsensusClient, MockConsensus};
pub use contracts::{
    CallArgs, CallResponse, CallStatus, ContractGateway, ContractInterface, ContractKind,
    ContractReader, FieldValue, MockGateway, RecordedCall,
};
pub use staking::{
    CheckpointCall, CheckpointKeeper, CheckpointPayload, CheckpointSchedule,
    CheckpointTxDescriptor, StakingError, StakingState, CALL_CHECKPOINT_ROUND_ID,
};
pub use utils::poll::{wait_for_condition, Condition, PollError, PollOptions};
