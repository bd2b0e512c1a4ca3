// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod builder;
pub mod engine;
pub mod keeper;
pub mod payload;
pub mod state;
pub mod types;

pub use builder::CheckpointTxDescriptor;
pub use engine::{CallStep, CheckpointCall};
pub use keeper::CheckpointKeeper;
pub use payload::{CheckpointPayload, CALL_CHECKPOINT_ROUND_ID};
pub use state::StakingState;
pub use types::{CheckpointSchedule, StakingError, ETH_VALUE, SAFE_GAS, SAFE_TX_HASH_HEX_LEN};
