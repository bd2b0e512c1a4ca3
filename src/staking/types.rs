use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ether value attached to the checkpoint transaction.
pub const ETH_VALUE: u64 = 0;

// setting the safe gas to 0 means that all available gas will be used
pub const SAFE_GAS: u64 = 0;

/// Required length of a derived safe transaction hash once the `0x` prefix
/// is stripped.
pub const SAFE_TX_HASH_HEX_LEN: usize = 64;

/// Field name under which the contracts report their single result value.
pub(crate) const DATA_KEY: &str = "data";

/// Checkpoint timing parameters read from the staking contract.
///
/// Only meaningful while the service is staked; the engine leaves it at its
/// zero value on every other path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSchedule {
    pub next_checkpoint_ts: u64,
    pub last_checkpoint_ts: u64,
    pub liveness_period: u64,
    pub liveness_ratio: U256,
}

#[derive(Debug, thiserror::Error)]
pub enum StakingError {
    /// A timeout-bounded poll gave up before its condition was satisfied.
    #[error("step {step:?} did not succeed within {timeout:?} (waited {waited:?})")]
    Timeout {
        step: &'static str,
        waited: Duration,
        timeout: Duration,
    },

    /// The derived safe transaction hash has the wrong length. This signals
    /// a protocol or contract-version incompatibility, not a transient
    /// condition, and is therefore never retried.
    #[error(
        "incorrect length detected when assigning a safe transaction hash: \
         expected {expected} hex characters, got {actual} in {hash:?}"
    )]
    InvalidHashLength {
        expected: usize,
        actual: usize,
        hash: String,
    },
}
