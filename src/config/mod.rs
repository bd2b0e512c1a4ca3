pub mod staking;

pub use staking::{StakingConfig, DEFAULT_POLL_INTERVAL};
