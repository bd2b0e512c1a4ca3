// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical staking state of the service.
///
/// The two staking deployments each define their own state enumeration with
/// the same ordinal values. Both are converted to this single representation
/// at the contract boundary; the raw enumerations never leave this module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingState {
    #[default]
    Unstaked,
    Staked,
    Evicted,
}

impl StakingState {
    /// Ordinal value shared with the on-chain enumerations.
    pub fn value(self) -> u8 {
        match self {
            StakingState::Unstaked => 0,
            StakingState::Staked => 1,
            StakingState::Evicted => 2,
        }
    }
}

impl fmt::Display for StakingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StakingState::Unstaked => "UNSTAKED",
            StakingState::Staked => "STAKED",
            StakingState::Evicted => "EVICTED",
        };
        f.write_str(name)
    }
}

/// Raw state enumeration of the legacy service staking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegacyStakingState {
    Unstaked,
    Staked,
    Evicted,
}

/// Raw state enumeration of the token staking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenStakingState {
    Unstaked,
    Staked,
    Evicted,
}

impl TryFrom<u64> for LegacyStakingState {
    type Error = u64;

    fn try_from(ordinal: u64) -> Result<Self, u64> {
        match ordinal {
            0 => Ok(LegacyStakingState::Unstaked),
            1 => Ok(LegacyStakingState::Staked),
            2 => Ok(LegacyStakingState::Evicted),
            other => Err(other),
        }
    }
}

impl TryFrom<u64> for TokenStakingState {
    type Error = u64;

    fn try_from(ordinal: u64) -> Result<Self, u64> {
        match ordinal {
            0 => Ok(TokenStakingState::Unstaked),
            1 => Ok(TokenStakingState::Staked),
            2 => Ok(TokenStakingState::Evicted),
            other => Err(other),
        }
    }
}

impl From<LegacyStakingState> for StakingState {
    fn from(raw: LegacyStakingState) -> Self {
        match raw {
            LegacyStakingState::Unstaked => StakingState::Unstaked,
            LegacyStakingState::Staked => StakingState::Staked,
            LegacyStakingState::Evicted => StakingState::Evicted,
        }
    }
}

impl From<TokenStakingState> for StakingState {
    fn from(raw: TokenStakingState) -> Self {
        match raw {
            TokenStakingState::Unstaked => StakingState::Unstaked,
            TokenStakingState::Staked => StakingState::Staked,
            TokenStakingState::Evicted => StakingState::Evicted,
        }
    }
}
