// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::contracts::{CallArgs, ContractKind, FieldValue};
use crate::utils::tx_hex::hash_payload_to_hex;

use super::engine::{CallStep, CheckpointCall};
use super::types::{StakingError, DATA_KEY, ETH_VALUE, SAFE_GAS, SAFE_TX_HASH_HEX_LEN};

/// Field name under which the multisig contract reports the derived hash.
const TX_HASH_KEY: &str = "tx_hash";

/// Prepared checkpoint transaction, ready for the settlement collaborator.
///
/// The hash is stored with its `0x` prefix stripped; value and gas are fixed
/// at zero (zero gas means all available gas is forwarded by the multisig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointTxDescriptor {
    pub safe_tx_hash: String,
    pub ether_value: U256,
    pub safe_tx_gas: U256,
    pub to: Address,
    pub data: Bytes,
}

impl CheckpointTxDescriptor {
    /// Render the descriptor with the deterministic hex encoder. Every
    /// replica produces byte-identical output for the same descriptor.
    pub fn to_hex(&self) -> String {
        hash_payload_to_hex(
            &self.safe_tx_hash,
            self.ether_value,
            self.safe_tx_gas,
            self.to,
            &self.data,
        )
    }
}

impl CheckpointCall {
    /// Build the checkpoint transaction once the engine has decided it is
    /// due: encode the call data, derive the multisig hash, pack the
    /// descriptor. Both remote steps retry indefinitely like the staking
    /// reads they follow.
    pub(crate) async fn prepare_checkpoint_tx(
        &mut self,
    ) -> Result<CheckpointTxDescriptor, StakingError> {
        self.wait_for(CallStep::CheckpointCallData, None).await?;
        self.wait_for(CallStep::SafeTxHash, None).await?;

        Ok(CheckpointTxDescriptor {
            safe_tx_hash: self.safe_tx_hash.clone(),
            ether_value: U256::from(ETH_VALUE),
            safe_tx_gas: U256::from(SAFE_GAS),
            to: self.reader.staking_address(),
            data: self.checkpoint_data.clone(),
        })
    }

    /// Obtain the encoded checkpoint call bytes from the staking contract.
    pub(crate) async fn build_checkpoint_data(&mut self) -> bool {
        let Some(value) = self
            .reader
            .read_field(
                ContractKind::Staking,
                "build_checkpoint_tx",
                DATA_KEY,
                CallArgs::new(),
            )
            .await
        else {
            return false;
        };

        match value.as_bytes() {
            Some(data) => {
                self.checkpoint_data = data.clone();
                true
            }
            None => {
                warn!(
                    "unexpected checkpoint call data in contract response: {:?}",
                    value
                );
                false
            }
        }
    }

    /// Derive the multisig transaction hash for the prepared call data.
    ///
    /// A soft failure keeps the step retriable, but a hash of the wrong
    /// stripped length signals a protocol or contract-version mismatch and
    /// aborts the activation immediately.
    pub(crate) async fn derive_safe_tx_hash(&mut self) -> Result<bool, StakingError> {
        let args = CallArgs::new()
            .arg(
                "to_address",
                FieldValue::Address(self.reader.staking_address()),
            )
            .arg("value", FieldValue::uint(ETH_VALUE))
            .arg("data", FieldValue::Bytes(self.checkpoint_data.clone()));

        let Some(value) = self
            .reader
            .read_field(
                ContractKind::Multisig,
                "get_raw_safe_transaction_hash",
                TX_HASH_KEY,
                args,
            )
            .await
        else {
            return Ok(false);
        };
        let Some(hash) = value.as_text() else {
            warn!(
                "unexpected safe transaction hash value in contract response: {:?}",
                value
            );
            return Ok(false);
        };

        let stripped = hash.strip_prefix("0x").unwrap_or(hash);
        if stripped.len() != SAFE_TX_HASH_HEX_LEN {
            return Err(StakingError::InvalidHashLength {
                expected: SAFE_TX_HASH_HEX_LEN,
                actual: stripped.len(),
                hash: hash.to_string(),
            });
        }

        self.safe_tx_hash = stripped.to_string();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_hex_starts_with_the_stripped_hash() {
        let descriptor = CheckpointTxDescriptor {
            safe_tx_hash: "cd".repeat(32),
            ether_value: U256::zero(),
            safe_tx_gas: U256::zero(),
            to: Address::zero(),
            data: Bytes::from(vec![0xaa, 0xbb]),
        };

        let rendered = descriptor.to_hex();
        assert!(rendered.starts_with(&descriptor.safe_tx_hash));
        assert!(rendered.ends_with("aabb"));
        assert_eq!(rendered.len(), 64 + 64 + 64 + 40 + 4);
    }

    #[test]
    fn identical_descriptors_render_identical_hex() {
        let make = || CheckpointTxDescriptor {
            safe_tx_hash: "12".repeat(32),
            ether_value: U256::from(ETH_VALUE),
            safe_tx_gas: U256::from(SAFE_GAS),
            to: "0x3333333333333333333333333333333333333333"
                .parse()
                .unwrap(),
            data: Bytes::from(vec![1, 2, 3]),
        };

        assert_eq!(make().to_hex(), make().to_hex());
    }
}
