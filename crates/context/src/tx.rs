//! This module contains [`TxEnv`] and the [`TxContext`] handed to the interpreter.
use crate::{BlockEnv, CfgEnv};
pub use alloy_eip2930::{AccessList, AccessListItem};
use primitives::{Address, B256, U256};

/// The transaction environment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEnv {
    /// Caller aka Author aka transaction signer
    pub caller: Address,
    /// The gas limit of the transaction
    pub gas_limit: u64,
    /// The effective gas price of the transaction
    pub gas_price: u128,
    /// A list of addresses and storage keys that the transaction plans to access
    ///
    /// Added in [EIP-2930].
    ///
    /// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
    pub access_list: AccessList,
}

/// Transaction and block values readable by the interpreter.
///
/// Numeric values that the interpreter handles as words are widened to [`U256`].
/// Missing `prevrandao` or blob base fee read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxContext {
    /// Effective gas price.
    pub gas_price: U256,
    /// Transaction origin.
    pub origin: Address,
    /// Block beneficiary.
    pub coinbase: Address,
    /// Block number.
    pub number: u64,
    /// Block timestamp.
    pub timestamp: u64,
    /// Block gas limit.
    pub gas_limit: u64,
    /// Randomness beacon output.
    pub prev_randao: B256,
    /// Chain id.
    pub chain_id: U256,
    /// Block base fee.
    pub base_fee: U256,
    /// Block blob base fee.
    pub blob_base_fee: U256,
}

impl TxContext {
    /// Assembles the context of the transaction `tx` executed in `block`.
    pub fn new(cfg: &CfgEnv, block: &BlockEnv, tx: &TxEnv) -> Self {
        Self {
            gas_price: U256::from(tx.gas_price),
            origin: tx.caller,
            coinbase: block.beneficiary,
            number: block.number,
            timestamp: block.timestamp,
            gas_limit: block.gas_limit,
            prev_randao: block.prevrandao.unwrap_or_default(),
            chain_id: U256::from(cfg.chain_id),
            base_fee: block.basefee_word(),
            blob_base_fee: block.blob_basefee.map(U256::from).unwrap_or_default(),
        }
    }
}
