//! [`BlockEnv`], the block a transaction executes in.
use primitives::{Address, B256, U256};

/// Header values of the executing block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// Block height. Bounds the window served by `block_hash`.
    pub number: u64,
    /// Coinbase. Warm from Shanghai on (EIP-3651).
    pub beneficiary: Address,
    /// Seconds since the UNIX epoch.
    pub timestamp: u64,
    /// Block gas limit.
    pub gas_limit: u64,
    /// Base fee per gas (EIP-1559).
    pub basefee: u64,
    /// Beacon chain randomness, `None` before the merge (EIP-4399).
    pub prevrandao: Option<B256>,
    /// Blob base fee, `None` before Cancun (EIP-4844).
    pub blob_basefee: Option<u128>,
}

impl BlockEnv {
    /// Base fee as a 256-bit word.
    #[inline]
    pub fn basefee_word(&self) -> U256 {
        U256::from(self.basefee)
    }
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: 0,
            beneficiary: Address::ZERO,
            timestamp: 1,
            gas_limit: u64::MAX,
            basefee: 0,
            prevrandao: Some(B256::ZERO),
            blob_basefee: None,
        }
    }
}
