use crate::{Account, StorageSlot};
use primitives::{Address, HashMap, StorageKey, StorageValue};

/// EVM State is a mapping from addresses to accounts.
pub type EvmState = HashMap<Address, Account>;

/// Structure used for EIP-1153 transient storage
pub type TransientStorage = HashMap<(Address, StorageKey), StorageValue>;

/// An account's Storage is a mapping from 256-bit integer keys to [StorageSlot]s.
pub type EvmStorage = HashMap<StorageKey, StorageSlot>;
