//! EIP-2929 warm/cold bookkeeping.
//!
//! Membership lives outside the state journal: an entry added during a frame that
//! is later reverted stays warm for the rest of the transaction.
use context::AccessList;
use primitives::{Address, HashSet, StorageKey};

/// Result of touching an address or a storage slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessStatus {
    /// First touch in this transaction.
    Cold,
    /// Touched before.
    Warm,
}

impl AccessStatus {
    /// Returns true if the access was cold.
    #[inline]
    pub fn is_cold(&self) -> bool {
        matches!(self, AccessStatus::Cold)
    }
}

/// Addresses and storage slots accessed in the current transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessListTracker {
    addresses: HashSet<Address>,
    slots: HashSet<(Address, StorageKey)>,
}

impl AccessListTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `address` warm, returning whether it was cold before.
    #[inline]
    pub fn access_address(&mut self, address: Address) -> AccessStatus {
        if self.addresses.insert(address) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    /// Marks the storage slot warm, returning whether it was cold before.
    #[inline]
    pub fn access_storage_slot(&mut self, address: Address, key: StorageKey) -> AccessStatus {
        if self.slots.insert((address, key)) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    /// Returns true if `address` was accessed.
    #[inline]
    pub fn is_warm_address(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    /// Returns true if the storage slot was accessed.
    #[inline]
    pub fn is_warm_slot(&self, address: Address, key: StorageKey) -> bool {
        self.slots.contains(&(address, key))
    }

    /// Warms every address and storage key of an EIP-2930 access list.
    pub fn warm_access_list(&mut self, access_list: &AccessList) {
        for item in access_list.iter() {
            self.addresses.insert(item.address);
            self.slots.extend(
                item.storage_keys
                    .iter()
                    .map(|key| (item.address, StorageKey::from_be_bytes(key.0))),
            );
        }
    }

    /// Warms all given addresses.
    pub fn warm_addresses(&mut self, addresses: impl IntoIterator<Item = Address>) {
        self.addresses.extend(addresses);
    }

    /// Forgets every access. Called at transaction end.
    pub fn clear(&mut self) {
        self.addresses.clear();
        self.slots.clear();
    }
}
