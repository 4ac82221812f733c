//! Contains the journal entries that are recorded for every state mutation and
//! replayed in reverse order on checkpoint revert.
use primitives::{Address, Bytes, StorageKey, StorageValue, B256, PRECOMPILE3, U256};
use state::{Account, EvmState, TransientStorage};

/// Journal entries that are used to track changes to the state and are used to revert it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JournalEntry {
    /// Used to mark account that is touched.
    ///
    /// Action: Mark account touched.
    ///
    /// Revert: Unmark account touched.
    AccountTouched {
        /// Address of account that is touched.
        address: Address,
    },
    /// Transfer balance between two accounts.
    ///
    /// Action: Transfer balance.
    ///
    /// Revert: Transfer balance back.
    BalanceTransfer {
        /// Address of account that sent the balance.
        from: Address,
        /// Address of account that received the balance.
        to: Address,
        /// Balance that is transferred.
        balance: U256,
    },
    /// Increment or set nonce of account.
    ///
    /// Action: Set nonce.
    ///
    /// Revert: Restore the previous nonce.
    NonceChange {
        /// Address of account whose nonce changed.
        address: Address,
        /// Nonce before the change.
        previous: u64,
    },
    /// Account is materialized as a new contract.
    ///
    /// Action: Mark account as created and clear its storage.
    ///
    /// Revert: Restore the whole account as it was before creation.
    AccountCreated {
        /// Address of the created account.
        address: Address,
        /// Account before creation.
        previous: Box<Account>,
    },
    /// Storage slot changed.
    ///
    /// Action: Storage changed.
    ///
    /// Revert: Revert to previous value.
    StorageChanged {
        /// Address of account whose storage changed.
        address: Address,
        /// Key of storage slot that changed.
        key: StorageKey,
        /// Previous value of storage slot.
        had_value: StorageValue,
    },
    /// Transient storage slot changed.
    ///
    /// Action: Transient storage changed.
    ///
    /// Revert: Revert to previous value.
    TransientStorageChange {
        /// Address of account whose transient storage changed.
        address: Address,
        /// Key of transient storage slot that changed.
        key: StorageKey,
        /// Previous value of transient storage slot.
        had_value: StorageValue,
    },
    /// Code of account changed.
    ///
    /// Action: Account code changed.
    ///
    /// Revert: Restore the previous code and hash.
    CodeChange {
        /// Address of account whose code changed.
        address: Address,
        /// Code before the change.
        previous_code: Bytes,
        /// Code hash before the change.
        previous_hash: B256,
    },
    /// Account marked for removal, its balance moved to `target`.
    ///
    /// Action: Mark account as self destructed and move balance.
    ///
    /// Revert: Restore the flag and move the balance back.
    AccountDestroyed {
        /// Address of account that is destroyed.
        address: Address,
        /// Address of account that received the balance.
        target: Address,
        /// Whether the account had already been destroyed before this entry.
        was_destroyed: bool,
        /// Balance moved out of the account.
        had_balance: U256,
    },
}

impl JournalEntry {
    /// Creates a journal entry for when an account is touched.
    pub fn account_touched(address: Address) -> Self {
        JournalEntry::AccountTouched { address }
    }

    /// Creates a journal entry for when a balance is transferred.
    pub fn balance_transfer(from: Address, to: Address, balance: U256) -> Self {
        JournalEntry::BalanceTransfer { from, to, balance }
    }

    /// Creates a journal entry for when a nonce changes.
    pub fn nonce_changed(address: Address, previous: u64) -> Self {
        JournalEntry::NonceChange { address, previous }
    }

    /// Creates a journal entry for when an account is created.
    pub fn account_created(address: Address, previous: Account) -> Self {
        JournalEntry::AccountCreated {
            address,
            previous: Box::new(previous),
        }
    }

    /// Creates a journal entry for when a storage slot is modified.
    pub fn storage_changed(address: Address, key: StorageKey, had_value: StorageValue) -> Self {
        JournalEntry::StorageChanged {
            address,
            key,
            had_value,
        }
    }

    /// Creates a journal entry for when a transient storage slot is modified.
    pub fn transient_storage_changed(
        address: Address,
        key: StorageKey,
        had_value: StorageValue,
    ) -> Self {
        JournalEntry::TransientStorageChange {
            address,
            key,
            had_value,
        }
    }

    /// Creates a journal entry for when code is set.
    pub fn code_changed(address: Address, previous_code: Bytes, previous_hash: B256) -> Self {
        JournalEntry::CodeChange {
            address,
            previous_code,
            previous_hash,
        }
    }

    /// Creates a journal entry for when an account is self destructed.
    pub fn account_destroyed(
        address: Address,
        target: Address,
        was_destroyed: bool,
        had_balance: U256,
    ) -> Self {
        JournalEntry::AccountDestroyed {
            address,
            target,
            was_destroyed,
            had_balance,
        }
    }

    /// Reverts the state change recorded by this journal entry.
    ///
    /// Accounts referenced by an entry are always present in `state` because they
    /// are loaded before they are mutated.
    pub fn revert(
        self,
        state: &mut EvmState,
        transient_storage: &mut TransientStorage,
        is_spurious_dragon_enabled: bool,
    ) {
        match self {
            JournalEntry::AccountTouched { address } => {
                // RIPEMD-160 precompile stays touched, mainnet block 2675119 relies on it.
                if is_spurious_dragon_enabled && address == PRECOMPILE3 {
                    return;
                }
                if let Some(account) = state.get_mut(&address) {
                    account.unmark_touch();
                }
            }
            JournalEntry::BalanceTransfer { from, to, balance } => {
                if let Some(from) = state.get_mut(&from) {
                    from.info.balance += balance;
                }
                if let Some(to) = state.get_mut(&to) {
                    to.info.balance -= balance;
                }
            }
            JournalEntry::NonceChange { address, previous } => {
                if let Some(account) = state.get_mut(&address) {
                    account.info.nonce = previous;
                }
            }
            JournalEntry::AccountCreated { address, previous } => {
                state.insert(address, *previous);
            }
            JournalEntry::StorageChanged {
                address,
                key,
                had_value,
            } => {
                if let Some(slot) = state
                    .get_mut(&address)
                    .and_then(|account| account.storage.get_mut(&key))
                {
                    slot.present_value = had_value;
                }
            }
            JournalEntry::TransientStorageChange {
                address,
                key,
                had_value,
            } => {
                let tkey = (address, key);
                if had_value.is_zero() {
                    transient_storage.remove(&tkey);
                } else {
                    transient_storage.insert(tkey, had_value);
                }
            }
            JournalEntry::CodeChange {
                address,
                previous_code,
                previous_hash,
            } => {
                if let Some(account) = state.get_mut(&address) {
                    account.info.code = previous_code;
                    account.info.code_hash = previous_hash;
                }
            }
            JournalEntry::AccountDestroyed {
                address,
                target,
                was_destroyed,
                had_balance,
            } => {
                if let Some(account) = state.get_mut(&address) {
                    if was_destroyed {
                        account.mark_selfdestruct();
                    } else {
                        account.unmark_selfdestruct();
                    }
                    account.info.balance += had_balance;
                }
                if address != target {
                    if let Some(target) = state.get_mut(&target) {
                        target.info.balance -= had_balance;
                    }
                }
            }
        }
    }
}
