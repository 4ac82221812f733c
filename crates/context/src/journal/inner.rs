//! Module containing the [`JournalInner`] that is part of [`crate::Journal`].
use super::JournalEntry;
use crate::{JournalCheckpoint, TransferError};
use core::mem;
use database::Database;
use primitives::{
    hardfork::SpecId::{self, *},
    hash_map::Entry,
    Address, Bytes, HashMap, Log, StorageKey, StorageValue, B256, U256,
};
use state::{Account, AccountStatus, EvmState, StorageSlot, TransientStorage};
use tracing::trace;

/// Inner journal state that contains journal and state changes.
///
/// Spec Id is a essential information for the Journal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalInner {
    /// The current state
    pub state: EvmState,
    /// Transient storage that is discarded after every transaction.
    ///
    /// See [EIP-1153](https://eips.ethereum.org/EIPS/eip-1153).
    pub transient_storage: TransientStorage,
    /// Emitted logs
    pub logs: Vec<Log>,
    /// The current checkpoint depth
    pub depth: usize,
    /// The journal of state changes
    pub journal: Vec<JournalEntry>,
    /// The spec ID used for two things:
    ///
    /// - [EIP-161]: Prior to this EIP, Ethereum had separate definitions for empty and
    ///   non-existing accounts.
    /// - RIPEMD-160 touch that survives revert, a consequence of EIP-161.
    ///
    /// [EIP-161]: https://eips.ethereum.org/EIPS/eip-161
    pub spec: SpecId,
}

impl Default for JournalInner {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalInner {
    /// Creates new [`JournalInner`].
    pub fn new() -> JournalInner {
        Self {
            state: HashMap::default(),
            transient_storage: TransientStorage::default(),
            logs: Vec::new(),
            journal: Vec::new(),
            depth: 0,
            spec: SpecId::default(),
        }
    }

    /// Sets SpecId.
    #[inline]
    pub fn set_spec_id(&mut self, spec: SpecId) {
        self.spec = spec;
    }

    /// Creates a checkpoint of the current state.
    #[inline]
    pub fn checkpoint(&mut self) -> JournalCheckpoint {
        self.depth += 1;
        JournalCheckpoint {
            log_i: self.logs.len(),
            journal_i: self.journal.len(),
            depth: self.depth,
        }
    }

    /// Commits the checkpoint.
    #[inline]
    pub fn checkpoint_commit(&mut self, checkpoint: JournalCheckpoint) {
        debug_assert_eq!(checkpoint.depth, self.depth, "checkpoint committed out of order");
        self.depth -= 1;
    }

    /// Reverts all changes to state until given checkpoint.
    #[inline]
    pub fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        debug_assert_eq!(checkpoint.depth, self.depth, "checkpoint reverted out of order");
        let is_spurious_dragon_enabled = self.spec.is_enabled_in(SPURIOUS_DRAGON);
        let state = &mut self.state;
        let transient_storage = &mut self.transient_storage;
        self.depth -= 1;
        self.logs.truncate(checkpoint.log_i);

        // iterate over last N journals sets and revert our global state
        self.journal
            .drain(checkpoint.journal_i..)
            .rev()
            .for_each(|entry| {
                entry.revert(state, transient_storage, is_spurious_dragon_enabled);
            });
    }

    /// Loads account into memory, returning it from the cache if already present.
    #[inline]
    pub fn load_account<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
    ) -> Result<&mut Account, DB::Error> {
        Ok(match self.state.entry(address) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(vac) => {
                let account = match db.basic(address)? {
                    Some(info) => Account::from(info),
                    None => Account::new_not_existing(),
                };
                vac.insert(account)
            }
        })
    }

    /// Marks account as touched and records it in the journal the first time.
    #[inline]
    pub fn touch<DB: Database>(&mut self, db: &mut DB, address: Address) -> Result<(), DB::Error> {
        let account = self.load_account(db, address)?;
        if !account.is_touched() {
            account.mark_touch();
            self.journal.push(JournalEntry::account_touched(address));
        }
        Ok(())
    }

    /// Sets the nonce of the account.
    #[inline]
    pub fn set_nonce<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
        nonce: u64,
    ) -> Result<(), DB::Error> {
        self.touch(db, address)?;
        let account = self.load_account(db, address)?;
        let previous = mem::replace(&mut account.info.nonce, nonce);
        self.journal
            .push(JournalEntry::nonce_changed(address, previous));
        Ok(())
    }

    /// Sets code and its hash to the account.
    #[inline]
    pub fn set_code<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
        code: Bytes,
    ) -> Result<(), DB::Error> {
        self.touch(db, address)?;
        let account = self.load_account(db, address)?;
        let previous_code = account.info.code.clone();
        let previous_hash = account.info.code_hash;
        account.info.set_code(code);
        self.journal.push(JournalEntry::code_changed(
            address,
            previous_code,
            previous_hash,
        ));
        Ok(())
    }

    /// Materializes a new contract account at `address`.
    ///
    /// Storage is cleared, balance is kept, nonce and code are reset.
    #[inline]
    pub fn create_account<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
    ) -> Result<(), DB::Error> {
        let account = self.load_account(db, address)?;
        let previous = account.clone();
        let balance = account.info.balance;

        account.info = Default::default();
        account.info.balance = balance;
        account.storage.clear();
        account.status = AccountStatus::empty();
        account.mark_created();
        account.mark_touch();

        self.journal
            .push(JournalEntry::account_created(address, previous));
        Ok(())
    }

    /// Transfers balance from two accounts. Returns error if sender balance is not enough.
    #[inline]
    pub fn transfer<DB: Database>(
        &mut self,
        db: &mut DB,
        from: Address,
        to: Address,
        balance: U256,
    ) -> Result<Option<TransferError>, DB::Error> {
        let from_balance = self.load_account(db, from)?.info.balance;
        let Some(from_balance_decr) = from_balance.checked_sub(balance) else {
            return Ok(Some(TransferError::OutOfFunds));
        };
        let to_balance = self.load_account(db, to)?.info.balance;
        if from != to && to_balance.checked_add(balance).is_none() {
            return Ok(Some(TransferError::OverflowPayment));
        }

        self.touch(db, from)?;
        self.touch(db, to)?;
        if balance.is_zero() || from == to {
            return Ok(None);
        }

        if let Some(from_account) = self.state.get_mut(&from) {
            from_account.info.balance = from_balance_decr;
        }
        if let Some(to_account) = self.state.get_mut(&to) {
            to_account.info.balance += balance;
        }

        self.journal
            .push(JournalEntry::balance_transfer(from, to, balance));
        Ok(None)
    }

    /// Loads storage slot, reading the database on first access.
    ///
    /// Slots of accounts created in this transaction, or not present in the
    /// database, start empty.
    #[inline]
    pub fn sload<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
        key: StorageKey,
    ) -> Result<&mut StorageSlot, DB::Error> {
        let account = self.load_account(db, address)?;
        let is_fresh = account.is_created()
            || account
                .status
                .contains(AccountStatus::LoadedAsNotExisting);
        Ok(match account.storage.entry(key) {
            Entry::Occupied(occ) => occ.into_mut(),
            Entry::Vacant(vac) => {
                let value = if is_fresh {
                    StorageValue::ZERO
                } else {
                    db.storage(address, key)?
                };
                vac.insert(StorageSlot::new(value))
            }
        })
    }

    /// Stores storage slot.
    #[inline]
    pub fn sstore<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
        key: StorageKey,
        new: StorageValue,
    ) -> Result<(), DB::Error> {
        self.touch(db, address)?;
        let slot = self.sload(db, address, key)?;
        let had_value = mem::replace(&mut slot.present_value, new);
        if had_value != new {
            self.journal
                .push(JournalEntry::storage_changed(address, key, had_value));
        }
        Ok(())
    }

    /// Transient value of `key` in `address` (EIP-1153).
    #[inline]
    pub fn tload(&self, address: Address, key: StorageKey) -> StorageValue {
        self.transient_storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    /// Writes a transient value. Zero removes the entry.
    ///
    /// Only actual changes are journaled.
    #[inline]
    pub fn tstore(&mut self, address: Address, key: StorageKey, new: StorageValue) {
        let previous = if new.is_zero() {
            self.transient_storage.remove(&(address, key))
        } else {
            self.transient_storage
                .insert((address, key), new)
                .or(Some(StorageValue::ZERO))
                .filter(|previous| *previous != new)
        };

        if let Some(previous) = previous {
            self.journal.push(JournalEntry::transient_storage_changed(
                address, key, previous,
            ));
        }
    }

    /// Appends a log. Reverted checkpoints truncate the log list.
    #[inline]
    pub fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    /// Marks `address` for removal and moves its whole balance to `target`.
    ///
    /// If `target` is `address` itself the balance is burned.
    pub fn selfdestruct<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
        target: Address,
    ) -> Result<(), DB::Error> {
        self.touch(db, address)?;
        self.touch(db, target)?;

        let account = self.load_account(db, address)?;
        let had_balance = mem::take(&mut account.info.balance);
        let was_destroyed = account.is_selfdestructed();
        account.mark_selfdestruct();

        if address != target {
            let target_account = self.load_account(db, target)?;
            target_account.info.balance = target_account.info.balance.saturating_add(had_balance);
        }

        self.journal.push(JournalEntry::account_destroyed(
            address,
            target,
            was_destroyed,
            had_balance,
        ));
        Ok(())
    }

    /// Ends the transaction and returns the state that has to be committed to the database.
    ///
    /// From Spurious Dragon on, touched empty accounts are marked for removal.
    pub fn finalize(&mut self) -> (EvmState, Vec<Log>) {
        let is_spurious_dragon_enabled = self.spec.is_enabled_in(SPURIOUS_DRAGON);
        let mut state = mem::take(&mut self.state);
        if is_spurious_dragon_enabled {
            for account in state.values_mut() {
                if account.is_touched() && account.is_empty() {
                    account.mark_selfdestruct();
                }
            }
        }
        for account in state.values_mut() {
            for slot in account.storage.values_mut() {
                slot.commit();
            }
        }
        trace!(accounts = state.len(), logs = self.logs.len(), "finalized transaction");

        self.transient_storage.clear();
        self.journal.clear();
        self.depth = 0;
        (state, mem::take(&mut self.logs))
    }

    /// Hash of the account code, zero for non-existing or empty accounts.
    #[inline]
    pub fn code_hash<DB: Database>(
        &mut self,
        db: &mut DB,
        address: Address,
    ) -> Result<B256, DB::Error> {
        let account = self.load_account(db, address)?;
        if !account.exists() || account.is_empty() {
            return Ok(B256::ZERO);
        }
        Ok(account.info.code_hash)
    }
}
