//! This module contains [`Journal`] struct and implements [`StateBackend`] trait for it.
//!
//! Entry submodule contains [`JournalEntry`] and inner submodule contains
//! [`JournalInner`] struct that contains state.
pub mod entry;
pub mod inner;

pub use entry::JournalEntry;
pub use inner::JournalInner;

use crate::{JournalCheckpoint, StateBackend, TransferError};
use core::ops::{Deref, DerefMut};
use database::{Database, DatabaseCommit};
use primitives::{hardfork::SpecId, Address, Bytes, Log, StorageKey, StorageValue, B256, U256};
use tracing::debug;

/// A journal of state changes internal to the EVM
///
/// Every checkpoint increases the depth of the journal. All state changes are
/// recorded as [`JournalEntry`]s so that changes made after a checkpoint can be
/// reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journal<DB> {
    /// Database
    pub database: DB,
    /// Inner journal state.
    pub inner: JournalInner,
}

impl<DB> Deref for Journal<DB> {
    type Target = JournalInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<DB> DerefMut for Journal<DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<DB> Journal<DB> {
    /// Creates a new journal on top of `database`.
    pub fn new(database: DB) -> Self {
        Self {
            database,
            inner: JournalInner::new(),
        }
    }

    /// Creates a new journal with the given spec.
    pub fn new_with_spec(database: DB, spec: SpecId) -> Self {
        let mut journal = Self::new(database);
        journal.inner.set_spec_id(spec);
        journal
    }

    /// Returns the database.
    pub fn db(&self) -> &DB {
        &self.database
    }

    /// Returns the database mutably.
    pub fn db_mut(&mut self) -> &mut DB {
        &mut self.database
    }
}

impl<DB: Database + DatabaseCommit> StateBackend for Journal<DB> {
    type Error = DB::Error;

    fn set_spec_id(&mut self, spec: SpecId) {
        self.inner.set_spec_id(spec);
    }

    fn snapshot(&mut self) -> JournalCheckpoint {
        self.inner.checkpoint()
    }

    fn commit(&mut self, checkpoint: JournalCheckpoint) {
        self.inner.checkpoint_commit(checkpoint);
    }

    fn revert(&mut self, checkpoint: JournalCheckpoint) {
        self.inner.checkpoint_revert(checkpoint);
    }

    fn exists(&mut self, address: Address) -> Result<bool, Self::Error> {
        Ok(self.inner.load_account(&mut self.database, address)?.exists())
    }

    fn is_empty(&mut self, address: Address) -> Result<bool, Self::Error> {
        Ok(self.inner.load_account(&mut self.database, address)?.is_empty())
    }

    fn balance(&mut self, address: Address) -> Result<U256, Self::Error> {
        Ok(self
            .inner
            .load_account(&mut self.database, address)?
            .info
            .balance)
    }

    fn nonce(&mut self, address: Address) -> Result<u64, Self::Error> {
        Ok(self.inner.load_account(&mut self.database, address)?.info.nonce)
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), Self::Error> {
        self.inner.set_nonce(&mut self.database, address, nonce)
    }

    fn code(&mut self, address: Address) -> Result<Bytes, Self::Error> {
        Ok(self
            .inner
            .load_account(&mut self.database, address)?
            .info
            .code
            .clone())
    }

    fn code_hash(&mut self, address: Address) -> Result<B256, Self::Error> {
        self.inner.code_hash(&mut self.database, address)
    }

    fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), Self::Error> {
        self.inner.set_code(&mut self.database, address, code)
    }

    fn create_account(&mut self, address: Address) -> Result<(), Self::Error> {
        self.inner.create_account(&mut self.database, address)
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<Option<TransferError>, Self::Error> {
        self.inner.transfer(&mut self.database, from, to, value)
    }

    fn touch(&mut self, address: Address) -> Result<(), Self::Error> {
        self.inner.touch(&mut self.database, address)
    }

    fn storage(&mut self, address: Address, key: StorageKey) -> Result<StorageValue, Self::Error> {
        Ok(self
            .inner
            .sload(&mut self.database, address, key)?
            .present_value())
    }

    fn committed_storage(
        &mut self,
        address: Address,
        key: StorageKey,
    ) -> Result<StorageValue, Self::Error> {
        Ok(self
            .inner
            .sload(&mut self.database, address, key)?
            .original_value())
    }

    fn set_storage(
        &mut self,
        address: Address,
        key: StorageKey,
        value: StorageValue,
    ) -> Result<(), Self::Error> {
        self.inner.sstore(&mut self.database, address, key, value)
    }

    fn transient_storage(&mut self, address: Address, key: StorageKey) -> StorageValue {
        self.inner.tload(address, key)
    }

    fn set_transient_storage(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.inner.tstore(address, key, value);
    }

    fn log(&mut self, log: Log) {
        self.inner.log(log);
    }

    fn selfdestruct(&mut self, address: Address, target: Address) -> Result<bool, Self::Error> {
        self.inner.selfdestruct(&mut self.database, address, target)?;
        Ok(true)
    }

    fn selfdestruct_6780(
        &mut self,
        address: Address,
        target: Address,
    ) -> Result<bool, Self::Error> {
        if self.inner.load_account(&mut self.database, address)?.is_created() {
            self.inner.selfdestruct(&mut self.database, address, target)?;
            return Ok(true);
        }
        if address != target {
            let balance = self.balance(address)?;
            let transferred = self
                .inner
                .transfer(&mut self.database, address, target, balance)?;
            if let Some(error) = transferred {
                debug!(?error, %address, %target, "selfdestruct balance transfer failed");
            }
        }
        Ok(false)
    }

    fn is_created(&self, address: Address) -> bool {
        self.inner
            .state
            .get(&address)
            .is_some_and(|account| account.is_created())
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        self.database.block_hash(number)
    }

    fn finalize_transaction(&mut self) -> Vec<Log> {
        let (state, logs) = self.inner.finalize();
        self.database.commit(state);
        logs
    }
}
