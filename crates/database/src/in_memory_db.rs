use crate::{Database, DatabaseCommit};
use core::convert::Infallible;
use primitives::{Address, HashMap, StorageKey, StorageValue, B256};
use state::{AccountInfo, EvmState};

/// Account stored in [`InMemoryDB`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbAccount {
    /// Balance, nonce and code.
    pub info: AccountInfo,
    /// Committed storage.
    pub storage: HashMap<StorageKey, StorageValue>,
}

/// A [Database] implementation that keeps all accounts in memory.
///
/// Used as the backing store of the journal in tests and simulations.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InMemoryDB {
    /// Existing accounts.
    pub accounts: HashMap<Address, DbAccount>,
    /// Known block hashes by number.
    pub block_hashes: HashMap<u64, B256>,
}

impl InMemoryDB {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts account info but does not override storage.
    pub fn insert_account_info(&mut self, address: Address, info: AccountInfo) {
        self.accounts.entry(address).or_default().info = info;
    }

    /// Inserts a storage slot, creating the account if needed.
    pub fn insert_account_storage(
        &mut self,
        address: Address,
        slot: StorageKey,
        value: StorageValue,
    ) {
        self.accounts
            .entry(address)
            .or_default()
            .storage
            .insert(slot, value);
    }

    /// Records the hash of block `number`.
    pub fn insert_block_hash(&mut self, number: u64, hash: B256) {
        self.block_hashes.insert(number, hash);
    }

    /// Builder variant of [`InMemoryDB::insert_account_info`].
    pub fn with_account(mut self, address: Address, info: AccountInfo) -> Self {
        self.insert_account_info(address, info);
        self
    }
}

impl Database for InMemoryDB {
    type Error = Infallible;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        Ok(self.accounts.get(&address).map(|account| account.info.clone()))
    }

    fn storage(
        &mut self,
        address: Address,
        index: StorageKey,
    ) -> Result<StorageValue, Self::Error> {
        Ok(self
            .accounts
            .get(&address)
            .and_then(|account| account.storage.get(&index).copied())
            .unwrap_or_default())
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(self.block_hashes.get(&number).copied().unwrap_or_default())
    }
}

impl DatabaseCommit for InMemoryDB {
    fn commit(&mut self, changes: EvmState) {
        for (address, account) in changes {
            if !account.is_touched() && !account.is_created() {
                continue;
            }
            if account.is_selfdestructed() {
                self.accounts.remove(&address);
                continue;
            }
            let db_account = self.accounts.entry(address).or_default();
            if account.is_created() {
                db_account.storage.clear();
            }
            db_account.info = account.info;
            db_account.storage.extend(
                account
                    .storage
                    .into_iter()
                    .map(|(key, slot)| (key, slot.present_value())),
            );
        }
    }
}
