//! Database interface used by the journal to load accounts, storage and block hashes,
//! together with an in-memory implementation.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use auto_impl::auto_impl;
use core::convert::Infallible;
use primitives::{Address, StorageKey, StorageValue, B256};
use state::AccountInfo;

pub mod empty_db;
pub mod in_memory_db;

pub use empty_db::{EmptyDB, EmptyDBTyped};
pub use in_memory_db::{DbAccount, InMemoryDB};

/// Database error marker is needed to implement From conversion for Error type.
pub trait DBErrorMarker: core::error::Error + Send + Sync + 'static {}

/// Implement marker for `Infallible`.
impl DBErrorMarker for Infallible {}

/// EVM database interface.
///
/// Read side of the state backend. Accounts are returned with their code.
#[auto_impl(&mut, Box)]
pub trait Database {
    /// The database error type.
    type Error: DBErrorMarker;

    /// Gets basic account information, `None` if the account does not exist.
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Gets storage value of address at index.
    fn storage(&mut self, address: Address, index: StorageKey)
        -> Result<StorageValue, Self::Error>;

    /// Gets block hash by block number.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
}

/// EVM database commit interface.
#[auto_impl(&mut, Box)]
pub trait DatabaseCommit {
    /// Commit changes to the database.
    fn commit(&mut self, changes: state::EvmState);
}
