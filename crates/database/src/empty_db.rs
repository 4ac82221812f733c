//! Database without any accounts.
use crate::{DBErrorMarker, Database, DatabaseCommit};
use core::{convert::Infallible, fmt, marker::PhantomData};
use primitives::{Address, StorageKey, StorageValue, B256};
use state::{AccountInfo, EvmState};

/// [`EmptyDBTyped`] that never fails.
pub type EmptyDB = EmptyDBTyped<Infallible>;

/// Database in which every account is missing, every slot is zero and every
/// block hash is unknown. Commits are discarded.
///
/// `E` is the error type reported to the journal. It is never produced.
pub struct EmptyDBTyped<E> {
    _error: PhantomData<fn() -> E>,
}

impl<E> EmptyDBTyped<E> {
    /// Creates the database.
    pub const fn new() -> Self {
        Self {
            _error: PhantomData,
        }
    }
}

// manual impls, `E` needs no bounds
impl<E> Clone for EmptyDBTyped<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EmptyDBTyped<E> {}

impl<E> Default for EmptyDBTyped<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EmptyDBTyped<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EmptyDB")
    }
}

impl<E: DBErrorMarker> Database for EmptyDBTyped<E> {
    type Error = E;

    #[inline]
    fn basic(&mut self, _address: Address) -> Result<Option<AccountInfo>, E> {
        Ok(None)
    }

    #[inline]
    fn storage(&mut self, _address: Address, _index: StorageKey) -> Result<StorageValue, E> {
        Ok(StorageValue::ZERO)
    }

    #[inline]
    fn block_hash(&mut self, _number: u64) -> Result<B256, E> {
        Ok(B256::ZERO)
    }
}

impl<E> DatabaseCommit for EmptyDBTyped<E> {
    #[inline]
    fn commit(&mut self, _changes: EvmState) {}
}
