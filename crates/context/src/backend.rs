//! State backend contract consumed by the host.
use auto_impl::auto_impl;
use database::DBErrorMarker;
use primitives::{hardfork::SpecId, Address, Bytes, Log, StorageKey, StorageValue, B256, U256};

/// Identifies a point in the journal that state can be reverted to.
///
/// A checkpoint is consumed by [`StateBackend::commit`] or [`StateBackend::revert`],
/// so it can not be used twice. Nested checkpoints have to be resolved before the
/// enclosing one.
#[derive(Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalCheckpoint {
    /// Number of logs at the time of the checkpoint.
    pub log_i: usize,
    /// Number of journal entries at the time of the checkpoint.
    pub journal_i: usize,
    /// Journal depth after the checkpoint was taken.
    pub depth: usize,
}

/// Transfer and creation result
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferError {
    /// Caller does not have enough funds
    OutOfFunds,
    /// Overflow in target account
    OverflowPayment,
}

/// Versioned account and storage backend.
///
/// Every mutation made after [`StateBackend::snapshot`] is undone by
/// [`StateBackend::revert`], including logs and transient storage. Errors are
/// failures of the underlying database and are not recoverable by the caller.
#[auto_impl(&mut, Box)]
pub trait StateBackend {
    /// Database error type.
    type Error: DBErrorMarker;

    /// Sets the hardfork that governs EIP-161 state clearing and touch reverts.
    fn set_spec_id(&mut self, spec: SpecId);

    /// Takes a checkpoint of the current state.
    fn snapshot(&mut self) -> JournalCheckpoint;

    /// Keeps every change made since `checkpoint`.
    fn commit(&mut self, checkpoint: JournalCheckpoint);

    /// Undoes every change made since `checkpoint`.
    fn revert(&mut self, checkpoint: JournalCheckpoint);

    /// Returns true if the account exists in state.
    fn exists(&mut self, address: Address) -> Result<bool, Self::Error>;

    /// Returns true if the account has no code, zero nonce and zero balance.
    fn is_empty(&mut self, address: Address) -> Result<bool, Self::Error>;

    /// Balance of the account.
    fn balance(&mut self, address: Address) -> Result<U256, Self::Error>;

    /// Nonce of the account.
    fn nonce(&mut self, address: Address) -> Result<u64, Self::Error>;

    /// Sets the nonce of the account.
    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), Self::Error>;

    /// Code of the account, empty if it has none.
    fn code(&mut self, address: Address) -> Result<Bytes, Self::Error>;

    /// Code hash of the account.
    ///
    /// Zero for accounts that do not exist or are empty.
    fn code_hash(&mut self, address: Address) -> Result<B256, Self::Error>;

    /// Sets the code of the account.
    fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), Self::Error>;

    /// Materializes a new contract account.
    ///
    /// The account is marked as created in this transaction, its storage is cleared
    /// and any balance already present is kept.
    fn create_account(&mut self, address: Address) -> Result<(), Self::Error>;

    /// Moves `value` from `from` to `to`, touching both accounts.
    ///
    /// Returns `Some` with the reason if the transfer could not be made, in which
    /// case no balance has moved.
    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<Option<TransferError>, Self::Error>;

    /// Marks the account as touched, bringing a non-existing account into existence.
    fn touch(&mut self, address: Address) -> Result<(), Self::Error>;

    /// Current value of a storage slot.
    fn storage(&mut self, address: Address, key: StorageKey) -> Result<StorageValue, Self::Error>;

    /// Value of a storage slot at the start of the transaction.
    fn committed_storage(
        &mut self,
        address: Address,
        key: StorageKey,
    ) -> Result<StorageValue, Self::Error>;

    /// Sets the current value of a storage slot.
    fn set_storage(
        &mut self,
        address: Address,
        key: StorageKey,
        value: StorageValue,
    ) -> Result<(), Self::Error>;

    /// Reads a transient storage slot.
    fn transient_storage(&mut self, address: Address, key: StorageKey) -> StorageValue;

    /// Writes a transient storage slot.
    fn set_transient_storage(&mut self, address: Address, key: StorageKey, value: StorageValue);

    /// Appends a log.
    fn log(&mut self, log: Log);

    /// Legacy self destruct: marks the account for removal and moves its balance
    /// to `target`. Always returns true.
    fn selfdestruct(&mut self, address: Address, target: Address) -> Result<bool, Self::Error>;

    /// EIP-6780 self destruct: the balance always moves to `target`, the account
    /// is only marked for removal if it was created in this transaction.
    ///
    /// Returns whether the account will be removed.
    fn selfdestruct_6780(&mut self, address: Address, target: Address)
        -> Result<bool, Self::Error>;

    /// Returns true if the account was created in this transaction.
    fn is_created(&self, address: Address) -> bool;

    /// Hash of the block with the given number.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;

    /// Ends the transaction.
    ///
    /// Destructed accounts are removed, changes are written to the database,
    /// transient storage is cleared. Returns the logs emitted by the transaction.
    fn finalize_transaction(&mut self) -> Vec<Log>;
}
