//! The two halves of the host and interpreter recursion.
//!
//! The interpreter consumes [`Host`] and the host consumes [`ExecutionEngine`]. A
//! nested `CALL` or `CREATE` executed by the interpreter goes back through
//! [`Host::call`].
use crate::{AccessStatus, CallContext, ExecutionResult, StorageStatus};
use auto_impl::auto_impl;
use context::TxContext;
use primitives::{Address, Bytes, StorageKey, StorageValue, B256, U256};

/// Capabilities the host offers to the interpreter.
///
/// Methods never fail. A state backend failure is recorded by the host, the method
/// returns a default value and the current message fails once control returns to
/// the host.
#[auto_impl(&mut, Box)]
pub trait Host {
    /// Returns true if the account exists.
    ///
    /// From Spurious Dragon on, empty accounts are considered non-existent.
    fn account_exists(&mut self, address: Address) -> bool;

    /// Current value of a storage slot.
    fn get_storage(&mut self, address: Address, key: StorageKey) -> StorageValue;

    /// Writes a storage slot and classifies the transition.
    fn set_storage(
        &mut self,
        address: Address,
        key: StorageKey,
        value: StorageValue,
    ) -> StorageStatus;

    /// Balance of the account.
    fn get_balance(&mut self, address: Address) -> U256;

    /// Size of the account code.
    fn get_code_size(&mut self, address: Address) -> usize;

    /// Hash of the account code, zero for non-existent or empty accounts.
    fn get_code_hash(&mut self, address: Address) -> B256;

    /// Code of the account.
    fn get_code(&mut self, address: Address) -> Bytes;

    /// Self destructs `address` in favour of `beneficiary`.
    ///
    /// Returns whether the account will be removed.
    fn selfdestruct(&mut self, address: Address, beneficiary: Address) -> bool;

    /// Transaction and block values.
    fn tx_context(&self) -> &TxContext;

    /// Hash of one of the 256 most recent blocks, zero otherwise.
    fn block_hash(&mut self, number: u64) -> B256;

    /// Emits a log attributed to `address`.
    fn emit_log(&mut self, address: Address, topics: &[B256], data: &Bytes);

    /// Executes a nested call or create message.
    fn call(&mut self, context: CallContext) -> ExecutionResult;

    /// Marks the account warm.
    fn access_account(&mut self, address: Address) -> AccessStatus;

    /// Marks the storage slot warm.
    fn access_storage(&mut self, address: Address, key: StorageKey) -> AccessStatus;

    /// Reads a transient storage slot.
    fn get_transient_storage(&mut self, address: Address, key: StorageKey) -> StorageValue;

    /// Writes a transient storage slot.
    fn set_transient_storage(&mut self, address: Address, key: StorageKey, value: StorageValue);
}

/// Bytecode interpreter driven by the host.
///
/// Runs `code` in the frame described by `context`. Gas accounting is the engine's
/// business, the host only clamps the reported values. The engine may re-enter the
/// host through `host` for nested messages.
#[auto_impl(&, Box, Arc)]
pub trait ExecutionEngine {
    /// Executes `code`.
    fn execute(&self, host: &mut dyn Host, context: &CallContext, code: &Bytes)
        -> ExecutionResult;
}
