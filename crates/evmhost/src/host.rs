//! [`CallHost`], the host handed to the interpreter.
use crate::{
    selfdestruct::{selfdestruct, SelfDestructRegime},
    AccessListTracker, AccessStatus, CallContext, CallObserver, ExecutionEngine, ExecutionResult,
    Host, NoopObserver, PrecompileProvider, PrecompileSet, StorageStatus,
};
use context::{BlockEnv, CfgEnv, ForkRules, StateBackend, TxContext, TxEnv};
use core::fmt;
use database::DBErrorMarker;
use primitives::{
    Address, Bytes, Log, StorageKey, StorageValue, B256, BLOCK_HASH_HISTORY, U256,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Error that ends a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError<DBError> {
    /// State backend failed.
    Database(DBError),
}

impl<DBError: DBErrorMarker> From<DBError> for HostError<DBError> {
    fn from(value: DBError) -> Self {
        Self::Database(value)
    }
}

impl<DBError: fmt::Display> fmt::Display for HostError<DBError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl<DBError> core::error::Error for HostError<DBError>
where
    DBError: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
        }
    }
}

/// Host layer between an [`ExecutionEngine`] and a [`StateBackend`].
///
/// Owns the backend for the duration of a transaction, together with the
/// access list and the first fatal backend error.
pub struct CallHost<B: StateBackend, E, P = PrecompileSet, O = NoopObserver> {
    pub(crate) backend: B,
    pub(crate) engine: Arc<E>,
    pub(crate) precompiles: P,
    pub(crate) observer: O,
    pub(crate) cfg: CfgEnv,
    pub(crate) rules: ForkRules,
    pub(crate) block: BlockEnv,
    pub(crate) tx_context: TxContext,
    pub(crate) access_list: AccessListTracker,
    pub(crate) error: Option<B::Error>,
}

impl<B, E, P, O> fmt::Debug for CallHost<B, E, P, O>
where
    B: StateBackend + fmt::Debug,
    P: fmt::Debug,
    O: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallHost")
            .field("backend", &self.backend)
            .field("precompiles", &self.precompiles)
            .field("observer", &self.observer)
            .field("cfg", &self.cfg)
            .field("block", &self.block)
            .field("tx_context", &self.tx_context)
            .field("access_list", &self.access_list)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<B: StateBackend, E: ExecutionEngine> CallHost<B, E> {
    /// Creates a host over `backend` executing code with `engine`.
    ///
    /// The backend is switched to the configured hardfork. No precompiles are
    /// registered.
    pub fn new(mut backend: B, engine: Arc<E>, cfg: CfgEnv, block: BlockEnv) -> Self {
        backend.set_spec_id(cfg.spec);
        let rules = cfg.fork_rules();
        debug!(spec = %cfg.spec, chain_id = cfg.chain_id, aura = cfg.is_aura, "created host");
        let tx_context = TxContext::new(&cfg, &block, &TxEnv::default());
        Self {
            backend,
            engine,
            precompiles: PrecompileSet::default(),
            observer: NoopObserver,
            cfg,
            rules,
            block,
            tx_context,
            access_list: AccessListTracker::new(),
            error: None,
        }
    }
}

impl<B, E, P, O> CallHost<B, E, P, O>
where
    B: StateBackend,
    E: ExecutionEngine,
    P: PrecompileProvider,
    O: CallObserver,
{
    /// Replaces the precompile set.
    pub fn with_precompiles<P2: PrecompileProvider>(
        self,
        precompiles: P2,
    ) -> CallHost<B, E, P2, O> {
        CallHost {
            backend: self.backend,
            engine: self.engine,
            precompiles,
            observer: self.observer,
            cfg: self.cfg,
            rules: self.rules,
            block: self.block,
            tx_context: self.tx_context,
            access_list: self.access_list,
            error: self.error,
        }
    }

    /// Replaces the observer.
    pub fn with_observer<O2: CallObserver>(self, observer: O2) -> CallHost<B, E, P, O2> {
        CallHost {
            backend: self.backend,
            engine: self.engine,
            precompiles: self.precompiles,
            observer,
            cfg: self.cfg,
            rules: self.rules,
            block: self.block,
            tx_context: self.tx_context,
            access_list: self.access_list,
            error: self.error,
        }
    }

    /// Returns the state backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the state backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the host and returns the state backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Returns the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns the configuration.
    pub fn cfg(&self) -> &CfgEnv {
        &self.cfg
    }

    /// Returns the active fork rules.
    pub fn rules(&self) -> &ForkRules {
        &self.rules
    }

    /// Returns the block environment.
    pub fn block(&self) -> &BlockEnv {
        &self.block
    }

    /// Returns the access list of the current transaction.
    pub fn access_list(&self) -> &AccessListTracker {
        &self.access_list
    }

    /// Returns the fatal backend error recorded in this transaction, if any.
    pub fn fatal_error(&self) -> Option<&B::Error> {
        self.error.as_ref()
    }

    /// Starts the transaction `tx` whose outermost message targets `recipient`.
    ///
    /// From Berlin on, the origin, the recipient, the precompiles and the entries
    /// of the transaction access list start warm. From Shanghai on, so does the
    /// coinbase.
    pub fn begin_transaction(&mut self, tx: &TxEnv, recipient: Option<Address>) {
        self.tx_context = TxContext::new(&self.cfg, &self.block, tx);
        self.access_list.clear();
        self.error = None;

        if !self.rules.is_berlin {
            return;
        }
        self.access_list.access_address(tx.caller);
        if let Some(recipient) = recipient {
            self.access_list.access_address(recipient);
        }
        self.access_list
            .warm_addresses(self.precompiles.warm_addresses());
        self.access_list.warm_access_list(&tx.access_list);
        if self.rules.is_shanghai {
            self.access_list.access_address(self.block.beneficiary);
        }
        trace!(origin = %tx.caller, ?recipient, "began transaction");
    }

    /// Executes the outermost message of the transaction.
    ///
    /// The message runs at depth zero. A failed message is an `Ok` result, only a
    /// failure of the state backend is an error.
    pub fn transact(
        &mut self,
        mut context: CallContext,
    ) -> Result<ExecutionResult, HostError<B::Error>> {
        context.depth = 0;
        let result = self.dispatch(context);
        if let Some(error) = self.error.take() {
            debug!(%error, "transaction aborted by state backend");
            return Err(HostError::Database(error));
        }
        Ok(result)
    }

    /// Ends the transaction.
    ///
    /// State changes are finalized in the backend and the access list is cleared.
    /// Returns the logs emitted by the transaction.
    pub fn end_transaction(&mut self) -> Vec<Log> {
        self.access_list.clear();
        self.error = None;
        self.backend.finalize_transaction()
    }

    /// Records a fatal backend error. Only the first one is kept.
    pub(crate) fn stash_error(&mut self, error: B::Error) {
        debug!(%error, "state backend failed");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Unwraps a backend result, recording the error and returning the default value.
    #[inline]
    pub(crate) fn ok_or_stash<T: Default>(&mut self, result: Result<T, B::Error>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => {
                self.stash_error(error);
                T::default()
            }
        }
    }
}

impl<B, E, P, O> Host for CallHost<B, E, P, O>
where
    B: StateBackend,
    E: ExecutionEngine,
    P: PrecompileProvider,
    O: CallObserver,
{
    fn account_exists(&mut self, address: Address) -> bool {
        let exists = self.backend.exists(address);
        if !self.ok_or_stash(exists) {
            return false;
        }
        if !self.rules.is_spurious_dragon {
            return true;
        }
        let is_empty = self.backend.is_empty(address);
        !self.ok_or_stash(is_empty)
    }

    fn get_storage(&mut self, address: Address, key: StorageKey) -> StorageValue {
        let value = self.backend.storage(address, key);
        self.ok_or_stash(value)
    }

    fn set_storage(
        &mut self,
        address: Address,
        key: StorageKey,
        value: StorageValue,
    ) -> StorageStatus {
        let current = self.backend.storage(address, key);
        let current = self.ok_or_stash(current);
        let original = self.backend.committed_storage(address, key);
        let original = self.ok_or_stash(original);

        let status = StorageStatus::classify(original, current, value);
        let written = self.backend.set_storage(address, key, value);
        self.ok_or_stash(written);
        status
    }

    fn get_balance(&mut self, address: Address) -> U256 {
        let balance = self.backend.balance(address);
        self.ok_or_stash(balance)
    }

    fn get_code_size(&mut self, address: Address) -> usize {
        self.get_code(address).len()
    }

    fn get_code_hash(&mut self, address: Address) -> B256 {
        let hash = self.backend.code_hash(address);
        self.ok_or_stash(hash)
    }

    fn get_code(&mut self, address: Address) -> Bytes {
        let code = self.backend.code(address);
        self.ok_or_stash(code)
    }

    fn selfdestruct(&mut self, address: Address, beneficiary: Address) -> bool {
        let regime = SelfDestructRegime::from_rules(&self.rules);
        let removed = selfdestruct(&mut self.backend, regime, address, beneficiary);
        self.ok_or_stash(removed)
    }

    fn tx_context(&self) -> &TxContext {
        &self.tx_context
    }

    fn block_hash(&mut self, number: u64) -> B256 {
        let current = self.block.number;
        if number >= current || number < current.saturating_sub(BLOCK_HASH_HISTORY) {
            return B256::ZERO;
        }
        let hash = self.backend.block_hash(number);
        self.ok_or_stash(hash)
    }

    fn emit_log(&mut self, address: Address, topics: &[B256], data: &Bytes) {
        self.backend
            .log(Log::new_unchecked(address, topics.to_vec(), data.clone()));
    }

    fn call(&mut self, context: CallContext) -> ExecutionResult {
        self.dispatch(context)
    }

    fn access_account(&mut self, address: Address) -> AccessStatus {
        self.access_list.access_address(address)
    }

    fn access_storage(&mut self, address: Address, key: StorageKey) -> AccessStatus {
        self.access_list.access_storage_slot(address, key)
    }

    fn get_transient_storage(&mut self, address: Address, key: StorageKey) -> StorageValue {
        self.backend.transient_storage(address, key)
    }

    fn set_transient_storage(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.backend.set_transient_storage(address, key, value);
    }
}
