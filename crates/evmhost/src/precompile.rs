//! Precompiled contract seam.
//!
//! Implementations of the precompiles themselves live outside this crate, they are
//! registered into a [`PrecompileSet`] by the embedder.
use auto_impl::auto_impl;
use primitives::{Address, Bytes, HashMap};

/// Output of a precompile run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PrecompileOutput {
    /// Gas used by the precompile
    pub gas_used: u64,
    /// Output bytes
    pub bytes: Bytes,
}

impl PrecompileOutput {
    /// Returns new precompile output with the given gas used and output bytes.
    pub fn new(gas_used: u64, bytes: Bytes) -> Self {
        Self { gas_used, bytes }
    }
}

/// Precompile error type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PrecompileError {
    /// Gas limit is lower than the cost of the input.
    #[error("out of gas")]
    OutOfGas,
    /// Input could not be processed.
    #[error("{0}")]
    Other(String),
}

/// Result of a precompile run.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// Precompile function, taking input and gas limit.
pub type PrecompileFn = fn(&Bytes, u64) -> PrecompileResult;

/// Set of precompiled contracts reachable from calls.
#[auto_impl(&, &mut, Box, Arc)]
pub trait PrecompileProvider {
    /// Check if the address is a precompile.
    fn contains(&self, address: &Address) -> bool;

    /// Run the precompile at `address`. Returns `None` if there is none.
    fn run(&self, address: &Address, input: &Bytes, gas_limit: u64) -> Option<PrecompileResult>;

    /// Addresses that are warm from the start of every transaction.
    fn warm_addresses(&self) -> Box<dyn Iterator<Item = Address> + '_>;
}

/// Registry of native precompile functions keyed by address.
///
/// Empty by default.
#[derive(Clone, Debug, Default)]
pub struct PrecompileSet {
    inner: HashMap<Address, PrecompileFn>,
}

impl PrecompileSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `precompile` at `address`, replacing any previous one.
    pub fn insert(&mut self, address: Address, precompile: PrecompileFn) {
        self.inner.insert(address, precompile);
    }

    /// Returns the set with `precompile` registered at `address`.
    pub fn with(mut self, address: Address, precompile: PrecompileFn) -> Self {
        self.insert(address, precompile);
        self
    }

    /// Number of registered precompiles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no precompile is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PrecompileProvider for PrecompileSet {
    fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    fn run(&self, address: &Address, input: &Bytes, gas_limit: u64) -> Option<PrecompileResult> {
        self.inner
            .get(address)
            .map(|precompile| precompile(input, gas_limit))
    }

    fn warm_addresses(&self) -> Box<dyn Iterator<Item = Address> + '_> {
        Box::new(self.inner.keys().copied())
    }
}
