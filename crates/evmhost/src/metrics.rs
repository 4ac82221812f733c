//! Per-host call instrumentation.
//!
//! Observers are owned by the host, there is no global counter state.
use crate::{CallContext, ExecutionError, ExecutionResult, MessageKind};
use auto_impl::auto_impl;
use primitives::Address;

/// Hooks invoked by the dispatcher.
///
/// All methods default to doing nothing.
#[auto_impl(&mut, Box)]
pub trait CallObserver {
    /// A message entered the dispatcher.
    fn on_call_start(&mut self, context: &CallContext) {
        let _ = context;
    }

    /// A message left the dispatcher.
    fn on_call_end(&mut self, context: &CallContext, result: &ExecutionResult) {
        let _ = (context, result);
    }

    /// A message failed before any state was snapshotted.
    fn on_precheck_failure(&mut self, context: &CallContext, error: &ExecutionError) {
        let _ = (context, error);
    }

    /// State changes of a message were reverted.
    fn on_revert(&mut self, context: &CallContext, error: Option<&ExecutionError>) {
        let _ = (context, error);
    }

    /// A precompile ran.
    fn on_precompile(&mut self, address: Address) {
        let _ = address;
    }

    /// Code was stored at `address`.
    fn on_deploy(&mut self, address: Address, code_size: usize) {
        let _ = (address, code_size);
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {}

/// Counters of dispatcher activity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallMetrics {
    /// Messages dispatched, indexed by [`MessageKind::index`].
    pub calls: [u64; MessageKind::ALL.len()],
    /// Messages whose state changes were reverted.
    pub reverts: u64,
    /// Messages rejected by a precondition.
    pub precheck_failures: u64,
    /// Precompile runs.
    pub precompile_runs: u64,
    /// Contracts whose code was stored.
    pub deployments: u64,
    /// Bytes of code stored.
    pub deployed_bytes: u64,
}

impl CallMetrics {
    /// Messages dispatched of `kind`.
    pub fn calls_of(&self, kind: MessageKind) -> u64 {
        self.calls[kind.index()]
    }

    /// Messages dispatched of any kind.
    pub fn total_calls(&self) -> u64 {
        self.calls.iter().sum()
    }
}

impl CallObserver for CallMetrics {
    fn on_call_start(&mut self, context: &CallContext) {
        self.calls[context.kind.index()] += 1;
    }

    fn on_precheck_failure(&mut self, _context: &CallContext, _error: &ExecutionError) {
        self.precheck_failures += 1;
    }

    fn on_revert(&mut self, _context: &CallContext, _error: Option<&ExecutionError>) {
        self.reverts += 1;
    }

    fn on_precompile(&mut self, _address: Address) {
        self.precompile_runs += 1;
    }

    fn on_deploy(&mut self, _address: Address, code_size: usize) {
        self.deployments += 1;
        self.deployed_bytes += code_size as u64;
    }
}
