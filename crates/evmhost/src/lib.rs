//! # evmhost
//!
//! Call/create host layer between a bytecode interpreter and a journaled state
//! backend.
//!
//! The interpreter drives execution through the [`Host`] trait. Nested `CALL`s and
//! `CREATE`s come back to [`CallHost`], which checks their preconditions, snapshots
//! the state, runs them through the [`ExecutionEngine`] and commits or reverts.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod access_list;
pub mod deployment;
pub mod dispatcher;
pub mod host;
pub mod interface;
pub mod message;
pub mod metrics;
pub mod precompile;
pub mod result;
pub mod selfdestruct;
pub mod snapshot;
pub mod storage_status;

pub use access_list::{AccessListTracker, AccessStatus};
pub use deployment::{validate_deployment, Deployment};
pub use dispatcher::create_address;
pub use host::{CallHost, HostError};
pub use interface::{ExecutionEngine, Host};
pub use message::{CallContext, MessageKind};
pub use metrics::{CallMetrics, CallObserver, NoopObserver};
pub use precompile::{
    PrecompileError, PrecompileFn, PrecompileOutput, PrecompileProvider, PrecompileResult,
    PrecompileSet,
};
pub use result::{ExecutionError, ExecutionResult, HaltReason};
pub use selfdestruct::SelfDestructRegime;
pub use snapshot::Snapshot;
pub use storage_status::StorageStatus;

// reexport dependencies
pub use context;
pub use database;
pub use primitives;
pub use state;
