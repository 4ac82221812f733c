//! State backend contract, journaled in-memory backend and execution
//! environment used by the evmhost call/create host.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod backend;
pub mod block;
pub mod cfg;
pub mod fork_rules;
pub mod journal;
pub mod tx;

pub use backend::{JournalCheckpoint, StateBackend, TransferError};
pub use block::BlockEnv;
pub use cfg::CfgEnv;
pub use fork_rules::ForkRules;
pub use journal::{Journal, JournalEntry, JournalInner};
pub use tx::{AccessList, AccessListItem, TxContext, TxEnv};

pub use database;
pub use primitives;
pub use state;
