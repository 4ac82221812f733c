//! Account and storage state.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account;
mod account_info;
mod storage;
mod types;

pub use account::{Account, AccountStatus};
pub use account_info::AccountInfo;
pub use primitives;
pub use storage::StorageSlot;
pub use types::{EvmState, EvmStorage, TransientStorage};
