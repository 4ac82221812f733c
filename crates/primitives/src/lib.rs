//! # evmhost-primitives
//!
//! Primitive types, hardfork identifiers and protocol constants shared by the
//! evmhost crates.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod constants;
pub mod eip170;
pub mod eof;
pub mod hardfork;

pub use alloy_primitives::{
    self, address, b256, bytes, hex, keccak256,
    map::{self, hash_map, hash_set, HashMap, HashSet},
    Address, Bytes, Log, LogData, B256, U256,
};
pub use constants::*;

/// Storage key of a slot.
pub type StorageKey = U256;

/// Value stored in a storage slot.
pub type StorageValue = U256;

/// The Keccak-256 hash of the empty string `""`.
pub const KECCAK_EMPTY: B256 =
    b256!("0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");
