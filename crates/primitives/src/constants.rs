//! Protocol constants used by the host.
use alloy_primitives::Address;

/// EVM call stack limit.
pub const CALL_STACK_LIMIT: u64 = 1024;

/// Number of block hashes that EVM can access in the past (pre-Prague).
pub const BLOCK_HASH_HISTORY: u64 = 256;

/// Gas charged per byte of deployed contract code.
///
/// `G_codedeposit` in the yellow paper.
pub const CODEDEPOSIT: u64 = 200;

/// The address of precompile 3, which is handled specially in a few places.
pub const PRECOMPILE3: Address =
    Address::new([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
