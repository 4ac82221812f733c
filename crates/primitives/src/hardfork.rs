//! Hardfork identifiers.
#![allow(non_camel_case_types)]

use core::str::FromStr;
use num_enum::TryFromPrimitive;
pub use SpecId::*;

/// Specification IDs, ordered by activation.
///
/// A behaviour gated on fork `X` is active when `spec.is_enabled_in(X)`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    /// Frontier, block 0.
    FRONTIER = 0,
    /// Homestead, block 1150000. Code-deposit out-of-gas becomes a hard failure (EIP-2).
    HOMESTEAD,
    /// Tangerine Whistle, block 2463000.
    TANGERINE,
    /// Spurious Dragon, block 2675000. State clearing (EIP-161) and code size limit (EIP-170).
    SPURIOUS_DRAGON,
    /// Byzantium, block 4370000.
    BYZANTIUM,
    /// Petersburg, block 7280000.
    PETERSBURG,
    /// Istanbul, block 9069000.
    ISTANBUL,
    /// Berlin, block 12244000. Access lists (EIP-2929, EIP-2930).
    BERLIN,
    /// London, block 12965000. Rejects new code starting with `0xEF` (EIP-3541).
    LONDON,
    /// Paris/Merge, block 15537394.
    MERGE,
    /// Shanghai, timestamp 1681338455. Warm coinbase (EIP-3651) and initcode limit (EIP-3860).
    SHANGHAI,
    /// Cancun, timestamp 1710338135. Transient storage (EIP-1153) and SELFDESTRUCT
    /// only in the creating transaction (EIP-6780).
    CANCUN,
    /// Prague, timestamp 1746612311.
    #[default]
    PRAGUE,
    /// Osaka, EOF.
    OSAKA,
}

impl SpecId {
    /// Returns the [`SpecId`] for the given [`u8`].
    #[inline]
    pub fn try_from_u8(spec_id: u8) -> Option<Self> {
        Self::try_from(spec_id).ok()
    }

    /// Returns `true` if the given specification ID is enabled in this spec.
    #[inline]
    pub const fn is_enabled_in(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Human readable name of the fork.
    pub const fn name(self) -> &'static str {
        match self {
            FRONTIER => "Frontier",
            HOMESTEAD => "Homestead",
            TANGERINE => "Tangerine",
            SPURIOUS_DRAGON => "Spurious",
            BYZANTIUM => "Byzantium",
            PETERSBURG => "Petersburg",
            ISTANBUL => "Istanbul",
            BERLIN => "Berlin",
            LONDON => "London",
            MERGE => "Merge",
            SHANGHAI => "Shanghai",
            CANCUN => "Cancun",
            PRAGUE => "Prague",
            OSAKA => "Osaka",
        }
    }
}

/// Error type for unknown hardfork names. Returned by [`SpecId::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownHardfork;

impl core::fmt::Display for UnknownHardfork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown hardfork")
    }
}

impl core::error::Error for UnknownHardfork {}

impl FromStr for SpecId {
    type Err = UnknownHardfork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..=OSAKA as u8)
            .filter_map(Self::try_from_u8)
            .find(|spec| spec.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownHardfork)
    }
}

impl core::fmt::Display for SpecId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
