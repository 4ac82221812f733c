//! Fork rules derived from the active hardfork.
use primitives::hardfork::SpecId::{self, *};

/// Named behavioral switches of the active hardfork.
///
/// Derived once from [`crate::CfgEnv`] and consulted by the call and create paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForkRules {
    /// Homestead: `CodeStoreOutOfGas` is a hard failure.
    pub is_homestead: bool,
    /// EIP-161 state clearing and EIP-170 code size limit.
    pub is_spurious_dragon: bool,
    /// EIP-2929 access lists.
    pub is_berlin: bool,
    /// EIP-3541 rejects new code starting with `0xEF`.
    pub is_london: bool,
    /// EIP-3651 warm coinbase.
    pub is_shanghai: bool,
    /// EIP-6780 self destruct and EIP-1153 transient storage.
    pub is_cancun: bool,
    /// Prague.
    pub is_prague: bool,
    /// Chain runs Aura consensus.
    pub is_aura: bool,
    /// EIP-3860 initcode limit is active.
    pub has_eip3860: bool,
}

impl ForkRules {
    /// Fork rules for `spec` on a chain with or without Aura consensus.
    pub fn new(spec: SpecId, is_aura: bool) -> Self {
        Self {
            is_homestead: spec.is_enabled_in(HOMESTEAD),
            is_spurious_dragon: spec.is_enabled_in(SPURIOUS_DRAGON),
            is_berlin: spec.is_enabled_in(BERLIN),
            is_london: spec.is_enabled_in(LONDON),
            is_shanghai: spec.is_enabled_in(SHANGHAI),
            is_cancun: spec.is_enabled_in(CANCUN),
            is_prague: spec.is_enabled_in(PRAGUE),
            is_aura,
            has_eip3860: spec.is_enabled_in(SHANGHAI),
        }
    }

    /// EIP-170 code size limit applies.
    ///
    /// Aura chains turned the limit on only alongside EIP-3860.
    #[inline]
    pub fn has_code_size_limit(&self) -> bool {
        self.is_spurious_dragon && (!self.is_aura || self.has_eip3860)
    }

    /// EIP-3541: new code starting with `0xEF` is rejected.
    #[inline]
    pub fn rejects_ef_prefix(&self) -> bool {
        self.is_london
    }

    /// Failing to pay for code deposit fails the creation instead of storing no code.
    #[inline]
    pub fn code_store_out_of_gas_is_error(&self) -> bool {
        self.is_homestead
    }

    /// EIP-6780 self destruct semantics.
    #[inline]
    pub fn has_selfdestruct_6780(&self) -> bool {
        self.is_cancun
    }
}
