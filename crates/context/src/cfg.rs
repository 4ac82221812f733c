//! This module contains [`CfgEnv`], the chain level configuration of the host.
use crate::ForkRules;
use primitives::{eip170, hardfork::SpecId};

/// Host configuration
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct CfgEnv {
    /// Chain ID of the EVM. Returned to the interpreter as part of the transaction context.
    ///
    /// Chain ID is introduced EIP-155.
    pub chain_id: u64,
    /// Specification for EVM represent the hardfork
    pub spec: SpecId,
    /// Chain runs Aura consensus.
    ///
    /// Such chains enabled the EIP-170 code size limit only together with EIP-3860.
    pub is_aura: bool,
    /// Contract code size limit override.
    ///
    /// If None, the limit will be [`eip170::MAX_CODE_SIZE`].
    /// If Some, this specific limit will be used regardless of SpecId.
    ///
    /// Useful to increase this because of tests.
    pub limit_contract_code_size: Option<usize>,
    /// Best effort value transfer.
    ///
    /// Calls proceed without checking the sender balance, used to simulate calls
    /// from unfunded accounts.
    pub bailout: bool,
    /// Reverts the state changes of every call and create, even successful ones.
    pub restore_state: bool,
    /// Fails calls deeper than [`primitives::CALL_STACK_LIMIT`].
    ///
    /// Can be disabled for engines that bound the depth themselves.
    pub enforce_call_depth: bool,
}

impl CfgEnv {
    /// Creates new `CfgEnv` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new `CfgEnv` with default values and specified spec.
    pub fn new_with_spec(spec: SpecId) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }

    /// Sets the chain id.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Marks the chain as running Aura consensus.
    pub fn with_aura(mut self, is_aura: bool) -> Self {
        self.is_aura = is_aura;
        self
    }

    /// Overrides the contract code size limit.
    pub fn with_limit_contract_code_size(mut self, limit: Option<usize>) -> Self {
        self.limit_contract_code_size = limit;
        self
    }

    /// Enables best effort value transfer.
    pub fn with_bailout(mut self, bailout: bool) -> Self {
        self.bailout = bailout;
        self
    }

    /// Enables forced rollback of every call.
    pub fn with_restore_state(mut self, restore_state: bool) -> Self {
        self.restore_state = restore_state;
        self
    }

    /// Enables or disables the call depth check.
    pub fn with_enforce_call_depth(mut self, enforce: bool) -> Self {
        self.enforce_call_depth = enforce;
        self
    }

    /// Maximum size of deployed code.
    #[inline]
    pub fn max_code_size(&self) -> usize {
        self.limit_contract_code_size
            .unwrap_or(eip170::MAX_CODE_SIZE)
    }

    /// Fork rules active under this configuration.
    #[inline]
    pub fn fork_rules(&self) -> ForkRules {
        ForkRules::new(self.spec, self.is_aura)
    }
}

impl Default for CfgEnv {
    fn default() -> Self {
        Self {
            chain_id: 1,
            spec: SpecId::default(),
            is_aura: false,
            limit_contract_code_size: None,
            bailout: false,
            restore_state: false,
            enforce_call_depth: true,
        }
    }
}
