//! Outcome of a call or create message and the error taxonomy.
use primitives::{Address, Bytes};

/// Execution fault reported by the interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HaltReason {
    /// Gas exhausted.
    #[error("out of gas")]
    OutOfGas,
    /// Undefined or unactivated opcode.
    #[error("invalid opcode")]
    InvalidOpcode,
    /// Jump to a non `JUMPDEST` location.
    #[error("invalid jump destination")]
    InvalidJump,
    /// Stack underflow.
    #[error("stack underflow")]
    StackUnderflow,
    /// Stack limit reached.
    #[error("stack limit reached")]
    StackOverflow,
    /// Memory or return data offset out of bounds.
    #[error("return data out of bounds")]
    OutOfOffset,
    /// State modification attempted in a static context.
    #[error("write protection")]
    StateChangeDuringStaticCall,
    /// Precompiled contract failed.
    #[error("precompile failed")]
    PrecompileError,
    /// Value transfer would overflow the recipient balance.
    #[error("balance overflow")]
    OverflowPayment,
}

/// Reason a call or create message failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionError {
    /// Sender can not afford the transferred value.
    #[error("insufficient balance for transfer")]
    InsufficientBalance,
    /// Sender nonce is at its maximum.
    #[error("nonce uint64 overflow")]
    NonceOverflow,
    /// Derived contract address already holds code or a nonce.
    #[error("contract address collision")]
    ContractAddressCollision,
    /// Deployed code exceeds the code size limit.
    #[error("max code size exceeded")]
    MaxCodeSizeExceeded,
    /// Deployed code starts with `0xEF`.
    #[error("invalid code: must not begin with 0xef")]
    InvalidCodePrefix,
    /// Not enough gas left to pay for the deployed code.
    #[error("contract creation code storage out of gas")]
    CodeStoreOutOfGas,
    /// Interpreter executed `REVERT`.
    #[error("execution reverted")]
    ExecutionReverted,
    /// Message depth exceeds the call stack limit.
    #[error("max call depth exceeded")]
    CallTooDeep,
    /// `EOFCREATE` init container is not an EOF container.
    #[error("invalid EOF initcode")]
    InvalidEofInitCode,
    /// State backend failed, the transaction can not continue.
    #[error("fatal external error")]
    FatalExternalError,
    /// Interpreter fault.
    #[error(transparent)]
    Halt(#[from] HaltReason),
}

impl ExecutionError {
    /// Returns true for a cooperative `REVERT`.
    #[inline]
    pub fn is_revert(&self) -> bool {
        matches!(self, ExecutionError::ExecutionReverted)
    }
}

/// Outcome of a call or create message.
///
/// `gas_left` never exceeds the gas supplied and is never negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionResult {
    /// Returned data. Only kept on success and on `REVERT`.
    pub output: Bytes,
    /// Gas not consumed.
    pub gas_left: i64,
    /// Refund counter accumulated by the message.
    pub gas_refund: i64,
    /// Address of the created contract.
    pub created_address: Option<Address>,
    /// Failure reason, `None` on success.
    pub error: Option<ExecutionError>,
}

impl ExecutionResult {
    /// Successful result.
    pub fn success(output: Bytes, gas_left: i64) -> Self {
        Self {
            output,
            gas_left,
            ..Default::default()
        }
    }

    /// Cooperative revert, output and remaining gas are kept.
    pub fn revert(output: Bytes, gas_left: i64) -> Self {
        Self {
            output,
            gas_left,
            error: Some(ExecutionError::ExecutionReverted),
            ..Default::default()
        }
    }

    /// Failed result without output.
    pub fn failure(error: impl Into<ExecutionError>, gas_left: i64) -> Self {
        Self {
            gas_left,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Sets the refund counter.
    pub fn with_refund(mut self, gas_refund: i64) -> Self {
        self.gas_refund = gas_refund;
        self
    }

    /// Returns true if the message succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns true if the message ended in `REVERT`.
    #[inline]
    pub fn is_revert(&self) -> bool {
        self.error.as_ref().is_some_and(ExecutionError::is_revert)
    }

    /// Applies the failure policy: faults discard output, refund and all
    /// remaining gas, a `REVERT` keeps output and gas.
    pub(crate) fn settle_failure(&mut self) {
        if self.is_success() || self.is_revert() {
            return;
        }
        self.output = Bytes::new();
        self.gas_left = 0;
        self.gas_refund = 0;
    }

    /// Clamps `gas_left` into `0..=gas_supplied`.
    pub(crate) fn clamp_gas(&mut self, gas_supplied: i64) {
        self.gas_left = self.gas_left.clamp(0, gas_supplied.max(0));
    }
}
