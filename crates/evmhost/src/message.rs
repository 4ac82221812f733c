//! Call and create messages issued by the interpreter.
use core::fmt;
use primitives::{Address, Bytes, B256, U256};

/// Kind of a call or create message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// `CALL`
    #[default]
    Call,
    /// `CALLCODE`
    CallCode,
    /// `DELEGATECALL`
    DelegateCall,
    /// `STATICCALL`
    StaticCall,
    /// `CREATE`
    Create,
    /// `CREATE2`
    Create2,
    /// `EOFCREATE`
    EofCreate,
}

impl MessageKind {
    /// All message kinds.
    pub const ALL: [MessageKind; 7] = [
        MessageKind::Call,
        MessageKind::CallCode,
        MessageKind::DelegateCall,
        MessageKind::StaticCall,
        MessageKind::Create,
        MessageKind::Create2,
        MessageKind::EofCreate,
    ];

    /// Returns true for the contract creation kinds.
    #[inline]
    pub const fn is_create(self) -> bool {
        matches!(
            self,
            MessageKind::Create | MessageKind::Create2 | MessageKind::EofCreate
        )
    }

    /// Returns true for the message call kinds.
    #[inline]
    pub const fn is_call(self) -> bool {
        !self.is_create()
    }

    /// Opcode name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageKind::Call => "CALL",
            MessageKind::CallCode => "CALLCODE",
            MessageKind::DelegateCall => "DELEGATECALL",
            MessageKind::StaticCall => "STATICCALL",
            MessageKind::Create => "CREATE",
            MessageKind::Create2 => "CREATE2",
            MessageKind::EofCreate => "EOFCREATE",
        }
    }

    /// Position of the kind in [`MessageKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call or create message.
///
/// For `Create` and `Create2` the init code is carried in `input`. For
/// `EofCreate` the init container is carried in `code` and `input` is the
/// calldata handed to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallContext {
    /// Message kind.
    pub kind: MessageKind,
    /// Account whose state is used. Derived by the host for creation kinds.
    pub recipient: Address,
    /// Caller of the message.
    pub sender: Address,
    /// Value transferred, or apparent value for `DELEGATECALL`.
    pub value: U256,
    /// Call data, or init code for `Create` and `Create2`.
    pub input: Bytes,
    /// Gas supplied to the message.
    pub gas_limit: i64,
    /// Depth of the message, zero for the outermost one.
    pub depth: u64,
    /// State modifications are forbidden.
    pub is_static: bool,
    /// Salt of `Create2` and `EofCreate`.
    pub salt: B256,
    /// Account whose code is executed.
    pub code_address: Address,
    /// Init container of `EofCreate`.
    pub code: Option<Bytes>,
}

impl CallContext {
    /// Message call of `kind` from `sender` to `recipient`, executing the
    /// recipient's code.
    pub fn call(
        kind: MessageKind,
        sender: Address,
        recipient: Address,
        value: U256,
        input: Bytes,
        gas_limit: i64,
    ) -> Self {
        Self {
            kind,
            recipient,
            sender,
            value,
            input,
            gas_limit,
            is_static: kind == MessageKind::StaticCall,
            code_address: recipient,
            ..Default::default()
        }
    }

    /// `CREATE` of `init_code`.
    pub fn create(sender: Address, value: U256, init_code: Bytes, gas_limit: i64) -> Self {
        Self {
            kind: MessageKind::Create,
            sender,
            value,
            input: init_code,
            gas_limit,
            ..Default::default()
        }
    }

    /// `CREATE2` of `init_code` with `salt`.
    pub fn create2(
        sender: Address,
        value: U256,
        init_code: Bytes,
        salt: B256,
        gas_limit: i64,
    ) -> Self {
        Self {
            kind: MessageKind::Create2,
            salt,
            ..Self::create(sender, value, init_code, gas_limit)
        }
    }

    /// `EOFCREATE` of `container`, passing `input` as calldata.
    pub fn eof_create(
        sender: Address,
        value: U256,
        container: Bytes,
        input: Bytes,
        salt: B256,
        gas_limit: i64,
    ) -> Self {
        Self {
            kind: MessageKind::EofCreate,
            sender,
            value,
            input,
            gas_limit,
            salt,
            code: Some(container),
            ..Default::default()
        }
    }

    /// Executes the code of `code_address` instead of the recipient's.
    pub fn with_code_address(mut self, code_address: Address) -> Self {
        self.code_address = code_address;
        self
    }

    /// Sets the depth of the message.
    pub fn with_depth(mut self, depth: u64) -> Self {
        self.depth = depth;
        self
    }

    /// Forbids state modifications.
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Gas supplied, negative budgets read as zero.
    #[inline]
    pub fn gas_supplied(&self) -> i64 {
        self.gas_limit.max(0)
    }
}
