use primitives::{keccak256, Bytes, B256, KECCAK_EMPTY, U256};

/// Account information that contains balance, nonce, code hash and code.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountInfo {
    /// Account balance
    pub balance: U256,
    /// Account nonce
    pub nonce: u64,
    /// Hash of `code`, [`KECCAK_EMPTY`] for accounts without code.
    pub code_hash: B256,
    /// Raw code of the account.
    pub code: Bytes,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            nonce: 0,
            code_hash: KECCAK_EMPTY,
            code: Bytes::new(),
        }
    }
}

impl AccountInfo {
    /// Creates a new [`AccountInfo`] with the given fields.
    ///
    /// The code hash is computed from `code`.
    pub fn new(balance: U256, nonce: u64, code: Bytes) -> Self {
        Self::default()
            .with_balance(balance)
            .with_nonce(nonce)
            .with_code(code)
    }

    /// Creates a new [`AccountInfo`] holding only a balance.
    pub fn from_balance(balance: U256) -> Self {
        Self::default().with_balance(balance)
    }

    /// Returns the account with the given code, hashing it.
    pub fn with_code(mut self, code: Bytes) -> Self {
        self.set_code(code);
        self
    }

    /// Returns the account with the given balance.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Returns the account with the given nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets code and its hash.
    pub fn set_code(&mut self, code: Bytes) {
        self.code_hash = if code.is_empty() {
            KECCAK_EMPTY
        } else {
            keccak256(&code)
        };
        self.code = code;
    }

    /// Returns true if the account has no code.
    ///
    /// Zero hash is treated as empty code, some backends report it for missing accounts.
    #[inline]
    pub fn is_empty_code_hash(&self) -> bool {
        self.code_hash == KECCAK_EMPTY || self.code_hash.is_zero()
    }

    /// EIP-161 emptiness: no code, zero nonce and zero balance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_empty_code_hash() && self.balance.is_zero() && self.nonce == 0
    }

    /// Returns true if the account has neither code nor a nonzero nonce.
    ///
    /// Such an address is free to receive a newly created contract.
    #[inline]
    pub fn has_no_code_and_nonce(&self) -> bool {
        self.is_empty_code_hash() && self.nonce == 0
    }
}
