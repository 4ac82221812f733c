use crate::{AccountInfo, EvmStorage};
use bitflags::bitflags;

bitflags! {
    /// Account status flags, tracked per transaction.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AccountStatus: u8 {
        /// Account was created in the current transaction.
        const Created = 0b0000_0001;
        /// Account is marked for removal at the end of the transaction.
        const SelfDestructed = 0b0000_0010;
        /// Account was touched and has to be considered for state clearing.
        const Touched = 0b0000_0100;
        /// Account was not present in the database when it was loaded.
        const LoadedAsNotExisting = 0b0000_1000;
    }
}

/// An account loaded into the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    /// Balance, nonce, and code
    pub info: AccountInfo,
    /// Storage cache
    pub storage: EvmStorage,
    /// Account status flags
    pub status: AccountStatus,
}

impl Account {
    /// Creates an account that is not present in the backing database.
    pub fn new_not_existing() -> Self {
        Self {
            info: AccountInfo::default(),
            storage: EvmStorage::default(),
            status: AccountStatus::LoadedAsNotExisting,
        }
    }

    /// Returns true if the account exists in state.
    ///
    /// An account loaded as not existing comes into existence once it is touched
    /// or created.
    #[inline]
    pub fn exists(&self) -> bool {
        !self.status.contains(AccountStatus::LoadedAsNotExisting)
            || self
                .status
                .intersects(AccountStatus::Touched | AccountStatus::Created)
    }

    /// Marks the account as created in this transaction.
    #[inline]
    pub fn mark_created(&mut self) {
        self.status |= AccountStatus::Created;
    }

    /// Returns true if the account was created in this transaction.
    #[inline]
    pub fn is_created(&self) -> bool {
        self.status.contains(AccountStatus::Created)
    }

    /// Marks the account as self destructed.
    #[inline]
    pub fn mark_selfdestruct(&mut self) {
        self.status |= AccountStatus::SelfDestructed;
    }

    /// Unmarks the account as self destructed.
    #[inline]
    pub fn unmark_selfdestruct(&mut self) {
        self.status -= AccountStatus::SelfDestructed;
    }

    /// Returns true if the account is marked for removal.
    #[inline]
    pub fn is_selfdestructed(&self) -> bool {
        self.status.contains(AccountStatus::SelfDestructed)
    }

    /// Marks the account as touched.
    #[inline]
    pub fn mark_touch(&mut self) {
        self.status |= AccountStatus::Touched;
    }

    /// Unmarks the touch flag.
    #[inline]
    pub fn unmark_touch(&mut self) {
        self.status -= AccountStatus::Touched;
    }

    /// Returns true if the account was touched.
    #[inline]
    pub fn is_touched(&self) -> bool {
        self.status.contains(AccountStatus::Touched)
    }

    /// EIP-161 emptiness of the account info.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

impl From<AccountInfo> for Account {
    fn from(info: AccountInfo) -> Self {
        Self {
            info,
            storage: EvmStorage::default(),
            status: AccountStatus::empty(),
        }
    }
}
