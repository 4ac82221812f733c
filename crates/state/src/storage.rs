use primitives::StorageValue;

/// A storage slot as seen during one transaction.
///
/// `original_value` is the committed value at the start of the transaction and
/// is what SSTORE classification compares against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageSlot {
    /// Value at the start of the transaction.
    pub original_value: StorageValue,
    /// Current value.
    pub present_value: StorageValue,
}

impl StorageSlot {
    /// Creates a new _unchanged_ `StorageSlot` for the given value.
    pub fn new(original: StorageValue) -> Self {
        Self {
            original_value: original,
            present_value: original,
        }
    }

    /// Creates a new _changed_ `StorageSlot`.
    pub fn new_changed(original_value: StorageValue, present_value: StorageValue) -> Self {
        Self {
            original_value,
            present_value,
        }
    }

    /// Returns true if the present value differs from the original value.
    pub fn is_changed(&self) -> bool {
        self.original_value != self.present_value
    }

    /// Returns the original value of the storage slot.
    pub fn original_value(&self) -> StorageValue {
        self.original_value
    }

    /// Returns the current value of the storage slot.
    pub fn present_value(&self) -> StorageValue {
        self.present_value
    }

    /// Promotes the present value to the original one. Called at transaction end.
    pub fn commit(&mut self) {
        self.original_value = self.present_value;
    }
}
