//! SSTORE transition classification.
use primitives::StorageValue;

/// Kind of transition a storage write makes, relative to the value the slot had at
/// the start of the transaction.
///
/// Determines SSTORE gas cost and refund in the interpreter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageStatus {
    /// No distinguished transition. Also the result of a no-op write.
    #[default]
    Assigned,
    /// 0 -> 0 -> Z
    Added,
    /// X -> X -> 0
    Deleted,
    /// X -> X -> Z
    Modified,
    /// X -> 0 -> Z
    DeletedAdded,
    /// X -> Y -> 0
    ModifiedDeleted,
    /// X -> 0 -> X
    DeletedRestored,
    /// 0 -> Y -> 0
    AddedDeleted,
    /// X -> Y -> X
    ModifiedRestored,
}

impl StorageStatus {
    /// Classifies writing `new` into a slot holding `current` whose value at the
    /// start of the transaction was `original`.
    pub fn classify(
        original: StorageValue,
        current: StorageValue,
        new: StorageValue,
    ) -> StorageStatus {
        let dirty = original != current;
        let restored = original == new;

        match (dirty, restored) {
            (false, false) => {
                if current.is_zero() {
                    StorageStatus::Added
                } else if new.is_zero() {
                    StorageStatus::Deleted
                } else {
                    StorageStatus::Modified
                }
            }
            (true, false) => {
                if current.is_zero() && !new.is_zero() {
                    StorageStatus::DeletedAdded
                } else if !current.is_zero() && new.is_zero() {
                    StorageStatus::ModifiedDeleted
                } else {
                    StorageStatus::Assigned
                }
            }
            (true, true) => {
                if current.is_zero() {
                    StorageStatus::DeletedRestored
                } else if new.is_zero() {
                    StorageStatus::AddedDeleted
                } else {
                    StorageStatus::ModifiedRestored
                }
            }
            (false, true) => StorageStatus::Assigned,
        }
    }
}
