//! `SELFDESTRUCT` regimes.
use context::{ForkRules, StateBackend};
use primitives::Address;
use tracing::trace;

/// Self destruct semantics selected by the active fork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelfDestructRegime {
    /// Account is always removed at the end of the transaction.
    Legacy,
    /// EIP-6780: only accounts created in the same transaction are removed.
    Eip6780,
}

impl SelfDestructRegime {
    /// Regime active under `rules`.
    pub fn from_rules(rules: &ForkRules) -> Self {
        if rules.has_selfdestruct_6780() {
            SelfDestructRegime::Eip6780
        } else {
            SelfDestructRegime::Legacy
        }
    }
}

/// Moves the balance of `address` to `beneficiary` and marks the account for
/// removal as the regime allows.
///
/// Returns whether the account will be removed.
pub fn selfdestruct<B: StateBackend + ?Sized>(
    backend: &mut B,
    regime: SelfDestructRegime,
    address: Address,
    beneficiary: Address,
) -> Result<bool, B::Error> {
    let removed = match regime {
        SelfDestructRegime::Legacy => backend.selfdestruct(address, beneficiary)?,
        SelfDestructRegime::Eip6780 => backend.selfdestruct_6780(address, beneficiary)?,
    };
    trace!(%address, %beneficiary, ?regime, removed, "selfdestruct");
    Ok(removed)
}
