//! Checks applied to code returned by a successful creation before it is stored.
use crate::{ExecutionError, MessageKind};
use context::ForkRules;
use primitives::CODEDEPOSIT;
use tracing::debug;

/// Accepted deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deployment {
    /// Gas left after paying for the code deposit.
    pub gas_left: i64,
    /// Code has to be stored. False only for the pre-Homestead case where the
    /// deposit can not be paid and the creation succeeds without code.
    pub store_code: bool,
}

/// Validates `code` returned by the init code of a `kind` creation.
///
/// In order: code size limit, `0xEF` prefix (not for `EofCreate`), code deposit
/// of [`CODEDEPOSIT`] gas per byte.
pub fn validate_deployment(
    rules: &ForkRules,
    max_code_size: usize,
    kind: MessageKind,
    code: &[u8],
    gas_left: i64,
) -> Result<Deployment, ExecutionError> {
    if rules.has_code_size_limit() && code.len() > max_code_size {
        debug!(size = code.len(), max_code_size, "deployed code too large");
        return Err(ExecutionError::MaxCodeSizeExceeded);
    }

    if kind != MessageKind::EofCreate && rules.rejects_ef_prefix() && code.first() == Some(&0xEF)
    {
        debug!("deployed code starts with 0xEF");
        return Err(ExecutionError::InvalidCodePrefix);
    }

    let cost = (code.len() as u64).saturating_mul(CODEDEPOSIT);
    let available = u64::try_from(gas_left).unwrap_or_default();
    if available >= cost {
        return Ok(Deployment {
            gas_left: (available - cost) as i64,
            store_code: true,
        });
    }

    if rules.code_store_out_of_gas_is_error() || kind == MessageKind::EofCreate {
        debug!(cost, gas_left, "code deposit out of gas");
        return Err(ExecutionError::CodeStoreOutOfGas);
    }
    Ok(Deployment {
        gas_left,
        store_code: false,
    })
}
