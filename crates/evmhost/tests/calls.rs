mod common;

use common::*;
use evmhost::{
    context::{CfgEnv, StateBackend},
    primitives::{address, bytes, hardfork::SpecId, Bytes, U256},
    state::AccountInfo,
    CallContext, ExecutionError, ExecutionResult, HaltReason, Host, MessageKind, PrecompileError,
    PrecompileOutput, PrecompileResult, PrecompileSet,
};
use rstest::rstest;

const STORE_CODE: Bytes = bytes!("5500");
const FAULT_CODE: Bytes = bytes!("fe");
const REVERT_CODE: Bytes = bytes!("fd");

fn contract_db(code: Bytes) -> evmhost::database::InMemoryDB {
    funded_db().with_account(CONTRACT, AccountInfo::default().with_code(code))
}

fn storing_engine() -> ScriptedEngine {
    ScriptedEngine::new()
        .with(STORE_CODE, |host, ctx| {
            host.set_storage(ctx.recipient, U256::from(1), U256::from(42));
            ExecutionResult::success(bytes!("aa"), ctx.gas_limit - 100)
        })
        .with(FAULT_CODE, |host, ctx| {
            host.set_storage(ctx.recipient, U256::from(1), U256::from(42));
            host.access_storage(ctx.recipient, U256::from(9));
            ExecutionResult::failure(HaltReason::InvalidOpcode, ctx.gas_limit - 100)
        })
        .with(REVERT_CODE, |host, ctx| {
            host.set_storage(ctx.recipient, U256::from(1), U256::from(42));
            ExecutionResult::revert(bytes!("08c379a0"), ctx.gas_limit - 100)
        })
}

#[test]
fn zero_value_call_to_missing_account_creates_nothing() {
    let mut host = host_with(SpecId::CANCUN, funded_db(), ScriptedEngine::new());
    let result = host.transact(call(ALICE, NOBODY, 0)).unwrap();

    assert!(result.is_success());
    assert!(result.output.is_empty());
    assert_eq!(result.gas_left, GAS);
    assert!(!host.backend_mut().exists(NOBODY).unwrap());
    host.end_transaction();
    assert!(!host.backend_mut().exists(NOBODY).unwrap());
}

#[test]
fn zero_value_call_to_missing_account_creates_it_before_spurious_dragon() {
    let mut host = host_with(SpecId::TANGERINE, funded_db(), ScriptedEngine::new());
    let result = host.transact(call(ALICE, NOBODY, 0)).unwrap();

    assert!(result.is_success());
    assert_eq!(result.gas_left, GAS);
    host.end_transaction();
    assert!(host.backend_mut().exists(NOBODY).unwrap());
}

#[test]
fn value_call_creates_recipient_and_transfers() {
    let mut host = host_with(SpecId::CANCUN, funded_db(), ScriptedEngine::new());
    let result = host.transact(call(ALICE, NOBODY, 10)).unwrap();

    assert!(result.is_success());
    assert_eq!(host.backend_mut().balance(NOBODY).unwrap(), U256::from(10));
    assert_eq!(
        host.backend_mut().balance(ALICE).unwrap(),
        U256::from(1_000_000 - 10)
    );
}

#[rstest]
#[case(MessageKind::Call)]
#[case(MessageKind::CallCode)]
fn insufficient_balance_keeps_gas(#[case] kind: MessageKind) {
    let mut host = host_with(SpecId::CANCUN, contract_db(STORE_CODE), storing_engine());
    let context = CallContext::call(kind, BOB, CONTRACT, U256::from(1), Bytes::new(), GAS);
    let result = host.transact(context).unwrap();

    assert_eq!(result.error, Some(ExecutionError::InsufficientBalance));
    assert_eq!(result.gas_left, GAS);
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::ZERO
    );
}

#[test]
fn bailout_runs_without_transferring() {
    let cfg = CfgEnv::new_with_spec(SpecId::CANCUN).with_bailout(true);
    let mut host = host_with_cfg(cfg, contract_db(STORE_CODE), storing_engine());
    let result = host.transact(call(BOB, CONTRACT, 5)).unwrap();

    assert!(result.is_success());
    assert_eq!(result.output, bytes!("aa"));
    assert_eq!(host.backend_mut().balance(CONTRACT).unwrap(), U256::ZERO);
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::from(42)
    );
}

#[test]
fn bailout_value_call_touches_missing_recipient() {
    let cfg = CfgEnv::new_with_spec(SpecId::CANCUN).with_bailout(true);
    let mut host = host_with_cfg(cfg, funded_db(), ScriptedEngine::new());
    let result = host.transact(call(BOB, NOBODY, 5)).unwrap();

    assert!(result.is_success());
    assert_eq!(result.gas_left, GAS);
    let backend = host.backend_mut();
    assert!(backend.exists(NOBODY).unwrap());
    assert_eq!(backend.balance(NOBODY).unwrap(), U256::ZERO);
}

#[test]
fn successful_call_commits() {
    let mut host = host_with(SpecId::CANCUN, contract_db(STORE_CODE), storing_engine());
    let result = host.transact(call(ALICE, CONTRACT, 7)).unwrap();

    assert!(result.is_success());
    assert_eq!(result.output, bytes!("aa"));
    assert_eq!(result.gas_left, GAS - 100);
    assert_eq!(host.backend_mut().balance(CONTRACT).unwrap(), U256::from(7));
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::from(42)
    );
}

#[test]
fn fault_reverts_and_consumes_all_gas() {
    let mut host = host_with(SpecId::CANCUN, contract_db(FAULT_CODE), storing_engine());
    let result = host.transact(call(ALICE, CONTRACT, 7)).unwrap();

    assert_eq!(result.error, Some(HaltReason::InvalidOpcode.into()));
    assert_eq!(result.gas_left, 0);
    assert!(result.output.is_empty());
    assert_eq!(host.backend_mut().balance(CONTRACT).unwrap(), U256::ZERO);
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::ZERO
    );
    // access list is not part of the snapshot
    assert!(host.access_list().is_warm_slot(CONTRACT, U256::from(9)));
}

#[test]
fn revert_keeps_output_and_gas() {
    let mut host = host_with(SpecId::CANCUN, contract_db(REVERT_CODE), storing_engine());
    let result = host.transact(call(ALICE, CONTRACT, 0)).unwrap();

    assert!(result.is_revert());
    assert_eq!(result.output, bytes!("08c379a0"));
    assert_eq!(result.gas_left, GAS - 100);
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::ZERO
    );
}

#[test]
fn restore_state_reverts_successful_calls() {
    let cfg = CfgEnv::new_with_spec(SpecId::CANCUN).with_restore_state(true);
    let mut host = host_with_cfg(cfg, contract_db(STORE_CODE), storing_engine());
    let result = host.transact(call(ALICE, CONTRACT, 7)).unwrap();

    assert!(result.is_success());
    assert_eq!(result.output, bytes!("aa"));
    assert_eq!(result.gas_left, GAS - 100);
    assert_eq!(host.backend_mut().balance(CONTRACT).unwrap(), U256::ZERO);
    assert_eq!(
        host.backend_mut().storage(CONTRACT, U256::from(1)).unwrap(),
        U256::ZERO
    );
}

#[test]
fn failed_inner_call_only_reverts_inner_frame() {
    let outer = bytes!("f1");
    let engine = storing_engine().with(outer.clone(), |host, ctx| {
        host.set_storage(ctx.recipient, U256::from(2), U256::from(1));
        host.set_transient_storage(ctx.recipient, U256::from(2), U256::from(1));
        let inner = host.call(
            CallContext::call(
                MessageKind::Call,
                ctx.recipient,
                LIBRARY,
                U256::from(3),
                Bytes::new(),
                1_000,
            )
            .with_depth(ctx.depth + 1),
        );
        assert_eq!(inner.gas_left, 0);
        assert!(!inner.is_success());
        ExecutionResult::success(Bytes::new(), ctx.gas_limit - 2_000)
    });
    let db = funded_db()
        .with_account(CONTRACT, AccountInfo::new(U256::from(3), 0, outer))
        .with_account(LIBRARY, AccountInfo::default().with_code(FAULT_CODE));
    let mut host = host_with(SpecId::CANCUN, db, engine);

    let result = host.transact(call(ALICE, CONTRACT, 0)).unwrap();
    assert!(result.is_success());
    assert_eq!(result.gas_left, GAS - 2_000);

    let backend = host.backend_mut();
    assert_eq!(backend.storage(CONTRACT, U256::from(2)).unwrap(), U256::from(1));
    assert_eq!(backend.storage(LIBRARY, U256::from(1)).unwrap(), U256::ZERO);
    assert_eq!(backend.balance(CONTRACT).unwrap(), U256::from(3));
    assert_eq!(backend.balance(LIBRARY).unwrap(), U256::ZERO);
    assert_eq!(
        backend.transient_storage(CONTRACT, U256::from(2)),
        U256::from(1)
    );
}

#[test]
fn transient_storage_of_failed_frame_is_reverted() {
    let code = bytes!("5d");
    let engine = ScriptedEngine::new().with(code.clone(), |host, ctx| {
        host.set_transient_storage(ctx.recipient, U256::from(1), U256::from(5));
        assert_eq!(
            host.get_transient_storage(ctx.recipient, U256::from(1)),
            U256::from(5)
        );
        ExecutionResult::failure(HaltReason::StackUnderflow, 0)
    });
    let mut host = host_with(SpecId::CANCUN, contract_db(code), engine);
    host.transact(call(ALICE, CONTRACT, 0)).unwrap();
    assert_eq!(
        host.get_transient_storage(CONTRACT, U256::from(1)),
        U256::ZERO
    );
}

#[test]
fn call_depth_is_bounded() {
    let mut host = host_with(SpecId::CANCUN, contract_db(STORE_CODE), storing_engine());
    let result = host.call(call(ALICE, CONTRACT, 0).with_depth(1025));
    assert_eq!(result.error, Some(ExecutionError::CallTooDeep));
    assert_eq!(result.gas_left, GAS);

    let result = host.call(call(ALICE, CONTRACT, 0).with_depth(1024));
    assert!(result.is_success());

    let cfg = CfgEnv::new_with_spec(SpecId::CANCUN).with_enforce_call_depth(false);
    let mut host = host_with_cfg(cfg, contract_db(STORE_CODE), storing_engine());
    assert!(host.call(call(ALICE, CONTRACT, 0).with_depth(5_000)).is_success());
}

#[test]
fn delegatecall_runs_library_code_in_caller_context() {
    let db = contract_db(Bytes::new())
        .with_account(LIBRARY, AccountInfo::default().with_code(STORE_CODE));
    let mut host = host_with(SpecId::CANCUN, db, storing_engine());
    let context = CallContext::call(
        MessageKind::DelegateCall,
        ALICE,
        CONTRACT,
        U256::from(99),
        Bytes::new(),
        GAS,
    )
    .with_code_address(LIBRARY);
    let result = host.transact(context).unwrap();

    assert!(result.is_success());
    let backend = host.backend_mut();
    assert_eq!(backend.storage(CONTRACT, U256::from(1)).unwrap(), U256::from(42));
    assert_eq!(backend.storage(LIBRARY, U256::from(1)).unwrap(), U256::ZERO);
    assert_eq!(backend.balance(CONTRACT).unwrap(), U256::ZERO);
}

#[test]
fn staticcall_frame_is_static() {
    let code = bytes!("fa");
    let engine = ScriptedEngine::new().with(code.clone(), |_, ctx| {
        if !ctx.is_static {
            return ExecutionResult::failure(HaltReason::StateChangeDuringStaticCall, 0);
        }
        ExecutionResult::success(Bytes::new(), ctx.gas_limit)
    });
    let mut host = host_with(SpecId::CANCUN, contract_db(code), engine);
    let context = CallContext::call(
        MessageKind::StaticCall,
        ALICE,
        CONTRACT,
        U256::ZERO,
        Bytes::new(),
        GAS,
    );
    assert!(host.transact(context).unwrap().is_success());
}

#[test]
fn empty_code_delegatecall_succeeds_untouched() {
    let mut host = host_with(SpecId::CANCUN, funded_db(), ScriptedEngine::new());
    let context = CallContext::call(
        MessageKind::DelegateCall,
        ALICE,
        NOBODY,
        U256::ZERO,
        Bytes::new(),
        GAS,
    );
    let result = host.transact(context).unwrap();
    assert!(result.is_success());
    assert_eq!(result.gas_left, GAS);
    assert!(!host.backend_mut().exists(NOBODY).unwrap());
}

fn identity(input: &Bytes, gas_limit: u64) -> PrecompileResult {
    let cost = 15 + 3 * (input.len() as u64).div_ceil(32);
    if cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }
    Ok(PrecompileOutput::new(cost, input.clone()))
}

fn failing(_input: &Bytes, _gas_limit: u64) -> PrecompileResult {
    Err(PrecompileError::Other("bad input".into()))
}

const IDENTITY: evmhost::primitives::Address =
    address!("0x0000000000000000000000000000000000000004");
const FAILING: evmhost::primitives::Address =
    address!("0x0000000000000000000000000000000000000005");

#[test]
fn precompiles_run_natively() {
    let precompiles = PrecompileSet::new()
        .with(IDENTITY, identity)
        .with(FAILING, failing);
    let mut host = host_with(SpecId::CANCUN, funded_db(), ScriptedEngine::new())
        .with_precompiles(precompiles)
        .with_observer(evmhost::CallMetrics::default());

    let context = CallContext::call(
        MessageKind::StaticCall,
        ALICE,
        IDENTITY,
        U256::ZERO,
        bytes!("c0ffee"),
        GAS,
    );
    let result = host.transact(context).unwrap();
    assert_eq!(result.output, bytes!("c0ffee"));
    assert_eq!(result.gas_left, GAS - 18);

    let mut context = call(ALICE, IDENTITY, 0);
    context.gas_limit = 10;
    let result = host.transact(context).unwrap();
    assert_eq!(result.error, Some(HaltReason::OutOfGas.into()));
    assert_eq!(result.gas_left, 0);

    let result = host.transact(call(ALICE, FAILING, 5)).unwrap();
    assert_eq!(result.error, Some(HaltReason::PrecompileError.into()));
    assert_eq!(host.backend_mut().balance(FAILING).unwrap(), U256::ZERO);

    assert_eq!(host.observer().precompile_runs, 3);
    assert_eq!(host.observer().reverts, 2);
}

#[test]
fn zero_value_call_to_missing_precompile_account_touches_it() {
    let precompiles = PrecompileSet::new().with(IDENTITY, identity);
    let mut host = host_with(SpecId::CANCUN, funded_db(), ScriptedEngine::new())
        .with_precompiles(precompiles);
    let result = host.transact(call(ALICE, IDENTITY, 0)).unwrap();
    assert!(result.is_success());
    assert!(host.backend_mut().exists(IDENTITY).unwrap());
}
