mod common;

use common::*;
use evmhost::{
    context::{AccessList, AccessListItem, BlockEnv, CfgEnv, Journal, StateBackend, TxEnv},
    database::{DBErrorMarker, Database, DatabaseCommit, EmptyDB, InMemoryDB},
    primitives::{
        address, b256, bytes, hardfork::SpecId, Address, Bytes, StorageKey, StorageValue, B256,
        U256,
    },
    state::{AccountInfo, EvmState},
    AccessStatus, CallContext, CallHost, CallMetrics, ExecutionError, ExecutionResult, Host,
    HostError, MessageKind, StorageStatus,
};
use rstest::rstest;
use std::sync::Arc;

const PROBE: Bytes = bytes!("40");

#[test]
fn block_hash_window() {
    let mut db = funded_db();
    for number in [743, 744, 999, 1_000] {
        db.insert_block_hash(number, B256::with_last_byte((number % 256) as u8 + 1));
    }
    let mut host = host_with(SpecId::CANCUN, db, ScriptedEngine::new());

    assert_eq!(host.block_hash(999), B256::with_last_byte((999 % 256) as u8 + 1));
    assert_eq!(host.block_hash(744), B256::with_last_byte((744 % 256) as u8 + 1));
    assert_eq!(host.block_hash(743), B256::ZERO);
    assert_eq!(host.block_hash(1_000), B256::ZERO);
    assert_eq!(host.block_hash(5_000), B256::ZERO);
}

#[test]
fn logs_are_attributed_and_reverted_with_their_frame() {
    let topic = b256!("0x00000000000000000000000000000000000000000000000000000000000000a1");
    let engine = ScriptedEngine::new()
        .with(PROBE, move |host, ctx| {
            host.emit_log(ctx.recipient, &[topic], &bytes!("01"));
            let inner = host.call(
                CallContext::call(
                    MessageKind::Call,
                    ctx.recipient,
                    LIBRARY,
                    U256::ZERO,
                    Bytes::new(),
                    1_000,
                )
                .with_depth(ctx.depth + 1),
            );
            assert!(inner.is_revert());
            ExecutionResult::success(Bytes::new(), ctx.gas_limit)
        })
        .with(bytes!("a0"), |host, ctx| {
            host.emit_log(ctx.recipient, &[], &bytes!("02"));
            ExecutionResult::revert(Bytes::new(), ctx.gas_limit)
        });
    let db = funded_db()
        .with_account(CONTRACT, AccountInfo::default().with_code(PROBE))
        .with_account(LIBRARY, AccountInfo::default().with_code(bytes!("a0")));
    let mut host = host_with(SpecId::CANCUN, db, engine);

    assert!(host.transact(call(ALICE, CONTRACT, 0)).unwrap().is_success());
    let logs = host.end_transaction();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].address, CONTRACT);
    assert_eq!(logs[0].data.topics(), &[topic]);
    assert_eq!(logs[0].data.data, bytes!("01"));
}

#[rstest]
#[case(SpecId::TANGERINE, true)]
#[case(SpecId::SPURIOUS_DRAGON, false)]
fn empty_account_existence(#[case] spec: SpecId, #[case] exists: bool) {
    let db = funded_db().with_account(BOB, AccountInfo::default());
    let mut host = host_with(spec, db, ScriptedEngine::new());

    assert_eq!(host.account_exists(BOB), exists);
    assert!(host.account_exists(ALICE));
    assert!(!host.account_exists(NOBODY));
}

#[test]
fn set_storage_classifies_against_transaction_start() {
    let mut db = funded_db().with_account(CONTRACT, AccountInfo::default().with_nonce(1));
    db.insert_account_storage(CONTRACT, U256::from(1), U256::from(10));
    let mut host = host_with(SpecId::CANCUN, db, ScriptedEngine::new());
    let one = U256::from(1);
    let two = U256::from(2);

    assert_eq!(host.set_storage(CONTRACT, one, U256::from(10)), StorageStatus::Assigned);
    assert_eq!(host.set_storage(CONTRACT, one, U256::from(11)), StorageStatus::Modified);
    assert_eq!(host.set_storage(CONTRACT, one, U256::ZERO), StorageStatus::ModifiedDeleted);
    assert_eq!(host.set_storage(CONTRACT, one, U256::from(12)), StorageStatus::DeletedAdded);
    assert_eq!(
        host.set_storage(CONTRACT, one, U256::from(10)),
        StorageStatus::ModifiedRestored
    );
    assert_eq!(host.get_storage(CONTRACT, one), U256::from(10));

    assert_eq!(host.set_storage(CONTRACT, two, U256::from(5)), StorageStatus::Added);
    assert_eq!(host.set_storage(CONTRACT, two, U256::ZERO), StorageStatus::AddedDeleted);
}

#[test]
fn account_getters() {
    let code = bytes!("6000600055");
    let db = funded_db().with_account(CONTRACT, AccountInfo::new(U256::from(3), 1, code.clone()));
    let mut host = host_with(SpecId::CANCUN, db, ScriptedEngine::new());

    assert_eq!(host.get_balance(CONTRACT), U256::from(3));
    assert_eq!(host.get_code(CONTRACT), code);
    assert_eq!(host.get_code_size(CONTRACT), 5);
    assert_eq!(
        host.get_code_hash(CONTRACT),
        evmhost::primitives::keccak256(&code)
    );
    assert_eq!(host.get_code_hash(NOBODY), B256::ZERO);
    assert_eq!(host.get_code_size(NOBODY), 0);
}

#[test]
fn tx_context_reflects_block_and_transaction() {
    let cfg = CfgEnv::new_with_spec(SpecId::CANCUN).with_chain_id(10);
    let block = BlockEnv {
        number: 77,
        beneficiary: COINBASE,
        timestamp: 1_700_000_000,
        gas_limit: 30_000_000,
        basefee: 9,
        prevrandao: Some(B256::with_last_byte(1)),
        blob_basefee: None,
    };
    let mut host = CallHost::new(
        Journal::new(funded_db()),
        Arc::new(ScriptedEngine::new()),
        cfg,
        block,
    );
    host.begin_transaction(
        &TxEnv {
            caller: BOB,
            gas_price: 12,
            ..Default::default()
        },
        Some(CONTRACT),
    );

    let tx = host.tx_context();
    assert_eq!(tx.origin, BOB);
    assert_eq!(tx.gas_price, U256::from(12));
    assert_eq!(tx.coinbase, COINBASE);
    assert_eq!(tx.number, 77);
    assert_eq!(tx.chain_id, U256::from(10));
    assert_eq!(tx.base_fee, U256::from(9));
    assert_eq!(tx.prev_randao, B256::with_last_byte(1));
    assert_eq!(tx.blob_base_fee, U256::ZERO);
}

#[rstest]
#[case(SpecId::ISTANBUL, false, false)]
#[case(SpecId::BERLIN, true, false)]
#[case(SpecId::SHANGHAI, true, true)]
fn transaction_warming(#[case] spec: SpecId, #[case] berlin: bool, #[case] shanghai: bool) {
    let listed = address!("0x5000000000000000000000000000000000000001");
    let mut host = host_with(spec, funded_db(), ScriptedEngine::new());
    host.begin_transaction(
        &TxEnv {
            caller: ALICE,
            access_list: AccessList(vec![AccessListItem {
                address: listed,
                storage_keys: vec![B256::with_last_byte(7)],
            }]),
            ..Default::default()
        },
        Some(CONTRACT),
    );

    let warm = host.access_list();
    assert_eq!(warm.is_warm_address(&ALICE), berlin);
    assert_eq!(warm.is_warm_address(&CONTRACT), berlin);
    assert_eq!(warm.is_warm_address(&listed), berlin);
    assert_eq!(warm.is_warm_slot(listed, U256::from(7)), berlin);
    assert_eq!(warm.is_warm_address(&COINBASE), shanghai);
    assert!(!warm.is_warm_address(&NOBODY));
}

#[test]
fn access_list_survives_reverts_and_clears_between_transactions() {
    let engine = ScriptedEngine::new().with(PROBE, |host, ctx| {
        assert_eq!(host.access_account(NOBODY), AccessStatus::Cold);
        assert_eq!(host.access_account(NOBODY), AccessStatus::Warm);
        assert!(host.access_storage(ctx.recipient, U256::from(3)).is_cold());
        ExecutionResult::revert(Bytes::new(), ctx.gas_limit)
    });
    let db = funded_db().with_account(CONTRACT, AccountInfo::default().with_code(PROBE));
    let mut host = host_with(SpecId::CANCUN, db, engine);

    assert!(host.transact(call(ALICE, CONTRACT, 0)).unwrap().is_revert());
    assert!(host.access_list().is_warm_address(&NOBODY));
    assert!(host.access_list().is_warm_slot(CONTRACT, U256::from(3)));

    host.end_transaction();
    assert!(!host.access_list().is_warm_address(&NOBODY));
}

#[test]
fn observer_sees_every_message() {
    let engine = ScriptedEngine::new().with(PROBE, |host, ctx| {
        let nested = CallContext::call(
            MessageKind::StaticCall,
            ctx.recipient,
            NOBODY,
            U256::ZERO,
            Bytes::new(),
            100,
        )
        .with_depth(ctx.depth + 1);
        host.call(nested);
        host.call(CallContext::create(ctx.recipient, U256::from(1), Bytes::new(), 100));
        ExecutionResult::success(Bytes::new(), ctx.gas_limit)
    });
    let db = funded_db().with_account(CONTRACT, AccountInfo::default().with_code(PROBE));
    let mut host = host_with(SpecId::CANCUN, db, engine).with_observer(CallMetrics::default());
    host.transact(call(ALICE, CONTRACT, 0)).unwrap();

    let metrics = host.observer();
    assert_eq!(metrics.calls_of(MessageKind::Call), 1);
    assert_eq!(metrics.calls_of(MessageKind::StaticCall), 1);
    assert_eq!(metrics.calls_of(MessageKind::Create), 1);
    assert_eq!(metrics.total_calls(), 3);
    // contract has no balance for the endowment
    assert_eq!(metrics.precheck_failures, 1);
    assert_eq!(metrics.deployments, 0);
}

#[test]
fn runs_over_an_empty_database() {
    let mut host = CallHost::new(
        Journal::new(EmptyDB::new()),
        Arc::new(ScriptedEngine::new()),
        CfgEnv::new_with_spec(SpecId::CANCUN),
        BlockEnv::default(),
    );
    assert_eq!(host.cfg().spec.to_string(), "Cancun");
    assert!(!host.account_exists(ALICE));
    assert_eq!(host.block_hash(0), B256::ZERO);

    let result = host
        .transact(CallContext::create(ALICE, U256::ZERO, Bytes::new(), GAS))
        .unwrap();
    assert_eq!(result.created_address, Some(ALICE.create(0)));
    assert_eq!(result.gas_left, GAS);
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("account {0} is unavailable")]
struct Unavailable(Address);

impl DBErrorMarker for Unavailable {}

/// In-memory database that fails to load one account.
#[derive(Debug)]
struct FailingDb {
    inner: InMemoryDB,
    broken: Address,
}

impl Database for FailingDb {
    type Error = Unavailable;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        if address == self.broken {
            return Err(Unavailable(address));
        }
        Ok(self.inner.basic(address).unwrap_or_default())
    }

    fn storage(
        &mut self,
        address: Address,
        index: StorageKey,
    ) -> Result<StorageValue, Self::Error> {
        Ok(self.inner.storage(address, index).unwrap_or_default())
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(self.inner.block_hash(number).unwrap_or_default())
    }
}

impl DatabaseCommit for FailingDb {
    fn commit(&mut self, changes: EvmState) {
        self.inner.commit(changes);
    }
}

fn failing_host(engine: ScriptedEngine) -> CallHost<Journal<FailingDb>, ScriptedEngine> {
    let db = FailingDb {
        inner: funded_db().with_account(CONTRACT, AccountInfo::default().with_code(PROBE)),
        broken: NOBODY,
    };
    let mut host = CallHost::new(
        Journal::new(db),
        Arc::new(engine),
        CfgEnv::new_with_spec(SpecId::CANCUN),
        BlockEnv::default(),
    );
    host.begin_transaction(
        &TxEnv {
            caller: ALICE,
            ..Default::default()
        },
        None,
    );
    host
}

#[test]
fn backend_failure_aborts_the_transaction() {
    let engine = ScriptedEngine::new().with(PROBE, |host, ctx| {
        host.set_storage(ctx.recipient, U256::from(1), U256::from(1));
        assert_eq!(host.get_balance(NOBODY), U256::ZERO);
        let nested = host.call(
            CallContext::call(
                MessageKind::Call,
                ctx.recipient,
                CONTRACT,
                U256::ZERO,
                Bytes::new(),
                100,
            )
            .with_depth(ctx.depth + 1),
        );
        assert_eq!(nested.error, Some(ExecutionError::FatalExternalError));
        ExecutionResult::success(Bytes::new(), ctx.gas_limit)
    });
    let mut host = failing_host(engine);

    let error = host.transact(call(ALICE, CONTRACT, 5)).unwrap_err();
    assert_eq!(error, HostError::Database(Unavailable(NOBODY)));
    assert_eq!(error.to_string(), format!("database error: account {NOBODY} is unavailable"));

    let backend = host.backend_mut();
    assert_eq!(backend.storage(CONTRACT, U256::from(1)).unwrap(), U256::ZERO);
    assert_eq!(backend.balance(CONTRACT).unwrap(), U256::ZERO);
    assert!(host.fatal_error().is_none());
}

#[test]
fn backend_failure_before_execution() {
    let mut host = failing_host(ScriptedEngine::new());
    let error = host.transact(call(ALICE, NOBODY, 1)).unwrap_err();
    assert_eq!(error, HostError::Database(Unavailable(NOBODY)));
    assert_eq!(host.backend_mut().balance(ALICE).unwrap(), U256::from(1_000_000));
}
