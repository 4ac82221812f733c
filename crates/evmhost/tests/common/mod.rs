//! Scripted execution engine and fixtures shared by the integration tests.
#![allow(dead_code)]

use evmhost::{
    context::{BlockEnv, CfgEnv, Journal, TxEnv},
    database::InMemoryDB,
    primitives::{address, hardfork::SpecId, Address, Bytes, HashMap, U256},
    state::AccountInfo,
    CallContext, CallHost, ExecutionEngine, ExecutionResult, Host,
};
use std::sync::Arc;

pub const ALICE: Address = address!("0x1000000000000000000000000000000000000001");
pub const BOB: Address = address!("0x1000000000000000000000000000000000000002");
pub const CONTRACT: Address = address!("0x2000000000000000000000000000000000000001");
pub const LIBRARY: Address = address!("0x2000000000000000000000000000000000000002");
pub const NOBODY: Address = address!("0x3000000000000000000000000000000000000001");
pub const COINBASE: Address = address!("0x4000000000000000000000000000000000000001");

pub const GAS: i64 = 100_000;

type Program = Arc<dyn Fn(&mut dyn Host, &CallContext) -> ExecutionResult>;

/// Engine whose behaviour is looked up by the code it is asked to run.
///
/// Unknown code succeeds with empty output and all gas left.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    programs: HashMap<Bytes, Program>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        code: Bytes,
        program: impl Fn(&mut dyn Host, &CallContext) -> ExecutionResult + 'static,
    ) -> Self {
        self.programs.insert(code, Arc::new(program));
        self
    }
}

impl ExecutionEngine for ScriptedEngine {
    fn execute(
        &self,
        host: &mut dyn Host,
        context: &CallContext,
        code: &Bytes,
    ) -> ExecutionResult {
        match self.programs.get(code) {
            Some(program) => program(host, context),
            None => ExecutionResult::success(Bytes::new(), context.gas_limit),
        }
    }
}

pub type TestHost = CallHost<Journal<InMemoryDB>, ScriptedEngine>;

/// Database with a funded `ALICE`.
pub fn funded_db() -> InMemoryDB {
    InMemoryDB::new().with_account(ALICE, AccountInfo::from_balance(U256::from(1_000_000)))
}

pub fn host_with(spec: SpecId, db: InMemoryDB, engine: ScriptedEngine) -> TestHost {
    host_with_cfg(CfgEnv::new_with_spec(spec), db, engine)
}

pub fn host_with_cfg(cfg: CfgEnv, db: InMemoryDB, engine: ScriptedEngine) -> TestHost {
    let block = BlockEnv {
        number: 1_000,
        beneficiary: COINBASE,
        ..Default::default()
    };
    let mut host = CallHost::new(Journal::new(db), Arc::new(engine), cfg, block);
    host.begin_transaction(
        &TxEnv {
            caller: ALICE,
            ..Default::default()
        },
        None,
    );
    host
}

/// Plain value call from `sender` to `recipient`.
pub fn call(sender: Address, recipient: Address, value: u64) -> CallContext {
    CallContext::call(
        evmhost::MessageKind::Call,
        sender,
        recipient,
        U256::from(value),
        Bytes::new(),
        GAS,
    )
}
