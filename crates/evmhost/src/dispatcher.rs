//! Call and create state machine.
//!
//! A message passes prechecks, takes a snapshot before its first state mutation,
//! runs natively (precompile), trivially (empty code) or in the engine, and is
//! committed or reverted. Access-list additions are never reverted.
use crate::{
    deployment::validate_deployment, snapshot::Snapshot, CallContext, CallHost, CallObserver,
    ExecutionEngine, ExecutionError, ExecutionResult, HaltReason, MessageKind, PrecompileError,
    PrecompileProvider,
};
use context::{StateBackend, TransferError};
use primitives::{
    eof::{is_eof, new_eof_address},
    Address, Bytes, B256, CALL_STACK_LIMIT, KECCAK_EMPTY, U256,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Address of the contract created by a `kind` message.
///
/// `Create` depends on the sender nonce, `Create2` on the hash of the init code
/// and the salt, `EofCreate` on the salt only. `None` for message calls.
pub fn create_address(
    kind: MessageKind,
    sender: Address,
    nonce: u64,
    salt: B256,
    init_code: &[u8],
) -> Option<Address> {
    match kind {
        MessageKind::Create => Some(sender.create(nonce)),
        MessageKind::Create2 => Some(sender.create2_from_code(salt, init_code)),
        MessageKind::EofCreate => Some(new_eof_address(sender, salt)),
        _ => None,
    }
}

fn transfer_error(error: TransferError) -> ExecutionError {
    match error {
        TransferError::OutOfFunds => ExecutionError::InsufficientBalance,
        TransferError::OverflowPayment => HaltReason::OverflowPayment.into(),
    }
}

impl<B, E, P, O> CallHost<B, E, P, O>
where
    B: StateBackend,
    E: ExecutionEngine,
    P: PrecompileProvider,
    O: CallObserver,
{
    /// Executes a call or create message.
    pub(crate) fn dispatch(&mut self, context: CallContext) -> ExecutionResult {
        trace!(
            kind = %context.kind,
            depth = context.depth,
            sender = %context.sender,
            recipient = %context.recipient,
            gas = context.gas_limit,
            "dispatch"
        );
        self.observer.on_call_start(&context);

        let mut result = if self.error.is_some() {
            ExecutionResult::failure(ExecutionError::FatalExternalError, 0)
        } else if self.cfg.enforce_call_depth && context.depth > CALL_STACK_LIMIT {
            self.precheck_failed(&context, ExecutionError::CallTooDeep)
        } else {
            let outcome = if context.kind.is_create() {
                self.dispatch_create(&context)
            } else {
                self.dispatch_call(&context)
            };
            outcome.unwrap_or_else(|error| {
                self.stash_error(error);
                ExecutionResult::failure(ExecutionError::FatalExternalError, 0)
            })
        };

        result.clamp_gas(context.gas_supplied());
        self.observer.on_call_end(&context, &result);
        result
    }

    fn precheck_failed(&mut self, context: &CallContext, error: ExecutionError) -> ExecutionResult {
        debug!(kind = %context.kind, depth = context.depth, %error, "precheck failed");
        self.observer.on_precheck_failure(context, &error);
        let gas_left = match error {
            ExecutionError::ContractAddressCollision | ExecutionError::InvalidEofInitCode => 0,
            _ => context.gas_supplied(),
        };
        ExecutionResult::failure(error, gas_left)
    }

    /// `CALL`, `CALLCODE`, `DELEGATECALL` and `STATICCALL`.
    fn dispatch_call(&mut self, context: &CallContext) -> Result<ExecutionResult, B::Error> {
        let gas = context.gas_supplied();
        let kind = context.kind;

        let mut value = context.value;
        if matches!(kind, MessageKind::Call | MessageKind::CallCode)
            && !value.is_zero()
            && self.backend.balance(context.sender)? < value
        {
            if !self.cfg.bailout {
                return Ok(self.precheck_failed(context, ExecutionError::InsufficientBalance));
            }
            debug!(sender = %context.sender, %value, "bailout, value not transferred");
            value = U256::ZERO;
        }

        let is_precompile = self.precompiles.contains(&context.code_address);
        let code = if is_precompile {
            Bytes::new()
        } else {
            self.backend.code(context.code_address)?
        };

        if !is_precompile && code.is_empty() && kind != MessageKind::Call {
            return Ok(ExecutionResult::success(Bytes::new(), gas));
        }

        let snapshot = (kind == MessageKind::Call || !code.is_empty())
            .then(|| Snapshot::acquire(&mut self.backend));

        let outcome = self.run_call(context, is_precompile, code, value);
        let mut result = match outcome {
            Ok(Some(result)) => result,
            Ok(None) => {
                if let Some(snapshot) = snapshot {
                    snapshot.commit(&mut self.backend);
                }
                trace!(recipient = %context.recipient, "call to non-existent account skipped");
                return Ok(ExecutionResult::success(Bytes::new(), gas));
            }
            Err(error) => {
                if let Some(snapshot) = snapshot {
                    snapshot.revert(&mut self.backend);
                }
                return Err(error);
            }
        };
        self.absorb_fatal_error(&mut result);

        let revert = result.error.is_some() || self.cfg.restore_state;
        if revert {
            debug!(kind = %kind, depth = context.depth, error = ?result.error, "reverting call");
            self.observer.on_revert(context, result.error.as_ref());
        } else {
            trace!(kind = %kind, depth = context.depth, "committing call");
        }
        if let Some(snapshot) = snapshot {
            snapshot.resolve(&mut self.backend, revert);
        }
        result.settle_failure();
        Ok(result)
    }

    /// Value transfer and execution of a message call. `None` when a zero value
    /// call to a non-existent account is skipped.
    fn run_call(
        &mut self,
        context: &CallContext,
        is_precompile: bool,
        code: Bytes,
        value: U256,
    ) -> Result<Option<ExecutionResult>, B::Error> {
        let gas = context.gas_supplied();

        if context.kind == MessageKind::Call {
            if !self.backend.exists(context.recipient)? {
                if !is_precompile && self.rules.is_spurious_dragon && context.value.is_zero() {
                    return Ok(None);
                }
                self.backend.touch(context.recipient)?;
            }
            if let Some(error) = self
                .backend
                .transfer(context.sender, context.recipient, value)?
            {
                return Ok(Some(ExecutionResult::failure(transfer_error(error), gas)));
            }
        }

        if is_precompile {
            return Ok(Some(self.run_precompile(context)));
        }
        if code.is_empty() {
            return Ok(Some(ExecutionResult::success(Bytes::new(), gas)));
        }

        let mut frame = context.clone();
        frame.value = if context.kind == MessageKind::DelegateCall {
            context.value
        } else {
            value
        };
        frame.is_static |= context.kind == MessageKind::StaticCall;
        let engine = Arc::clone(&self.engine);
        Ok(Some(engine.execute(self, &frame, &code)))
    }

    fn run_precompile(&mut self, context: &CallContext) -> ExecutionResult {
        self.observer.on_precompile(context.code_address);
        let gas = context.gas_supplied();
        let outcome = self
            .precompiles
            .run(&context.code_address, &context.input, gas as u64);
        match outcome {
            Some(Ok(output)) if output.gas_used <= gas as u64 => {
                ExecutionResult::success(output.bytes, gas - output.gas_used as i64)
            }
            Some(Ok(_)) | Some(Err(PrecompileError::OutOfGas)) => {
                ExecutionResult::failure(HaltReason::OutOfGas, 0)
            }
            Some(Err(error)) => {
                debug!(address = %context.code_address, %error, "precompile failed");
                ExecutionResult::failure(HaltReason::PrecompileError, 0)
            }
            None => ExecutionResult::success(Bytes::new(), gas),
        }
    }

    /// `CREATE`, `CREATE2` and `EOFCREATE`.
    fn dispatch_create(&mut self, context: &CallContext) -> Result<ExecutionResult, B::Error> {
        let gas = context.gas_supplied();
        let kind = context.kind;
        let sender = context.sender;

        let (init_code, input) = match kind {
            MessageKind::EofCreate => (
                context.code.clone().unwrap_or_default(),
                context.input.clone(),
            ),
            _ => (context.input.clone(), Bytes::new()),
        };

        let nonce = self.backend.nonce(sender)?;
        let Some(recipient) = create_address(kind, sender, nonce, context.salt, &init_code) else {
            return Ok(self.precheck_failed(context, ExecutionError::FatalExternalError));
        };

        if self.backend.balance(sender)? < context.value {
            return Ok(self.precheck_failed(context, ExecutionError::InsufficientBalance));
        }
        let Some(next_nonce) = nonce.checked_add(1) else {
            return Ok(self.precheck_failed(context, ExecutionError::NonceOverflow));
        };
        self.backend.set_nonce(sender, next_nonce)?;

        if self.rules.is_berlin {
            self.access_list.access_address(recipient);
        }

        if kind == MessageKind::EofCreate && !is_eof(&init_code) {
            return Ok(self.precheck_failed(context, ExecutionError::InvalidEofInitCode));
        }

        let code_hash = self.backend.code_hash(recipient)?;
        if self.backend.nonce(recipient)? != 0
            || (code_hash != B256::ZERO && code_hash != KECCAK_EMPTY)
        {
            return Ok(self.precheck_failed(context, ExecutionError::ContractAddressCollision));
        }

        let snapshot = Snapshot::acquire(&mut self.backend);
        let mut frame = context.clone();
        frame.recipient = recipient;
        frame.code_address = recipient;
        frame.input = input;

        let mut result = match self.run_create(&frame, &init_code) {
            Ok(result) => result,
            Err(error) => {
                snapshot.revert(&mut self.backend);
                return Err(error);
            }
        };
        self.absorb_fatal_error(&mut result);

        let revert = match &result.error {
            Some(error) => {
                self.rules.is_homestead || *error != ExecutionError::CodeStoreOutOfGas
            }
            None => self.cfg.restore_state,
        };
        if revert {
            debug!(
                kind = %kind,
                depth = context.depth,
                %recipient,
                error = ?result.error,
                "reverting create"
            );
            self.observer.on_revert(context, result.error.as_ref());
        } else {
            trace!(kind = %kind, depth = context.depth, %recipient, "committing create");
        }
        snapshot.resolve(&mut self.backend, revert);

        if result.is_success() {
            result.created_address = Some(recipient);
        }
        result.settle_failure();
        Ok(result)
    }

    /// Materializes the contract, runs the init code and stores the returned code.
    fn run_create(
        &mut self,
        frame: &CallContext,
        init_code: &Bytes,
    ) -> Result<ExecutionResult, B::Error> {
        let gas = frame.gas_supplied();
        let recipient = frame.recipient;

        self.backend.create_account(recipient)?;
        if self.rules.is_spurious_dragon {
            self.backend.set_nonce(recipient, 1)?;
        }
        if let Some(error) = self.backend.transfer(frame.sender, recipient, frame.value)? {
            return Ok(ExecutionResult::failure(transfer_error(error), gas));
        }

        let engine = Arc::clone(&self.engine);
        let mut result = engine.execute(self, frame, init_code);
        result.clamp_gas(gas);
        if !result.is_success() {
            return Ok(result);
        }

        match validate_deployment(
            &self.rules,
            self.cfg.max_code_size(),
            frame.kind,
            &result.output,
            result.gas_left,
        ) {
            Ok(deployment) => {
                result.gas_left = deployment.gas_left;
                if deployment.store_code {
                    self.backend.set_code(recipient, result.output.clone())?;
                    self.observer.on_deploy(recipient, result.output.len());
                }
            }
            Err(error) => {
                debug!(%recipient, %error, "deployment rejected");
                result.error = Some(error);
            }
        }
        Ok(result)
    }

    /// Fails `result` if the engine hit a backend failure through the host.
    fn absorb_fatal_error(&self, result: &mut ExecutionResult) {
        if self.error.is_some() {
            result.error = Some(ExecutionError::FatalExternalError);
        }
    }
}
