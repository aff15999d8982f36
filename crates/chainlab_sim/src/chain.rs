//! The simulated chain: deployment, invocation, balances, clock and log
//!
//! Provides the deterministic execution environment the study guide runs
//! against. Every top-level deploy or call executes under a checkpoint of
//! the whole chain state; a revert restores the checkpoint, so no failed
//! invocation can leave a partial write behind.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::specimen::{check_args, OpKind, Specimen};
use crate::storage::{MemoryStore, StorageKey, StoreSnapshot};
use crate::types::{Address, CallOutcome, Event, EventRecord};

/// Timestamp of block 0
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Record of one deployment
#[derive(Debug, Clone)]
pub struct DeployedInstance {
    /// Instance address
    pub address: Address,
    /// Name of the specimen this instance was deployed from
    pub specimen: String,
    /// Deploying account
    pub deployer: Address,
    /// Block height at deployment
    pub deployed_at_block: u64,
    /// Chain time at deployment
    pub deployed_at_time: u64,
}

/// Options for a deployment
#[derive(Debug, Clone, Default)]
pub struct DeployOpts {
    /// Deploying account; the chain's default caller if unset
    pub caller: Option<Address>,
    /// Value attached to the deployment (payable constructors only)
    pub value: u64,
    /// Constructor arguments
    pub args: Vec<serde_json::Value>,
}

impl DeployOpts {
    /// Options with constructor arguments
    pub fn args(args: Vec<serde_json::Value>) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    /// Set the deploying account
    pub fn caller(mut self, caller: Address) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Attach value
    pub fn value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }
}

/// Options for an invocation
#[derive(Debug, Clone, Default)]
pub struct CallOpts {
    /// Calling account; the chain's default caller if unset
    pub caller: Option<Address>,
    /// Value attached to the call (payable operations only)
    pub value: u64,
}

impl CallOpts {
    /// Options with an explicit caller
    pub fn caller(caller: Address) -> Self {
        Self {
            caller: Some(caller),
            value: 0,
        }
    }

    /// Attach value
    pub fn value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }
}

/// Mutable chain state, checkpointed around every top-level invocation
#[derive(Debug)]
struct ChainState {
    instances: HashMap<Address, DeployedInstance>,
    store: MemoryStore,
    balances: HashMap<Address, u64>,
    log: Vec<EventRecord>,
    clock: u64,
    block: u64,
    deploy_nonce: u64,
}

/// Checkpoint of everything an invocation may touch
struct Checkpoint {
    store: StoreSnapshot,
    balances: HashMap<Address, u64>,
    instances: HashMap<Address, DeployedInstance>,
    log_len: usize,
}

/// One call frame: who is calling what, with how much attached
#[derive(Debug, Clone, Copy)]
struct Frame {
    caller: Address,
    this: Address,
    value: u64,
}

/// The simulated chain
pub struct Chain {
    specimens: HashMap<String, Specimen>,
    state: ChainState,
}

impl Chain {
    /// Create a fresh chain at genesis
    pub fn new() -> Self {
        Self {
            specimens: HashMap::new(),
            state: ChainState {
                instances: HashMap::new(),
                store: MemoryStore::new(),
                balances: HashMap::new(),
                log: Vec::new(),
                clock: GENESIS_TIMESTAMP,
                block: 0,
                deploy_nonce: 0,
            },
        }
    }

    /// Account used when deploy/call options name no caller
    pub fn default_caller() -> Address {
        Address::derive("root")
    }

    /// Register a specimen under its name, replacing any previous one
    pub fn register(&mut self, specimen: Specimen) {
        debug!("registering specimen: {}", specimen.name);
        self.specimens.insert(specimen.name.clone(), specimen);
    }

    /// Check if a specimen name is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.specimens.contains_key(name)
    }

    /// Mint simulated balance for an account
    pub fn fund(&mut self, addr: Address, amount: u64) {
        *self.state.balances.entry(addr).or_insert(0) += amount;
    }

    /// Balance of an address (zero if never funded)
    pub fn balance_of(&self, addr: Address) -> u64 {
        self.state.balances.get(&addr).copied().unwrap_or(0)
    }

    /// Current chain time
    pub fn now(&self) -> u64 {
        self.state.clock
    }

    /// Current block height
    pub fn block(&self) -> u64 {
        self.state.block
    }

    /// Advance the chain clock by `secs`
    pub fn warp(&mut self, secs: u64) {
        self.state.clock += secs;
        debug!("clock advanced to {}", self.state.clock);
    }

    /// Get deployment record for an address
    pub fn instance(&self, addr: Address) -> Option<&DeployedInstance> {
        self.state.instances.get(&addr)
    }

    /// Check if an address holds a deployed instance
    pub fn has_instance(&self, addr: Address) -> bool {
        self.state.instances.contains_key(&addr)
    }

    /// Read a state field of an instance directly (test inspection)
    pub fn read_state(&self, addr: Address, field: &str) -> Option<serde_json::Value> {
        self.state.store.get(&StorageKey::field(addr, field))
    }

    /// Read one entry of a mapping-like field directly (test inspection)
    pub fn read_entry(&self, addr: Address, map: &str, key: &str) -> Option<serde_json::Value> {
        self.state.store.get(&StorageKey::entry(addr, map, key))
    }

    /// All committed emissions, in chain order
    pub fn all_events(&self) -> &[EventRecord] {
        &self.state.log
    }

    /// Committed emissions of one event name, in emission order
    pub fn events(&self, name: &str) -> Vec<EventRecord> {
        self.state
            .log
            .iter()
            .filter(|r| r.event.name == name)
            .cloned()
            .collect()
    }

    /// Emissions of one event name whose indexed `field` equals `value`,
    /// in emission order. Records that do not index `field` never match.
    pub fn events_by(&self, name: &str, field: &str, value: &serde_json::Value) -> Vec<EventRecord> {
        self.state
            .log
            .iter()
            .filter(|r| {
                r.event.name == name
                    && r.event.indexed.iter().any(|f| f == field)
                    && r.event.data.get(field) == Some(value)
            })
            .cloned()
            .collect()
    }

    /// Deploy a specimen with no constructor arguments or attached value
    pub fn deploy(&mut self, name: &str) -> SimResult<Address> {
        self.deploy_with(name, DeployOpts::default())
    }

    /// Deploy a specimen
    pub fn deploy_with(&mut self, name: &str, opts: DeployOpts) -> SimResult<Address> {
        let specimen = self
            .specimens
            .get(name)
            .ok_or_else(|| SimError::SpecimenNotFound(name.to_string()))?;

        let ctor = specimen.constructor.clone();
        match &ctor {
            Some(c) => check_args(&c.params, &opts.args)?,
            None if !opts.args.is_empty() => {
                return Err(SimError::InvalidArguments(format!(
                    "specimen '{name}' has no constructor"
                )))
            }
            None => {}
        }
        if opts.value > 0 && !ctor.as_ref().is_some_and(|c| c.payable) {
            return Err(SimError::revert(format!(
                "constructor of '{name}' is not payable"
            )));
        }

        let caller = opts.caller.unwrap_or_else(Self::default_caller);
        if opts.value > 0 && self.balance_of(caller) < opts.value {
            return Err(SimError::InsufficientBalance {
                caller: caller.to_string(),
                needed: opts.value,
                available: self.balance_of(caller),
            });
        }

        let address = self.next_instance_address(name);
        let initial_state = self
            .specimens
            .get(name)
            .map(|s| s.initial_state.clone())
            .unwrap_or_default();

        let checkpoint = self.checkpoint();
        match self.init_instance(name, address, caller, &initial_state, ctor.as_ref(), &opts) {
            Ok(()) => {
                self.state.block += 1;
                info!("deployed {} at {}", name, address);
                Ok(address)
            }
            Err(err) => {
                self.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Record the instance, seed its declared field defaults, credit any
    /// attached value and run the constructor
    fn init_instance(
        &mut self,
        name: &str,
        address: Address,
        caller: Address,
        initial_state: &serde_json::Map<String, serde_json::Value>,
        ctor: Option<&crate::specimen::Constructor>,
        opts: &DeployOpts,
    ) -> SimResult<()> {
        self.state.instances.insert(
            address,
            DeployedInstance {
                address,
                specimen: name.to_string(),
                deployer: caller,
                deployed_at_block: self.state.block,
                deployed_at_time: self.state.clock,
            },
        );
        for (field, default) in initial_state {
            self.state
                .store
                .set(&StorageKey::field(address, field), default.clone());
        }
        if opts.value > 0 {
            self.move_value(caller, address, opts.value);
        }
        if let Some(c) = ctor {
            let mut env = CallEnv {
                chain: self,
                frame: Frame {
                    caller,
                    this: address,
                    value: opts.value,
                },
            };
            (c.handler)(&mut env, &opts.args)?;
        }
        Ok(())
    }

    /// Invoke an operation with the default caller and no attached value
    pub fn call(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
    ) -> SimResult<CallOutcome> {
        self.call_with(addr, op, args, CallOpts::default())
    }

    /// Invoke an operation on a deployed instance.
    ///
    /// On success the outcome carries the return value and every event
    /// committed by the call (nested calls included). On any error the chain
    /// is exactly as it was before the call.
    pub fn call_with(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
        opts: CallOpts,
    ) -> SimResult<CallOutcome> {
        let caller = opts.caller.unwrap_or_else(Self::default_caller);
        if opts.value > 0 && self.balance_of(caller) < opts.value {
            return Err(SimError::InsufficientBalance {
                caller: caller.to_string(),
                needed: opts.value,
                available: self.balance_of(caller),
            });
        }

        let kind = self.op_kind(addr, op)?;
        let checkpoint = self.checkpoint();
        let log_start = self.state.log.len();

        match self.invoke_frame(caller, addr, op, args, opts.value) {
            Ok(value) => {
                if kind == OpKind::View {
                    // Views return a value but commit nothing.
                    self.rollback(checkpoint);
                    Ok(CallOutcome::new(value))
                } else {
                    let events = self.state.log[log_start..]
                        .iter()
                        .map(|r| r.event.clone())
                        .collect();
                    self.state.block += 1;
                    Ok(CallOutcome { value, events })
                }
            }
            Err(err) => {
                self.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Look up the kind of an operation, validating instance and specimen
    fn op_kind(&self, addr: Address, op: &str) -> SimResult<OpKind> {
        let instance = self
            .state
            .instances
            .get(&addr)
            .ok_or_else(|| SimError::InstanceNotFound(addr.to_string()))?;
        let specimen = self
            .specimens
            .get(&instance.specimen)
            .ok_or_else(|| SimError::SpecimenNotFound(instance.specimen.clone()))?;
        let operation = specimen.op(op).ok_or_else(|| SimError::OperationNotFound {
            specimen: specimen.name.clone(),
            op: op.to_string(),
        })?;
        Ok(operation.kind)
    }

    /// Run one call frame. Shared by top-level calls and nested
    /// cross-contract calls; rollback on failure is the caller's job.
    fn invoke_frame(
        &mut self,
        caller: Address,
        target: Address,
        op: &str,
        args: &[serde_json::Value],
        value: u64,
    ) -> SimResult<serde_json::Value> {
        let instance = self
            .state
            .instances
            .get(&target)
            .ok_or_else(|| SimError::InstanceNotFound(target.to_string()))?;
        let specimen_name = instance.specimen.clone();
        let specimen = self
            .specimens
            .get(&specimen_name)
            .ok_or_else(|| SimError::SpecimenNotFound(specimen_name.clone()))?;
        let operation = specimen.op(op).ok_or_else(|| SimError::OperationNotFound {
            specimen: specimen_name.clone(),
            op: op.to_string(),
        })?;

        check_args(&operation.params, args)?;
        if value > 0 && !operation.is_payable() {
            return Err(SimError::revert(format!(
                "{specimen_name}.{op} is not payable"
            )));
        }

        let handler = operation.handler;
        debug!("calling {}.{} with {:?}", specimen_name, op, args);

        if value > 0 {
            self.move_value(caller, target, value);
        }

        let mut env = CallEnv {
            chain: self,
            frame: Frame {
                caller,
                this: target,
                value,
            },
        };
        handler(&mut env, args)
    }

    /// Derive the next instance address from the deploy nonce
    fn next_instance_address(&mut self, name: &str) -> Address {
        let nonce = self.state.deploy_nonce;
        self.state.deploy_nonce += 1;

        let mut hasher = Sha256::new();
        hasher.update(b"chainlab_instance:");
        hasher.update(name.as_bytes());
        hasher.update(nonce.to_le_bytes());
        Address::from_bytes(hasher.finalize().into())
    }

    /// Move value between accounts; balances must have been checked
    fn move_value(&mut self, from: Address, to: Address, amount: u64) {
        let src = self.state.balances.entry(from).or_insert(0);
        *src = src.saturating_sub(amount);
        *self.state.balances.entry(to).or_insert(0) += amount;
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            store: self.state.store.snapshot(),
            balances: self.state.balances.clone(),
            instances: self.state.instances.clone(),
            log_len: self.state.log.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.state.store.restore(checkpoint.store);
        self.state.balances = checkpoint.balances;
        self.state.instances = checkpoint.instances;
        self.state.log.truncate(checkpoint.log_len);
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// What a handler sees while executing: the current frame plus typed access
/// to the instance's storage, the ledger, the clock and the event log.
pub struct CallEnv<'a> {
    chain: &'a mut Chain,
    frame: Frame,
}

impl CallEnv<'_> {
    /// Calling account (or calling instance, for nested calls)
    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    /// Address of the executing instance
    pub fn this(&self) -> Address {
        self.frame.this
    }

    /// Value attached to this frame
    pub fn value(&self) -> u64 {
        self.frame.value
    }

    /// Current chain time
    pub fn now(&self) -> u64 {
        self.chain.state.clock
    }

    /// Current block height
    pub fn block(&self) -> u64 {
        self.chain.state.block
    }

    /// Revert unless `cond` holds
    pub fn require(&self, cond: bool, reason: &str) -> SimResult<()> {
        if cond {
            Ok(())
        } else {
            Err(SimError::revert(reason))
        }
    }

    /// Read a state field of this instance
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> SimResult<Option<T>> {
        self.chain
            .state
            .store
            .get(&StorageKey::field(self.frame.this, field))
            .map(|v| serde_json::from_value(v).map_err(SimError::from))
            .transpose()
    }

    /// Read a state field, falling back to `default` if unset
    pub fn get_or<T: DeserializeOwned>(&self, field: &str, default: T) -> SimResult<T> {
        Ok(self.get(field)?.unwrap_or(default))
    }

    /// Write a state field of this instance
    pub fn set<T: Serialize>(&mut self, field: &str, value: &T) -> SimResult<()> {
        let json = serde_json::to_value(value)?;
        self.chain
            .state
            .store
            .set(&StorageKey::field(self.frame.this, field), json);
        Ok(())
    }

    /// Delete a state field of this instance
    pub fn remove(&mut self, field: &str) {
        self.chain
            .state
            .store
            .remove(&StorageKey::field(self.frame.this, field));
    }

    /// Read one entry of a mapping-like field; `None` for unwritten keys
    pub fn map_get<T: DeserializeOwned>(&self, map: &str, key: &str) -> SimResult<Option<T>> {
        self.chain
            .state
            .store
            .get(&StorageKey::entry(self.frame.this, map, key))
            .map(|v| serde_json::from_value(v).map_err(SimError::from))
            .transpose()
    }

    /// Write one entry of a mapping-like field
    pub fn map_set<T: Serialize>(&mut self, map: &str, key: &str, value: &T) -> SimResult<()> {
        let json = serde_json::to_value(value)?;
        self.chain
            .state
            .store
            .set(&StorageKey::entry(self.frame.this, map, key), json);
        Ok(())
    }

    /// Delete one entry of a mapping-like field
    pub fn map_remove(&mut self, map: &str, key: &str) {
        self.chain
            .state
            .store
            .remove(&StorageKey::entry(self.frame.this, map, key));
    }

    /// Balance of any address
    pub fn balance(&self, addr: Address) -> u64 {
        self.chain.balance_of(addr)
    }

    /// Send value from this instance; reverts if the instance cannot cover it
    pub fn send(&mut self, to: Address, amount: u64) -> SimResult<()> {
        let held = self.chain.balance_of(self.frame.this);
        if held < amount {
            return Err(SimError::revert(format!(
                "insufficient contract balance: holds {held}, sending {amount}"
            )));
        }
        self.chain.move_value(self.frame.this, to, amount);
        Ok(())
    }

    /// Emit an event from this instance
    pub fn emit(&mut self, event: Event) {
        let seq = self.chain.state.log.len() as u64;
        self.chain.state.log.push(EventRecord {
            seq,
            block: self.chain.state.block,
            address: self.frame.this,
            event,
        });
    }

    /// Call an operation on another instance; the callee sees this instance
    /// as its caller, and a callee revert propagates (and, unless caught,
    /// rolls back the whole transaction)
    pub fn call_contract(
        &mut self,
        target: Address,
        op: &str,
        args: &[serde_json::Value],
    ) -> SimResult<serde_json::Value> {
        let caller = self.frame.this;
        self.chain.invoke_frame(caller, target, op, args, 0)
    }

    /// Like [`CallEnv::call_contract`] but attaching value from this instance
    pub fn call_contract_value(
        &mut self,
        target: Address,
        op: &str,
        args: &[serde_json::Value],
        value: u64,
    ) -> SimResult<serde_json::Value> {
        let held = self.chain.balance_of(self.frame.this);
        if held < value {
            return Err(SimError::revert(format!(
                "insufficient contract balance: holds {held}, sending {value}"
            )));
        }
        let caller = self.frame.this;
        self.chain.invoke_frame(caller, target, op, args, value)
    }
}
