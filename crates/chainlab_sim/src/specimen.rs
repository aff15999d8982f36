//! Specimen definition and builder
//!
//! A specimen is a named contract template: typed constructor parameters,
//! typed public operations and a declared initial state. Deploying a
//! specimen produces an independent instance with its own storage.

use std::collections::HashMap;

use crate::chain::CallEnv;
use crate::error::{SimError, SimResult};
use crate::types::Address;

/// Handler executing one operation against a call environment
pub type OpHandler = fn(&mut CallEnv<'_>, &[serde_json::Value]) -> SimResult<serde_json::Value>;

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Unsigned integer
    Uint,
    /// Boolean
    Bool,
    /// String
    Str,
    /// Address (hex string on the wire)
    Addr,
    /// Arbitrary JSON payload
    Json,
}

impl ParamType {
    fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            ParamType::Uint => value.is_u64(),
            ParamType::Bool => value.is_boolean(),
            ParamType::Str => value.is_string(),
            ParamType::Addr => value
                .as_str()
                .is_some_and(|s| Address::from_hex(s).is_ok()),
            ParamType::Json => true,
        }
    }
}

/// Typed parameter of an operation or constructor
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: ParamType,
}

impl Param {
    /// Create new parameter
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Unsigned integer parameter
    pub fn uint(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Uint)
    }

    /// Boolean parameter
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Bool)
    }

    /// String parameter
    pub fn str(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Str)
    }

    /// Address parameter
    pub fn addr(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Addr)
    }

    /// Untyped JSON parameter
    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Json)
    }
}

/// Check arguments against declared parameters
pub fn check_args(params: &[Param], args: &[serde_json::Value]) -> SimResult<()> {
    if params.len() != args.len() {
        return Err(SimError::InvalidArguments(format!(
            "expected {} argument(s), got {}",
            params.len(),
            args.len()
        )));
    }
    for (param, arg) in params.iter().zip(args) {
        if !param.ty.matches(arg) {
            return Err(SimError::InvalidArguments(format!(
                "parameter '{}' expects {:?}, got {}",
                param.name, param.ty, arg
            )));
        }
    }
    Ok(())
}

/// Operation mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Read-only; any writes are discarded
    View,
    /// State-mutating
    Mutate,
    /// State-mutating and able to receive attached value
    Payable,
}

/// Public operation of a specimen
#[derive(Debug, Clone)]
pub struct Operation {
    /// Operation name
    pub name: String,
    /// Declared parameters
    pub params: Vec<Param>,
    /// Mutability
    pub kind: OpKind,
    /// Handler
    pub handler: OpHandler,
}

impl Operation {
    /// Check if read-only
    pub fn is_view(&self) -> bool {
        self.kind == OpKind::View
    }

    /// Check if the operation can receive attached value
    pub fn is_payable(&self) -> bool {
        self.kind == OpKind::Payable
    }
}

/// Constructor of a specimen, run once at deploy time
#[derive(Debug, Clone)]
pub struct Constructor {
    /// Declared parameters
    pub params: Vec<Param>,
    /// True if deployment may carry attached value
    pub payable: bool,
    /// Handler
    pub handler: OpHandler,
}

/// Contract template: name, initial state, constructor and operations
#[derive(Debug, Clone)]
pub struct Specimen {
    /// Specimen name (its identity in the registry)
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// Declared field defaults, written to storage before the constructor runs
    pub initial_state: serde_json::Map<String, serde_json::Value>,
    /// Optional constructor
    pub constructor: Option<Constructor>,
    /// Public operations by name
    pub ops: HashMap<String, Operation>,
}

impl Specimen {
    /// Start building a specimen
    pub fn builder(name: impl Into<String>) -> SpecimenBuilder {
        SpecimenBuilder::new(name)
    }

    /// Get operation by name
    pub fn op(&self, name: &str) -> Option<&Operation> {
        self.ops.get(name)
    }

    /// Check if the specimen declares an operation
    pub fn has_op(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }
}

/// Builder for specimens
pub struct SpecimenBuilder {
    name: String,
    description: Option<String>,
    initial_state: serde_json::Map<String, serde_json::Value>,
    constructor: Option<Constructor>,
    ops: HashMap<String, Operation>,
}

impl SpecimenBuilder {
    /// Create new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            initial_state: serde_json::Map::new(),
            constructor: None,
            ops: HashMap::new(),
        }
    }

    /// Set description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Declare field defaults; must be a JSON object. Later declarations
    /// override earlier (and inherited) ones.
    pub fn state(mut self, defaults: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = defaults {
            for (key, value) in map {
                self.initial_state.insert(key, value);
            }
        }
        self
    }

    /// Set constructor
    pub fn constructor(mut self, params: Vec<Param>, handler: OpHandler) -> Self {
        self.constructor = Some(Constructor {
            params,
            payable: false,
            handler,
        });
        self
    }

    /// Set payable constructor
    pub fn payable_constructor(mut self, params: Vec<Param>, handler: OpHandler) -> Self {
        self.constructor = Some(Constructor {
            params,
            payable: true,
            handler,
        });
        self
    }

    fn op(mut self, name: &str, params: Vec<Param>, kind: OpKind, handler: OpHandler) -> Self {
        self.ops.insert(
            name.to_string(),
            Operation {
                name: name.to_string(),
                params,
                kind,
                handler,
            },
        );
        self
    }

    /// Add a read-only operation
    pub fn view(self, name: &str, params: Vec<Param>, handler: OpHandler) -> Self {
        self.op(name, params, OpKind::View, handler)
    }

    /// Add a state-mutating operation
    pub fn mutate(self, name: &str, params: Vec<Param>, handler: OpHandler) -> Self {
        self.op(name, params, OpKind::Mutate, handler)
    }

    /// Add a payable operation
    pub fn payable(self, name: &str, params: Vec<Param>, handler: OpHandler) -> Self {
        self.op(name, params, OpKind::Payable, handler)
    }

    /// Inherit a parent specimen: copies its field defaults, constructor and
    /// operations. Anything declared afterwards overrides the parent's.
    pub fn inherit(mut self, parent: &Specimen) -> Self {
        for (key, value) in &parent.initial_state {
            self.initial_state.insert(key.clone(), value.clone());
        }
        if self.constructor.is_none() {
            self.constructor = parent.constructor.clone();
        }
        for (name, op) in &parent.ops {
            self.ops.entry(name.clone()).or_insert_with(|| op.clone());
        }
        self
    }

    /// Build the specimen
    pub fn build(self) -> Specimen {
        Specimen {
            name: self.name,
            description: self.description,
            initial_state: self.initial_state,
            constructor: self.constructor,
            ops: self.ops,
        }
    }
}

/// Typed argument extractors for handlers.
///
/// Dispatch has already checked arity and types against the declared
/// parameters, so these only fail on harness bugs.
pub mod args {
    use super::*;

    fn arg<'a>(args: &'a [serde_json::Value], idx: usize) -> SimResult<&'a serde_json::Value> {
        args.get(idx)
            .ok_or_else(|| SimError::InvalidArguments(format!("missing argument {idx}")))
    }

    /// Extract an unsigned integer argument
    pub fn uint(args: &[serde_json::Value], idx: usize) -> SimResult<u64> {
        arg(args, idx)?
            .as_u64()
            .ok_or_else(|| SimError::InvalidArguments(format!("argument {idx} is not a uint")))
    }

    /// Extract a boolean argument
    pub fn boolean(args: &[serde_json::Value], idx: usize) -> SimResult<bool> {
        arg(args, idx)?
            .as_bool()
            .ok_or_else(|| SimError::InvalidArguments(format!("argument {idx} is not a bool")))
    }

    /// Extract a string argument
    pub fn string(args: &[serde_json::Value], idx: usize) -> SimResult<String> {
        Ok(arg(args, idx)?
            .as_str()
            .ok_or_else(|| SimError::InvalidArguments(format!("argument {idx} is not a string")))?
            .to_string())
    }

    /// Extract an address argument
    pub fn address(args: &[serde_json::Value], idx: usize) -> SimResult<Address> {
        let s = string(args, idx)?;
        Address::from_hex(&s)
            .map_err(|_| SimError::InvalidArguments(format!("argument {idx} is not an address")))
    }

    /// Extract an arbitrary JSON argument
    pub fn json(args: &[serde_json::Value], idx: usize) -> SimResult<serde_json::Value> {
        Ok(arg(args, idx)?.clone())
    }
}
