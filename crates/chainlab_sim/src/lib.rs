//! # chainlab_sim - In-Memory Chain Simulator and Test Harness
//!
//! The execution engine behind the chainlab study guide:
//! - Specimen definitions: named contract templates with typed constructor
//!   parameters and typed public operations
//! - Deterministic execution: per-instance storage, a balance ledger, an
//!   explicitly advanceable clock and an ordered event log
//! - Revert semantics: any guard failure rolls back every state change of
//!   the invocation
//!
//! ## Defining a specimen
//!
//! ```rust
//! use chainlab_sim::prelude::*;
//! use serde_json::json;
//!
//! let counter = Specimen::builder("counter")
//!     .state(json!({"count": 0}))
//!     .view("count", vec![], |env, _| Ok(json!(env.get_or::<u64>("count", 0)?)))
//!     .mutate("increment", vec![], |env, _| {
//!         let count: u64 = env.get_or("count", 0)?;
//!         env.set("count", &(count + 1))?;
//!         Ok(json!(count + 1))
//!     })
//!     .build();
//! ```
//!
//! ## Deploying and invoking
//!
//! ```rust
//! # use chainlab_sim::prelude::*;
//! # use serde_json::json;
//! # let counter = Specimen::builder("counter")
//! #     .state(json!({"count": 0}))
//! #     .mutate("increment", vec![], |env, _| {
//! #         let count: u64 = env.get_or("count", 0)?;
//! #         env.set("count", &(count + 1))?;
//! #         Ok(json!(count + 1))
//! #     })
//! #     .build();
//! let mut chain = Chain::new();
//! chain.register(counter);
//!
//! let addr = chain.deploy("counter").unwrap();
//! let outcome = chain.call(addr, "increment", &[]).unwrap();
//! assert_eq!(outcome.value, json!(1));
//! ```

pub mod chain;
pub mod error;
pub mod harness;
pub mod specimen;
pub mod storage;
pub mod types;

pub mod prelude {
    //! Commonly used types and helpers
    pub use crate::chain::{
        CallEnv, CallOpts, Chain, DeployOpts, DeployedInstance, GENESIS_TIMESTAMP,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::harness::{expect_eq, expect_revert, Bench, ACCOUNT_ENDOWMENT};
    pub use crate::specimen::{args, OpKind, Param, ParamType, Specimen, SpecimenBuilder};
    pub use crate::types::{Address, CallOutcome, Event, EventRecord};
}

pub use prelude::*;
