//! The example harness: deploy, call, assert
//!
//! Thin layer the study guide's tests go through: a chain plus named,
//! pre-funded accounts, and the two assertion helpers that produce the
//! expected failure kinds (`ValueMismatch`, and `Reverted` inspection).

use std::collections::HashSet;

use crate::chain::{CallOpts, Chain, DeployOpts};
use crate::error::{SimError, SimResult};
use crate::types::{Address, CallOutcome};

/// Starting balance of every named account
pub const ACCOUNT_ENDOWMENT: u64 = 1_000_000;

/// Compare an actual value against an expected one
pub fn expect_eq(expected: serde_json::Value, actual: serde_json::Value) -> SimResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimError::ValueMismatch { expected, actual })
    }
}

/// Unwrap an expected revert, returning its reason.
///
/// Fails with `ValueMismatch` if the call succeeded, and passes harness
/// errors through untouched so a mis-wired test never looks like a
/// passing negative path.
pub fn expect_revert(result: SimResult<CallOutcome>) -> SimResult<String> {
    match result {
        Ok(outcome) => Err(SimError::ValueMismatch {
            expected: serde_json::json!("reverted"),
            actual: outcome.value,
        }),
        Err(SimError::Reverted(reason)) => Ok(reason),
        Err(other) => Err(other),
    }
}

/// A chain with named test accounts, pre-funded on first use
pub struct Bench {
    chain: Chain,
    issued: HashSet<String>,
}

impl Bench {
    /// Create a bench around a fresh chain
    pub fn new() -> Self {
        let mut chain = Chain::new();
        chain.fund(Chain::default_caller(), ACCOUNT_ENDOWMENT);
        Self {
            chain,
            issued: HashSet::new(),
        }
    }

    /// Wrap an already-populated chain
    pub fn with_chain(chain: Chain) -> Self {
        Self {
            chain,
            issued: HashSet::new(),
        }
    }

    /// The underlying chain
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// The underlying chain, mutably
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    /// Named test account, endowed the first time the name is issued.
    /// A name keeps its address forever and is never re-funded, even if
    /// it spends its balance down to zero.
    pub fn account(&mut self, name: &str) -> Address {
        let addr = Address::derive(name);
        if self.issued.insert(name.to_string()) {
            self.chain.fund(addr, ACCOUNT_ENDOWMENT);
        }
        addr
    }

    /// Deploy a specimen with no arguments
    pub fn deploy(&mut self, name: &str) -> SimResult<Address> {
        self.chain.deploy(name)
    }

    /// Deploy a specimen with options
    pub fn deploy_with(&mut self, name: &str, opts: DeployOpts) -> SimResult<Address> {
        self.chain.deploy_with(name, opts)
    }

    /// Invoke an operation with the default caller
    pub fn call(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
    ) -> SimResult<CallOutcome> {
        self.chain.call(addr, op, args)
    }

    /// Invoke an operation with options
    pub fn call_with(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
        opts: CallOpts,
    ) -> SimResult<CallOutcome> {
        self.chain.call_with(addr, op, args, opts)
    }

    /// Invoke a read-only operation and return just its value
    pub fn view(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
    ) -> SimResult<serde_json::Value> {
        Ok(self.chain.call(addr, op, args)?.value)
    }

    /// Invoke a read-only operation and assert its value
    pub fn assert_view(
        &mut self,
        addr: Address,
        op: &str,
        args: &[serde_json::Value],
        expected: serde_json::Value,
    ) -> SimResult<()> {
        let actual = self.view(addr, op, args)?;
        expect_eq(expected, actual)
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specimen::Specimen;
    use serde_json::json;

    fn greeter() -> Specimen {
        Specimen::builder("greeter")
            .state(json!({"greeting": "hello"}))
            .view("greet", vec![], |env, _| {
                Ok(json!(env.get_or::<String>("greeting", String::new())?))
            })
            .mutate("grumble", vec![], |env, _| {
                env.require(false, "always grumpy")?;
                Ok(serde_json::Value::Null)
            })
            .build()
    }

    fn sink() -> Specimen {
        Specimen::builder("sink")
            .payable("take", vec![], |_, _| Ok(serde_json::Value::Null))
            .build()
    }

    fn bench() -> Bench {
        let mut bench = Bench::new();
        bench.chain_mut().register(greeter());
        bench.chain_mut().register(sink());
        bench
    }

    #[test]
    fn test_expect_eq() {
        assert!(expect_eq(json!(1), json!(1)).is_ok());

        let err = expect_eq(json!(1), json!(2)).unwrap_err();
        assert!(matches!(err, SimError::ValueMismatch { .. }));
    }

    #[test]
    fn test_accounts_are_endowed_once() {
        let mut bench = bench();
        let alice = bench.account("alice");
        assert_eq!(bench.chain().balance_of(alice), ACCOUNT_ENDOWMENT);

        // Asking again must not mint again.
        let again = bench.account("alice");
        assert_eq!(again, alice);
        assert_eq!(bench.chain().balance_of(alice), ACCOUNT_ENDOWMENT);
    }

    #[test]
    fn test_drained_account_stays_drained() {
        let mut bench = bench();
        let addr = bench.deploy("sink").unwrap();
        let alice = bench.account("alice");

        bench
            .call_with(
                addr,
                "take",
                &[],
                CallOpts::caller(alice).value(ACCOUNT_ENDOWMENT),
            )
            .unwrap();
        assert_eq!(bench.chain().balance_of(alice), 0);

        // Re-issuing the name must not mint a second endowment.
        let again = bench.account("alice");
        assert_eq!(again, alice);
        assert_eq!(bench.chain().balance_of(alice), 0);
    }

    #[test]
    fn test_assert_view() {
        let mut bench = bench();
        let addr = bench.deploy("greeter").unwrap();

        bench
            .assert_view(addr, "greet", &[], json!("hello"))
            .unwrap();

        let err = bench
            .assert_view(addr, "greet", &[], json!("goodbye"))
            .unwrap_err();
        assert!(matches!(err, SimError::ValueMismatch { .. }));
    }

    #[test]
    fn test_expect_revert() {
        let mut bench = bench();
        let addr = bench.deploy("greeter").unwrap();

        let reason = expect_revert(bench.call(addr, "grumble", &[])).unwrap();
        assert_eq!(reason, "always grumpy");

        // A successful call is not a revert.
        let err = expect_revert(bench.call(addr, "greet", &[])).unwrap_err();
        assert!(matches!(err, SimError::ValueMismatch { .. }));

        // Harness errors pass through unchanged.
        let err = expect_revert(bench.call(addr, "no_such_op", &[])).unwrap_err();
        assert!(matches!(err, SimError::OperationNotFound { .. }));
    }
}
