//! Error handling
//!
//! `require`-style guards and explicit reverts. A revert aborts the whole
//! invocation: every write made before the failing guard is rolled back.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "strict_ledger";

/// Hard ceiling on the total the ledger will account for
pub const CAP: u64 = 1000;

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("require guards and rollback on failure")
        .state(json!({"total": 0, "entries": 0}))
        .view("total", vec![], total)
        .view("entries", vec![], entries)
        .mutate("record", vec![Param::uint("amount")], record)
        .mutate("erase", vec![Param::uint("amount")], erase)
        .build()
}

fn total(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("total", 0)?))
}

fn entries(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("entries", 0)?))
}

fn record(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let amount = args::uint(args, 0)?;
    env.require(amount > 0, "amount must be positive")?;

    // Bump the entry count first: if the cap check below fails, this
    // write must vanish with the revert.
    let entries: u64 = env.get_or("entries", 0)?;
    env.set("entries", &(entries + 1))?;

    let total: u64 = env.get_or("total", 0)?;
    let next = total
        .checked_add(amount)
        .ok_or_else(|| SimError::revert("cap exceeded"))?;
    env.require(next <= CAP, "cap exceeded")?;
    env.set("total", &next)?;
    Ok(json!(next))
}

fn erase(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let amount = args::uint(args, 0)?;
    let total: u64 = env.get_or("total", 0)?;
    env.require(amount <= total, "nothing to erase")?;
    env.set("total", &(total - amount))?;
    Ok(json!(total - amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_record_within_cap() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();

        let outcome = bench.call(addr, "record", &[json!(400)]).unwrap();
        assert_eq!(outcome.value, json!(400));
        bench.assert_view(addr, "entries", &[], json!(1)).unwrap();
    }

    #[test]
    fn test_zero_amount_reverts() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();

        let reason = expect_revert(bench.call(addr, "record", &[json!(0)])).unwrap();
        assert_eq!(reason, "amount must be positive");
    }

    #[test]
    fn test_failed_guard_rolls_back_earlier_writes() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();
        bench.call(addr, "record", &[json!(900)]).unwrap();

        let reason = expect_revert(bench.call(addr, "record", &[json!(200)])).unwrap();
        assert_eq!(reason, "cap exceeded");

        // The entry-count bump made before the failing check is gone.
        bench.assert_view(addr, "entries", &[], json!(1)).unwrap();
        bench.assert_view(addr, "total", &[], json!(900)).unwrap();
    }

    #[test]
    fn test_huge_amount_reverts_instead_of_overflowing() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();
        bench.call(addr, "record", &[json!(500)]).unwrap();

        // total + amount would wrap past u64::MAX; that is still just a
        // cap failure, rolled back like any other.
        let reason =
            expect_revert(bench.call(addr, "record", &[json!(u64::MAX - 499)])).unwrap();
        assert_eq!(reason, "cap exceeded");
        bench.assert_view(addr, "total", &[], json!(500)).unwrap();
        bench.assert_view(addr, "entries", &[], json!(1)).unwrap();
    }

    #[test]
    fn test_erase_guard() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();
        bench.call(addr, "record", &[json!(100)]).unwrap();

        let reason = expect_revert(bench.call(addr, "erase", &[json!(500)])).unwrap();
        assert_eq!(reason, "nothing to erase");

        bench.call(addr, "erase", &[json!(100)]).unwrap();
        bench.assert_view(addr, "total", &[], json!(0)).unwrap();
    }
}
