//! Functions
//!
//! Read-only operations return a value without touching state; mutating
//! operations change it; a failed guard inside a mutating operation
//! reverts and leaves state exactly as it was.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "counter";

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("view and mutate operations on a counter")
        .state(json!({"count": 0}))
        .view("count", vec![], count)
        .mutate("increment", vec![], increment)
        .mutate("decrement", vec![], decrement)
        .mutate("add", vec![Param::uint("n")], add)
        .build()
}

fn count(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("count", 0)?))
}

fn increment(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let count: u64 = env.get_or("count", 0)?;
    let next = count
        .checked_add(1)
        .ok_or_else(|| SimError::revert("counter overflow"))?;
    env.set("count", &next)?;
    Ok(json!(next))
}

fn decrement(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let count: u64 = env.get_or("count", 0)?;
    env.require(count > 0, "counter underflow")?;
    env.set("count", &(count - 1))?;
    Ok(json!(count - 1))
}

fn add(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let n = args::uint(args, 0)?;
    let count: u64 = env.get_or("count", 0)?;
    let next = count
        .checked_add(n)
        .ok_or_else(|| SimError::revert("counter overflow"))?;
    env.set("count", &next)?;
    Ok(json!(next))
}
