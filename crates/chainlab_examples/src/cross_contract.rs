//! Cross-contract interaction
//!
//! One instance invoking an operation on another by address. The callee
//! sees the calling instance as its caller, and a callee revert aborts
//! the caller's whole invocation, including the caller's own writes.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of the callee specimen
pub const CELL: &str = "kv_cell";
/// Registry name of the caller specimen
pub const PROXY: &str = "kv_proxy";

/// Largest value the cell accepts
pub const CELL_MAX: u64 = 100;

/// Both sides of the interaction
pub fn specimens() -> Vec<Specimen> {
    vec![cell(), proxy()]
}

fn cell() -> Specimen {
    Specimen::builder(CELL)
        .description("a bounded single-value cell")
        .state(json!({"value": 0}))
        .view("value", vec![], cell_value)
        .view("last_writer", vec![], cell_last_writer)
        .mutate("put", vec![Param::uint("value")], cell_put)
        .build()
}

fn proxy() -> Specimen {
    Specimen::builder(PROXY)
        .description("writes into a cell it holds the address of")
        .constructor(vec![Param::addr("target")], proxy_construct)
        .state(json!({"writes": 0}))
        .view("writes", vec![], proxy_writes)
        .view("read", vec![], proxy_read)
        .mutate("write", vec![Param::uint("value")], proxy_write)
        .build()
}

fn cell_value(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("value", 0)?))
}

fn cell_last_writer(
    env: &mut CallEnv<'_>,
    _args: &[serde_json::Value],
) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("last_writer", String::new())?))
}

fn cell_put(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let value = args::uint(args, 0)?;
    env.require(value <= CELL_MAX, "value out of bounds")?;
    env.set("value", &value)?;
    env.set("last_writer", &env.caller().to_hex())?;
    Ok(serde_json::Value::Null)
}

fn proxy_construct(
    env: &mut CallEnv<'_>,
    args: &[serde_json::Value],
) -> SimResult<serde_json::Value> {
    let target = args::address(args, 0)?;
    env.set("target", &target.to_hex())?;
    Ok(serde_json::Value::Null)
}

fn proxy_target(env: &CallEnv<'_>) -> SimResult<Address> {
    let hex: String = env.get_or("target", String::new())?;
    Address::from_hex(&hex).map_err(|_| SimError::revert("proxy has no valid target"))
}

fn proxy_writes(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("writes", 0)?))
}

fn proxy_read(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let target = proxy_target(env)?;
    env.call_contract(target, "value", &[])
}

fn proxy_write(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let value = args::uint(args, 0)?;
    let writes: u64 = env.get_or("writes", 0)?;
    env.set("writes", &(writes + 1))?;

    let target = proxy_target(env)?;
    env.call_contract(target, "put", &[json!(value)])?;
    Ok(json!(writes + 1))
}
