//! Time-based access
//!
//! Funds deposited at deploy time stay locked until a threshold on the
//! simulated clock. Withdrawing early reverts; advancing the clock with
//! `warp` makes the same call succeed, deterministically.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "time_lock";

/// One week, the customary lock delay in the examples
pub const ONE_WEEK: u64 = 7 * 24 * 60 * 60;

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("withdrawal gated on the simulated clock")
        .payable_constructor(vec![Param::uint("delay")], construct)
        .view("unlock_at", vec![], unlock_at)
        .view("locked", vec![], locked)
        .payable("deposit", vec![], deposit)
        .mutate("withdraw", vec![], withdraw)
        .build()
}

fn construct(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let delay = args::uint(args, 0)?;
    let unlock_at = env
        .now()
        .checked_add(delay)
        .ok_or_else(|| SimError::revert("delay too large"))?;
    env.set("owner", &env.caller().to_hex())?;
    env.set("unlock_at", &unlock_at)?;
    Ok(serde_json::Value::Null)
}

fn unlock_at(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("unlock_at", 0)?))
}

fn locked(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let unlock_at: u64 = env.get_or("unlock_at", 0)?;
    Ok(json!(env.now() < unlock_at))
}

fn deposit(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    env.require(env.value() > 0, "deposit requires value")?;
    Ok(json!(env.balance(env.this())))
}

fn withdraw(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let owner: String = env.get_or("owner", String::new())?;
    env.require(env.caller().to_hex() == owner, "caller is not the owner")?;

    let unlock_at: u64 = env.get_or("unlock_at", 0)?;
    env.require(env.now() >= unlock_at, "still locked")?;

    let held = env.balance(env.this());
    let to = env.caller();
    env.send(to, held)?;
    Ok(json!(held))
}
