//! Enums
//!
//! A closed set of states stored as a small integer, with every transition
//! checked: codes outside the set revert instead of being stored.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "shipping";

/// Order status; the stored representation is the discriminant code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Shipped,
    Accepted,
    Rejected,
    Canceled,
}

impl Status {
    /// Decode from the stored code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Status::Pending),
            1 => Some(Status::Shipped),
            2 => Some(Status::Accepted),
            3 => Some(Status::Rejected),
            4 => Some(Status::Canceled),
            _ => None,
        }
    }

    /// Stored code
    pub fn code(self) -> u64 {
        match self {
            Status::Pending => 0,
            Status::Shipped => 1,
            Status::Accepted => 2,
            Status::Rejected => 3,
            Status::Canceled => 4,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Shipped => "shipped",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
            Status::Canceled => "canceled",
        }
    }
}

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("a checked enumeration of order states")
        .state(json!({"status": 0}))
        .view("status", vec![], status)
        .view("label", vec![], label)
        .mutate("set_status", vec![Param::uint("code")], set_status)
        .mutate("cancel", vec![], cancel)
        .mutate("reset", vec![], reset)
        .build()
}

fn current(env: &CallEnv<'_>) -> SimResult<Status> {
    let code: u64 = env.get_or("status", 0)?;
    Status::from_code(code).ok_or_else(|| SimError::revert("corrupt status code"))
}

fn status(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(current(env)?.code()))
}

fn label(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(current(env)?.label()))
}

fn set_status(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let code = args::uint(args, 0)?;
    let status = Status::from_code(code).ok_or_else(|| SimError::revert("invalid status code"))?;
    env.set("status", &status.code())?;
    Ok(serde_json::Value::Null)
}

fn cancel(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    env.set("status", &Status::Canceled.code())?;
    Ok(serde_json::Value::Null)
}

fn reset(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    env.set("status", &Status::Pending.code())?;
    Ok(serde_json::Value::Null)
}
