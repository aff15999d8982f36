//! State variables and their declared defaults
//!
//! The `.state(...)` block plays the role of field initializers: every
//! declared field reads back at its literal default right after deployment,
//! before any operation has run.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "hello_world";

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("state variables with literal defaults")
        .state(json!({
            "greeting": "Example 1",
            "count": 0,
            "active": true,
        }))
        .view("greeting", vec![], greeting)
        .view("count", vec![], count)
        .view("active", vec![], active)
        .mutate("set_greeting", vec![Param::str("greeting")], set_greeting)
        .build()
}

fn greeting(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("greeting", String::new())?))
}

fn count(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<u64>("count", 0)?))
}

fn active(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<bool>("active", false)?))
}

fn set_greeting(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let greeting = args::string(args, 0)?;
    env.set("greeting", &greeting)?;
    Ok(serde_json::Value::Null)
}
