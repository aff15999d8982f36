//! Constructors
//!
//! Deploy-time arguments set initial state, and a guard inside the
//! constructor can reject a deployment outright: nothing of the failed
//! deploy remains observable.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "titled";

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("constructor arguments and deploy-time rejection")
        .constructor(vec![Param::str("title")], construct)
        .view("title", vec![], title)
        .view("owner", vec![], owner)
        .build()
}

fn construct(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let title = args::string(args, 0)?;
    env.require(!title.is_empty(), "title must not be empty")?;
    env.set("title", &title)?;
    env.set("owner", &env.caller().to_hex())?;
    Ok(serde_json::Value::Null)
}

fn title(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("title", String::new())?))
}

fn owner(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("owner", String::new())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_constructor_sets_title_and_owner() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench
            .deploy_with(
                NAME,
                DeployOpts::args(vec![json!("My First Contract")]).caller(alice),
            )
            .unwrap();

        bench
            .assert_view(addr, "title", &[], json!("My First Contract"))
            .unwrap();
        bench
            .assert_view(addr, "owner", &[], json!(alice.to_hex()))
            .unwrap();
    }

    #[test]
    fn test_empty_title_rejected_at_deploy() {
        let mut bench = bench();
        let err = bench
            .deploy_with(NAME, DeployOpts::args(vec![json!("")]))
            .unwrap_err();
        assert!(err.is_revert());
    }

    #[test]
    fn test_missing_arguments_are_a_harness_error() {
        let mut bench = bench();
        let err = bench.deploy(NAME).unwrap_err();
        assert!(matches!(err, SimError::InvalidArguments(_)));
        assert!(!err.is_revert());
    }

    #[test]
    fn test_wrong_argument_type_is_a_harness_error() {
        let mut bench = bench();
        let err = bench
            .deploy_with(NAME, DeployOpts::args(vec![json!(42)]))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArguments(_)));
    }
}
