//! Mappings
//!
//! A mapping-like field stores one value per key. Keys never written read
//! back as the declared default, never as an error; deleting a key resets
//! it to that default.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "scoreboard";

/// Default score for players never written
const DEFAULT_SCORE: u64 = 0;

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("per-address scores with a declared default")
        .view("score_of", vec![Param::addr("player")], score_of)
        .mutate(
            "set_score",
            vec![Param::addr("player"), Param::uint("score")],
            set_score,
        )
        .mutate("clear_score", vec![Param::addr("player")], clear_score)
        .build()
}

fn score_of(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let player = args::address(args, 0)?;
    let score = env
        .map_get::<u64>("scores", &player.to_hex())?
        .unwrap_or(DEFAULT_SCORE);
    Ok(json!(score))
}

fn set_score(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let player = args::address(args, 0)?;
    let score = args::uint(args, 1)?;
    env.map_set("scores", &player.to_hex(), &score)?;
    Ok(serde_json::Value::Null)
}

fn clear_score(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let player = args::address(args, 0)?;
    env.map_remove("scores", &player.to_hex());
    Ok(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_unwritten_key_reads_default() {
        let mut bench = bench();
        let stranger = bench.account("stranger");
        let addr = bench.deploy(NAME).unwrap();

        bench
            .assert_view(addr, "score_of", &[json!(stranger.to_hex())], json!(0))
            .unwrap();
    }

    #[test]
    fn test_set_then_get() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let bob = bench.account("bob");
        let addr = bench.deploy(NAME).unwrap();

        bench
            .call(addr, "set_score", &[json!(alice.to_hex()), json!(7)])
            .unwrap();
        bench
            .assert_view(addr, "score_of", &[json!(alice.to_hex())], json!(7))
            .unwrap();
        // Other keys are untouched.
        bench
            .assert_view(addr, "score_of", &[json!(bob.to_hex())], json!(0))
            .unwrap();
    }

    #[test]
    fn test_clear_resets_to_default() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench.deploy(NAME).unwrap();

        bench
            .call(addr, "set_score", &[json!(alice.to_hex()), json!(99)])
            .unwrap();
        bench
            .call(addr, "clear_score", &[json!(alice.to_hex())])
            .unwrap();
        bench
            .assert_view(addr, "score_of", &[json!(alice.to_hex())], json!(0))
            .unwrap();
    }

    #[test]
    fn test_non_address_key_is_a_harness_error() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();

        let err = bench
            .call(addr, "score_of", &[json!("not-an-address")])
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArguments(_)));
    }
}
