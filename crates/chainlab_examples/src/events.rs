//! Events
//!
//! Operations announce what happened by emitting events. The chain keeps
//! every committed emission in order; indexed fields can be filtered on
//! when querying the log afterwards.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "message_board";

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("event emission, ordering and indexed filtering")
        .mutate("say", vec![Param::str("message")], say)
        .mutate(
            "transfer",
            vec![Param::addr("to"), Param::uint("amount")],
            transfer,
        )
        .build()
}

fn say(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let message = args::string(args, 0)?;
    let sender = env.caller().to_hex();
    env.emit(
        Event::new("Log", json!({"sender": sender, "message": message})).indexed("sender"),
    );
    Ok(serde_json::Value::Null)
}

fn transfer(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let to = args::address(args, 0)?;
    let amount = args::uint(args, 1)?;
    let from = env.caller().to_hex();
    env.emit(
        Event::new(
            "Transfer",
            json!({"from": from, "to": to.to_hex(), "amount": amount}),
        )
        .indexed("from")
        .indexed("to"),
    );
    Ok(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_events_come_back_in_emission_order() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();

        bench.call(addr, "say", &[json!("first")]).unwrap();
        bench.call(addr, "say", &[json!("second")]).unwrap();
        bench.call(addr, "say", &[json!("third")]).unwrap();

        let logs = bench.chain().events("Log");
        assert_eq!(logs.len(), 3);
        let messages: Vec<_> = logs
            .iter()
            .map(|r| r.event.data["message"].clone())
            .collect();
        assert_eq!(messages, vec![json!("first"), json!("second"), json!("third")]);
    }

    #[test]
    fn test_filter_by_indexed_sender() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let bob = bench.account("bob");
        let addr = bench.deploy(NAME).unwrap();

        bench
            .call_with(addr, "say", &[json!("hi")], CallOpts::caller(alice))
            .unwrap();
        bench
            .call_with(addr, "say", &[json!("yo")], CallOpts::caller(bob))
            .unwrap();
        bench
            .call_with(addr, "say", &[json!("bye")], CallOpts::caller(alice))
            .unwrap();

        let from_alice = bench
            .chain()
            .events_by("Log", "sender", &json!(alice.to_hex()));
        assert_eq!(from_alice.len(), 2);
        assert_eq!(from_alice[0].event.data["message"], json!("hi"));
        assert_eq!(from_alice[1].event.data["message"], json!("bye"));
    }

    #[test]
    fn test_non_indexed_field_does_not_filter() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();
        bench.call(addr, "say", &[json!("hello")]).unwrap();

        let matches = bench.chain().events_by("Log", "message", &json!("hello"));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_transfer_filters_on_either_side() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let bob = bench.account("bob");
        let carol = bench.account("carol");
        let addr = bench.deploy(NAME).unwrap();

        bench
            .call_with(
                addr,
                "transfer",
                &[json!(bob.to_hex()), json!(10)],
                CallOpts::caller(alice),
            )
            .unwrap();
        bench
            .call_with(
                addr,
                "transfer",
                &[json!(carol.to_hex()), json!(20)],
                CallOpts::caller(alice),
            )
            .unwrap();

        let to_bob = bench
            .chain()
            .events_by("Transfer", "to", &json!(bob.to_hex()));
        assert_eq!(to_bob.len(), 1);
        assert_eq!(to_bob[0].event.data["amount"], json!(10));

        let from_alice = bench
            .chain()
            .events_by("Transfer", "from", &json!(alice.to_hex()));
        assert_eq!(from_alice.len(), 2);
    }

    #[test]
    fn test_call_outcome_carries_events() {
        let mut bench = bench();
        let addr = bench.deploy(NAME).unwrap();

        let outcome = bench.call(addr, "say", &[json!("hello")]).unwrap();
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].name, "Log");
    }
}
