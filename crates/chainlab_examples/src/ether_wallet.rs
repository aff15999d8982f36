//! Ether handling
//!
//! A wallet instance that accepts value through a payable operation and
//! lets only its owner send value back out. Balances live in the chain's
//! ledger, not in contract storage.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "ether_wallet";

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("payable deposits and owner-only withdrawal")
        .payable_constructor(vec![], construct)
        .view("owner", vec![], owner)
        .view("wallet_balance", vec![], wallet_balance)
        .payable("deposit", vec![], deposit)
        .mutate("withdraw", vec![Param::uint("amount")], withdraw)
        .build()
}

fn construct(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    env.set("owner", &env.caller().to_hex())?;
    Ok(serde_json::Value::Null)
}

fn owner(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("owner", String::new())?))
}

fn wallet_balance(
    env: &mut CallEnv<'_>,
    _args: &[serde_json::Value],
) -> SimResult<serde_json::Value> {
    Ok(json!(env.balance(env.this())))
}

fn deposit(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    env.require(env.value() > 0, "deposit requires value")?;
    let from = env.caller().to_hex();
    let amount = env.value();
    env.emit(Event::new("Deposit", json!({"from": from, "amount": amount})).indexed("from"));
    Ok(json!(env.balance(env.this())))
}

fn withdraw(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let amount = args::uint(args, 0)?;
    let owner: String = env.get_or("owner", String::new())?;
    env.require(env.caller().to_hex() == owner, "caller is not the owner")?;
    let to = env.caller();
    env.send(to, amount)?;
    env.emit(Event::new("Withdraw", json!({"amount": amount})));
    Ok(json!(env.balance(env.this())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_n_deposits_of_a_each() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench
            .deploy_with(NAME, DeployOpts::default().caller(alice))
            .unwrap();

        for _ in 0..4 {
            bench
                .call_with(addr, "deposit", &[], CallOpts::caller(alice).value(25))
                .unwrap();
        }
        assert_eq!(bench.chain().balance_of(addr), 100);
        bench
            .assert_view(addr, "wallet_balance", &[], json!(100))
            .unwrap();
    }

    #[test]
    fn test_deploy_can_seed_the_wallet() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench
            .deploy_with(NAME, DeployOpts::default().caller(alice).value(500))
            .unwrap();

        assert_eq!(bench.chain().balance_of(addr), 500);
        assert_eq!(
            bench.chain().balance_of(alice),
            ACCOUNT_ENDOWMENT - 500
        );
    }

    #[test]
    fn test_zero_value_deposit_reverts() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench
            .deploy_with(NAME, DeployOpts::default().caller(alice))
            .unwrap();

        let reason = expect_revert(bench.call_with(
            addr,
            "deposit",
            &[],
            CallOpts::caller(alice),
        ))
        .unwrap();
        assert_eq!(reason, "deposit requires value");
    }

    #[test]
    fn test_only_owner_withdraws() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let mallory = bench.account("mallory");
        let addr = bench
            .deploy_with(NAME, DeployOpts::default().caller(alice).value(200))
            .unwrap();

        let reason = expect_revert(bench.call_with(
            addr,
            "withdraw",
            &[json!(200)],
            CallOpts::caller(mallory),
        ))
        .unwrap();
        assert_eq!(reason, "caller is not the owner");
        assert_eq!(bench.chain().balance_of(addr), 200);
        assert_eq!(bench.chain().balance_of(mallory), ACCOUNT_ENDOWMENT);

        bench
            .call_with(addr, "withdraw", &[json!(200)], CallOpts::caller(alice))
            .unwrap();
        assert_eq!(bench.chain().balance_of(addr), 0);
        assert_eq!(bench.chain().balance_of(alice), ACCOUNT_ENDOWMENT);
    }

    #[test]
    fn test_overdraw_reverts() {
        let mut bench = bench();
        let alice = bench.account("alice");
        let addr = bench
            .deploy_with(NAME, DeployOpts::default().caller(alice).value(50))
            .unwrap();

        let err = bench
            .call_with(addr, "withdraw", &[json!(500)], CallOpts::caller(alice))
            .unwrap_err();
        assert!(err.is_revert());
        assert_eq!(bench.chain().balance_of(addr), 50);
    }
}
