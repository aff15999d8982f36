//! Inheritance
//!
//! A specimen can inherit another's state defaults and operations and
//! override the ones it redefines. The chain here is two levels deep:
//! `animal` -> `dog` -> `puppy`, each overriding `speak`.

use chainlab_sim::prelude::*;
use serde_json::json;

/// Registry name of the base specimen
pub const BASE: &str = "animal";
/// Registry name of the first derived specimen
pub const DERIVED: &str = "dog";
/// Registry name of the second-level derived specimen
pub const LEAF: &str = "puppy";

/// All three specimens of the inheritance chain
pub fn specimens() -> Vec<Specimen> {
    let animal = animal();
    let dog = dog(&animal);
    let puppy = puppy(&dog);
    vec![animal, dog, puppy]
}

fn animal() -> Specimen {
    Specimen::builder(BASE)
        .description("base: a nameable animal")
        .state(json!({"name": "some animal"}))
        .view("name", vec![], name)
        .view("speak", vec![], speak_generic)
        .mutate("rename", vec![Param::str("name")], rename)
        .build()
}

fn dog(animal: &Specimen) -> Specimen {
    Specimen::builder(DERIVED)
        .description("derived: overrides speak, adds fetch")
        .inherit(animal)
        .state(json!({"name": "dog", "fetched": 0}))
        .view("speak", vec![], speak_dog)
        .mutate("fetch", vec![], fetch)
        .build()
}

fn puppy(dog: &Specimen) -> Specimen {
    Specimen::builder(LEAF)
        .description("second-level derived: overrides speak again")
        .inherit(dog)
        .state(json!({"name": "puppy"}))
        .view("speak", vec![], speak_puppy)
        .build()
}

fn name(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(env.get_or::<String>("name", String::new())?))
}

fn rename(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let name = args::string(args, 0)?;
    env.set("name", &name)?;
    Ok(serde_json::Value::Null)
}

fn speak_generic(
    _env: &mut CallEnv<'_>,
    _args: &[serde_json::Value],
) -> SimResult<serde_json::Value> {
    Ok(json!("..."))
}

fn speak_dog(_env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!("woof"))
}

fn speak_puppy(
    _env: &mut CallEnv<'_>,
    _args: &[serde_json::Value],
) -> SimResult<serde_json::Value> {
    Ok(json!("yip"))
}

fn fetch(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let fetched: u64 = env.get_or("fetched", 0)?;
    env.set("fetched", &(fetched + 1))?;
    Ok(json!(fetched + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench;

    #[test]
    fn test_base_behavior() {
        let mut bench = bench();
        let addr = bench.deploy(BASE).unwrap();

        bench
            .assert_view(addr, "name", &[], json!("some animal"))
            .unwrap();
        bench.assert_view(addr, "speak", &[], json!("...")).unwrap();
    }

    #[test]
    fn test_derived_overrides_and_extends() {
        let mut bench = bench();
        let addr = bench.deploy(DERIVED).unwrap();

        // Overridden in the derived specimen.
        bench.assert_view(addr, "speak", &[], json!("woof")).unwrap();
        // Inherited unchanged from the base.
        bench.assert_view(addr, "name", &[], json!("dog")).unwrap();
        // New in the derived specimen.
        let outcome = bench.call(addr, "fetch", &[]).unwrap();
        assert_eq!(outcome.value, json!(1));
    }

    #[test]
    fn test_second_level_override() {
        let mut bench = bench();
        let addr = bench.deploy(LEAF).unwrap();

        bench.assert_view(addr, "speak", &[], json!("yip")).unwrap();
        // Operations from both ancestors are still callable.
        bench.call(addr, "fetch", &[]).unwrap();
        bench.call(addr, "rename", &[json!("rex")]).unwrap();
        bench.assert_view(addr, "name", &[], json!("rex")).unwrap();
    }

    #[test]
    fn test_base_is_unaffected_by_derived() {
        let mut bench = bench();
        let base = bench.deploy(BASE).unwrap();
        let leaf = bench.deploy(LEAF).unwrap();

        bench.call(leaf, "rename", &[json!("rex")]).unwrap();
        bench
            .assert_view(base, "name", &[], json!("some animal"))
            .unwrap();
    }
}
