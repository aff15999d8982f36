//! # chainlab_examples - Smart-Contract Study Guide
//!
//! A collection of minimal specimens, one language concept per module,
//! each paired with tests that exercise the concept against the
//! [`chainlab_sim`] chain simulator:
//!
//! - [`state_variables`] — declared fields and their literal defaults
//! - [`constructors`] — deploy-time arguments and deploy-time rejection
//! - [`functions`] — read-only vs state-mutating operations, guards
//! - [`mappings`] — key-value fields and default values for unwritten keys
//! - [`structs`] — composite records in contract state
//! - [`enums`] — a closed set of states with checked transitions
//! - [`events`] — emission order and indexed-field filtering
//! - [`error_handling`] — require/revert and rollback on failure
//! - [`inheritance`] — operation reuse and overriding, two levels deep
//! - [`ether_wallet`] — receiving and sending simulated value
//! - [`time_lock`] — time-gated access against the simulated clock
//! - [`cross_contract`] — one instance invoking another

use chainlab_sim::prelude::*;

pub mod constructors;
pub mod cross_contract;
pub mod enums;
pub mod error_handling;
pub mod ether_wallet;
pub mod events;
pub mod functions;
pub mod inheritance;
pub mod mappings;
pub mod state_variables;
pub mod structs;
pub mod time_lock;

/// Every specimen in the study guide
pub fn registry() -> Vec<Specimen> {
    let mut specimens = vec![
        state_variables::specimen(),
        constructors::specimen(),
        functions::specimen(),
        mappings::specimen(),
        structs::specimen(),
        enums::specimen(),
        events::specimen(),
        error_handling::specimen(),
        ether_wallet::specimen(),
        time_lock::specimen(),
    ];
    specimens.extend(inheritance::specimens());
    specimens.extend(cross_contract::specimens());
    specimens
}

/// Name and one-line description of every specimen, for listings
pub fn catalog() -> Vec<(String, String)> {
    registry()
        .into_iter()
        .map(|s| {
            let description = s.description.unwrap_or_default();
            (s.name, description)
        })
        .collect()
}

/// Fresh chain with every specimen registered
pub fn chain() -> Chain {
    let mut chain = Chain::new();
    for specimen in registry() {
        chain.register(specimen);
    }
    chain
}

/// Fresh bench over [`chain`]
pub fn bench() -> Bench {
    let mut bench = Bench::with_chain(chain());
    bench.chain_mut().fund(Chain::default_caller(), ACCOUNT_ENDOWMENT);
    bench
}
