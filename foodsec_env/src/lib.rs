//! Food-Security Simulation Environment Layer
//!
//! This crate is the determinism boundary for the simulation engine. Anything
//! that could make two runs of the same scenario diverge is routed through it:
//! - **Randomness**: every random stream is derived from the scenario seed,
//!   the simulated year and a per-sector stream id
//! - **Identity**: run identifiers are derived from the seed, never from the clock
//! - **Cancellation**: a cooperative flag the engine polls between years
//!
//! The engine itself never touches `thread_rng()`, `SystemTime` or any global
//! state, so a scenario replayed with the same seed yields a bit-identical
//! history.
//!
//! # Example
//!
//! ```ignore
//! use foodsec_env::{DeterministicEnv, SimEnvironment};
//!
//! let env = DeterministicEnv::for_scenario("baseline", 0);
//! let mut rng = env.rng_for(2026, 1);
//! if env.is_cancelled() { /* stop between years */ }
//! ```

mod cancel;
mod context;
mod deterministic;
mod types;

pub use cancel::CancelToken;
pub use context::SimEnvironment;
pub use deterministic::DeterministicEnv;
pub use types::{scenario_seed, RunId, Year};
