//! Environment trait consumed by the simulation engine.

use crate::types::{RunId, Year};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The engine's only window onto non-determinism.
///
/// # Implementations
///
/// - **DeterministicEnv**: seed derived from the scenario name, shared
///   cancellation token
///
/// # Determinism
///
/// `year_seed` must be a pure function of `(seed, year, stream)`. Sector
/// models receive nothing else that could vary between runs.
pub trait SimEnvironment: Send + Sync {
    /// Returns the master seed of this run.
    fn seed(&self) -> u64;

    /// Returns the run identifier (derived from the seed).
    fn run_id(&self) -> RunId {
        RunId::from_seed(self.seed())
    }

    /// Returns true when the caller asked the run to stop.
    ///
    /// Polled between years only.
    fn is_cancelled(&self) -> bool;

    /// Derives the sub-seed for one random stream in one year.
    fn year_seed(&self, year: Year, stream: u64) -> u64 {
        let year_mix = (year as i64 as u64).wrapping_mul(0x9e3779b97f4a7c15);
        let stream_mix = stream.wrapping_add(1).wrapping_mul(0x517cc1b727220a95);
        self.seed() ^ year_mix ^ stream_mix
    }

    /// Returns a seeded RNG for one stream in one year.
    fn rng_for(&self, year: Year, stream: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.year_seed(year, stream))
    }
}
