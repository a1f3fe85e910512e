//! Deterministic subsampling of working sets.
//!
//! Centroids computed from a sample approximate the centroids of the whole
//! zone. This trades accuracy for responsiveness on large zones.

use crate::scope::WorkingSet;
use rand::Rng;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;

/// Sampling settings used when building working sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    /// Maximum number of orders kept per zone, `None` to keep them all.
    pub max_size: Option<usize>,
    pub seed: u64,
}

impl Sampling {
    pub const DEFAULT_MAX_SIZE: usize = 1000;
    pub const DEFAULT_SEED: u64 = 42;

    /// Keep every order of the zone.
    pub fn exhaustive() -> Self {
        Self {
            max_size: None,
            ..Self::default()
        }
    }

    pub fn apply<'a>(&self, working_set: WorkingSet<'a>) -> WorkingSet<'a> {
        match self.max_size {
            Some(max_size) => sample_seeded(working_set, max_size, self.seed),
            None => working_set,
        }
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            max_size: Some(Self::DEFAULT_MAX_SIZE),
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// The generator [`sample_seeded`] uses.
pub fn rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

/// Draw `max_size` orders from `working_set` if it holds more than that.
///
/// Kept orders stay in their original relative order. The result only depends
/// on the working set, `max_size`, and the state of `rng`.
pub fn sample<'a, R>(working_set: WorkingSet<'a>, max_size: usize, rng: &mut R) -> WorkingSet<'a>
where
    R: Rng + ?Sized,
{
    let len = working_set.len();
    if len <= max_size {
        return working_set;
    }

    let mut indices = rand::seq::index::sample(rng, len, max_size).into_vec();
    indices.sort_unstable();
    tracing::debug!(from = len, to = max_size, "sampled working set");

    let orders = working_set.into_orders();
    indices.into_iter().map(|i| orders[i]).collect()
}

/// [`sample`] with a fresh generator seeded with `seed`.
pub fn sample_seeded(working_set: WorkingSet<'_>, max_size: usize, seed: u64) -> WorkingSet<'_> {
    sample(working_set, max_size, &mut rng(seed))
}
