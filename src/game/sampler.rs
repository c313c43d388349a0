//! Uniform sampling without replacement.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("cannot pick {requested} items from a pool of {available}")]
    PoolTooSmall { requested: usize, available: usize },
}

/// Pick `k` distinct items from `pool`, uniformly and without replacement.
/// Items are distinct by position; order of the result is unspecified.
pub fn sample<T: Clone, R: Rng + ?Sized>(
    pool: &[T],
    k: usize,
    rng: &mut R,
) -> Result<Vec<T>, SampleError> {
    if k > pool.len() {
        return Err(SampleError::PoolTooSmall {
            requested: k,
            available: pool.len(),
        });
    }

    Ok(index::sample(rng, pool.len(), k)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect())
}

/// Deterministic generator when a seed is given, OS entropy otherwise
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
