//! Random downsampling of a signal sequence for presentation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Picks the indices kept when showing `len` values with at most
/// `sample_size` points.
///
/// If `len <= sample_size` every index is kept. Otherwise `sample_size`
/// distinct indices are drawn uniformly without replacement. The result is
/// sorted so a rendered trace follows record order. A fixed `seed` gives a
/// reproducible draw; `None` seeds from entropy.
#[must_use]
pub fn sample_indices(len: usize, sample_size: usize, seed: Option<u64>) -> Vec<usize> {
    if len <= sample_size {
        return (0..len).collect();
    }

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut indices = rand::seq::index::sample(&mut rng, len, sample_size).into_vec();
    indices.sort_unstable();
    indices
}

/// Returns the values at [`sample_indices`].
#[must_use]
pub fn downsample(values: &[f64], sample_size: usize, seed: Option<u64>) -> Vec<f64> {
    sample_indices(values.len(), sample_size, seed)
        .into_iter()
        .map(|i| values[i])
        .collect()
}
