//! Per-worker pseudo-random normal stream.
//!
//! [`NormalStream`] wraps a ChaCha12 generator keyed by the base seed and
//! positioned on its own ChaCha stream id, so streams for distinct worker
//! indices never overlap.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Distribution, StandardNormal};

/// Reproducible standard-normal draw sequence owned by one worker.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::rng::NormalStream;
///
/// let mut a = NormalStream::new(42, 0);
/// let mut b = NormalStream::new(42, 0);
/// assert_eq!(a.next_normal(), b.next_normal());
///
/// // Batch generation into a pre-allocated buffer
/// let mut buffer = vec![0.0; 100];
/// a.fill_normal(&mut buffer);
/// ```
#[derive(Clone, Debug)]
pub struct NormalStream {
    /// The underlying PRNG instance.
    inner: ChaCha12Rng,
    /// Base seed the stream was keyed with.
    seed: u64,
    /// Worker index selecting the ChaCha stream id.
    worker_index: usize,
}

impl NormalStream {
    /// Creates the stream for `(seed, worker_index)`.
    ///
    /// The same pair always produces the same sequence.
    #[inline]
    pub fn new(seed: u64, worker_index: usize) -> Self {
        let mut inner = ChaCha12Rng::seed_from_u64(seed);
        inner.set_stream(worker_index as u64);
        Self {
            inner,
            seed,
            worker_index,
        }
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the worker index this stream belongs to.
    #[inline]
    pub fn worker_index(&self) -> usize {
        self.worker_index
    }

    /// Generates a single standard normal variate (mean=0, std=1).
    ///
    /// Uses the Ziggurat sampler of `rand_distr::StandardNormal`.
    #[inline]
    pub fn next_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills the buffer with standard normal variates.
    ///
    /// Zero-allocation; empty buffers are a no-op.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}
