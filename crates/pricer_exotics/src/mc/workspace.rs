//! Reusable path storage for Monte Carlo simulation.
//!
//! [`PathBatch`] owns the normal draws and the simulated price matrix of one
//! chunk of paths. A worker allocates it once and refills it for every chunk
//! it simulates, so the simulation loop itself never touches the allocator.
//!
//! # Memory Layout
//!
//! Both buffers are row-major and contiguous:
//! - `randoms`: n_paths × n_steps (standard normal draws)
//! - `prices`: n_paths × (n_steps + 1) (price paths including S₀ at column 0)

/// Simulated price paths of one chunk.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::PathBatch;
///
/// let mut batch = PathBatch::new(1000, 252);
/// assert_eq!(batch.n_paths(), 1000);
/// assert_eq!(batch.n_steps(), 252);
///
/// // Shrinking the logical size keeps the allocation
/// batch.ensure_capacity(10, 252);
/// assert_eq!(batch.len(), 10);
/// assert_eq!(batch.path(0).len(), 253);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathBatch {
    /// Normal draws (n_paths × n_steps).
    randoms: Vec<f64>,
    /// Price paths (n_paths × (n_steps + 1)).
    prices: Vec<f64>,
    /// Logical number of paths.
    n_paths: usize,
    /// Logical number of steps.
    n_steps: usize,
}

impl PathBatch {
    /// Creates a batch sized for `n_paths` paths of `n_steps` steps.
    pub fn new(n_paths: usize, n_steps: usize) -> Self {
        Self {
            randoms: vec![0.0; n_paths * n_steps],
            prices: vec![0.0; n_paths * (n_steps + 1)],
            n_paths,
            n_steps,
        }
    }

    /// Sets the logical dimensions, growing the buffers if needed.
    ///
    /// Never shrinks the underlying allocation.
    pub fn ensure_capacity(&mut self, n_paths: usize, n_steps: usize) {
        let randoms_len = n_paths * n_steps;
        let prices_len = n_paths * (n_steps + 1);

        if randoms_len > self.randoms.len() {
            self.randoms.resize(randoms_len, 0.0);
        }
        if prices_len > self.prices.len() {
            self.prices.resize(prices_len, 0.0);
        }

        self.n_paths = n_paths;
        self.n_steps = n_steps;
    }

    /// Returns the logical number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the logical number of steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the number of paths (alias of [`n_paths`](Self::n_paths)).
    #[inline]
    pub fn len(&self) -> usize {
        self.n_paths
    }

    /// Returns true if the batch holds no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_paths == 0
    }

    /// Returns path `index` as `[S₀, S₁, …, S_N]`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_paths`.
    #[inline]
    pub fn path(&self, index: usize) -> &[f64] {
        assert!(index < self.n_paths, "path index {} out of range", index);
        let stride = self.n_steps + 1;
        &self.prices[index * stride..(index + 1) * stride]
    }

    /// Returns the terminal price S_N of path `index`.
    #[inline]
    pub fn terminal(&self, index: usize) -> f64 {
        self.path(index)[self.n_steps]
    }

    /// Iterates over the paths in row order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        let stride = self.n_steps + 1;
        self.prices[..self.n_paths * stride].chunks_exact(stride)
    }

    /// Returns the logical price matrix.
    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices[..self.n_paths * (self.n_steps + 1)]
    }

    /// Splits into the mutable price matrix and the draw buffer.
    #[inline]
    pub(crate) fn prices_mut_and_randoms(&mut self) -> (&mut [f64], &mut [f64]) {
        let prices_len = self.n_paths * (self.n_steps + 1);
        let randoms_len = self.n_paths * self.n_steps;
        (
            &mut self.prices[..prices_len],
            &mut self.randoms[..randoms_len],
        )
    }
}
