//! Deterministic partitioning of paths into batches.
//!
//! A [`BatchPlan`] depends only on the path count, the configured batch
//! count and the antithetic flag. It never looks at the thread pool, so the
//! same configuration always yields the same batches and the same random
//! stream per batch.

/// One contiguous range of paths owned by a single worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSpec {
    /// Batch index, also the worker index of its random stream.
    pub index: usize,
    /// Global index of the first path.
    pub first_path: usize,
    /// Number of paths in the batch.
    pub n_paths: usize,
}

/// Partition of a run into batches.
///
/// Paths are distributed in units (single paths, or antithetic pairs) as
/// evenly as possible; earlier batches take the remainder. An antithetic
/// pair never straddles two batches, and the unpaired path of an odd
/// antithetic run is appended to the last batch. The number of batches is
/// clamped to the number of units.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::BatchPlan;
///
/// let plan = BatchPlan::new(10, 4, true);
/// let sizes: Vec<usize> = plan.iter().map(|b| b.n_paths).collect();
/// assert_eq!(sizes, vec![4, 2, 2, 2]);
/// assert_eq!(plan.total_paths(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    batches: Vec<BatchSpec>,
    antithetic: bool,
}

impl BatchPlan {
    /// Builds the plan for `n_paths` paths over at most `n_batches` batches.
    ///
    /// # Arguments
    ///
    /// * `n_paths` - Total path count M
    /// * `n_batches` - Requested batch count, clamped to the number of units
    /// * `antithetic` - Keep antithetic pairs inside one batch; an odd last
    ///   path goes to the last batch
    pub fn new(n_paths: usize, n_batches: usize, antithetic: bool) -> Self {
        let unit = if antithetic { 2 } else { 1 };
        let n_units = n_paths / unit;
        let leftover = n_paths % unit;

        let n_batches = n_batches.min(n_units).max(1);
        let base = n_units / n_batches;
        let extra = n_units % n_batches;

        let mut batches = Vec::with_capacity(n_batches);
        let mut first_path = 0;
        for index in 0..n_batches {
            let units = base + usize::from(index < extra);
            let mut size = units * unit;
            if index + 1 == n_batches {
                size += leftover;
            }
            batches.push(BatchSpec {
                index,
                first_path,
                n_paths: size,
            });
            first_path += size;
        }

        Self {
            batches,
            antithetic,
        }
    }

    /// Number of batches.
    #[inline]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Returns true if the plan has no batches.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Whether paths are paired.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Total number of paths across all batches.
    pub fn total_paths(&self) -> usize {
        self.batches.iter().map(|b| b.n_paths).sum()
    }

    /// The batches in index order.
    #[inline]
    pub fn batches(&self) -> &[BatchSpec] {
        &self.batches
    }

    /// Iterates over the batches in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, BatchSpec> {
        self.batches.iter()
    }
}
