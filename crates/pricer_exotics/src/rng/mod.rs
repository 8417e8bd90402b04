//! # Random Number Generation Infrastructure
//!
//! Reproducible per-worker streams of standard-normal draws for the Monte
//! Carlo engine.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: the same `(base seed, worker index)` always yields
//!   the identical stream
//! - **Independence**: each worker index selects its own ChaCha stream id,
//!   so no two workers share mutable random state
//! - **Efficiency**: zero-allocation batch operations via `&mut [f64]` slices
//!
//! ## Module Structure
//!
//! - [`RandomStreamFactory`]: seed resolution and stream hand-out
//! - [`NormalStream`]: the per-worker generator
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_exotics::rng::RandomStreamFactory;
//!
//! let factory = RandomStreamFactory::new(12345);
//! let mut stream = factory.stream(3);
//!
//! let z = stream.next_normal();
//! let mut buffer = vec![0.0; 1000];
//! stream.fill_normal(&mut buffer);
//! # let _ = z;
//! ```

mod prng;
mod stream;

pub use prng::NormalStream;
pub use stream::RandomStreamFactory;
