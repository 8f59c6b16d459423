//! # SWARM Driver
//!
//! Deterministic population and tick benchmarking on top of [`swarm_core`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use swarm::{run_bench, BenchConfig};
//!
//! let report = run_bench(&BenchConfig {
//!     entities: 100_000,
//!     iters: 20,
//!     ..BenchConfig::default()
//! })?;
//! println!("{:.9} s/iter", report.per_iter().as_secs_f64());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bench;
pub mod population;

pub use bench::{run_bench, BenchConfig, BenchReport};
pub use population::Populator;
