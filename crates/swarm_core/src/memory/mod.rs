//! # Memory Management
//!
//! Owned, cache-line aligned column storage for chunks.
//!
//! ## Design Philosophy
//!
//! Every column is allocated once when its chunk is created. During a tick:
//! - No heap allocations
//! - No frees
//! - Columns start on a 64-byte boundary so vector loads never straddle
//!   more cache lines than they must

mod aligned;

pub use aligned::{AlignedBuf, COLUMN_ALIGN};
