//! # FksMap
//!
//! A **static collision-free hash map** built with FKS two-tiered perfect
//! hashing.
//!
//! ## Features
//!
//! - **Fixed key set** - Built once from a known sequence of pairs
//! - **Worst-case O(1) lookups** - No probing, no chaining, no resizing
//! - **Checked and unchecked access** - Verified lookups by default, an
//!   `unsafe` fast path when presence is guaranteed
//! - **In-place updates** - Values of present keys can be overwritten
//! - **Pluggable hash family** - Integers work out of the box via the
//!   multiply-shift family; other key types implement [`HashFamily`]
//! - **Injectable randomness** - Seed every hash draw from a caller-supplied
//!   source for reproducible tables
//!
//! ## Quick Start
//!
//! ```rust
//! use fks_map::FksMap;
//!
//! let mut map = FksMap::new(vec![(1u64, "a"), (3, "b"), (9, "c")]).unwrap();
//!
//! // Checked lookups
//! assert_eq!(*map.get(&3).unwrap(), "b");
//! assert!(map.get(&5).is_err());
//!
//! // Update an existing key in place
//! *map.get_mut(&3).unwrap() = "teste";
//! assert_eq!(*map.get(&3).unwrap(), "teste");
//!
//! // Fast path, presence guaranteed by the caller
//! // SAFETY: 9 was part of the construction input.
//! assert_eq!(unsafe { *map.get_unchecked(&9) }, "c");
//! ```

pub mod error;
pub mod hash;
pub mod map;

// The second-level table is an internal implementation detail
mod bucket;

pub use error::FksError;
pub use hash::{HashFamily, MulShiftHash, MulShiftKey};
pub use map::{FksMap, FksMapBuilder};
