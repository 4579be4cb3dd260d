//! # SINEW Core
//!
//! Zero-allocation building blocks for the skeleton mesh pipeline:
//! - Per-frame buffers that are cleared and reused, never reallocated in steady state
//! - Stable opaque handles whose equality is identity, not structure
//! - Ping-pong double buffering for resources read by a renderer
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - Buffers grow only when capacity is insufficient
//! 2. **Identity by handle** - Two handles are equal only if they name the same slot and generation
//! 3. **Single writer** - Exclusive access is enforced through `&mut self`, no locks
//!
//! ## Example
//!
//! ```rust
//! use sinew_core::GrowBuffer;
//!
//! let mut positions: GrowBuffer<f32> = GrowBuffer::new();
//! let reallocated = positions.ensure_capacity(8);
//! assert!(reallocated);
//! positions.set_len(6);
//! positions.zero_tail();
//! assert_eq!(positions.capacity(), 8);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod sync;

pub use memory::{Arena, GrowBuffer, Handle};
pub use sync::DoubleBuffered;
