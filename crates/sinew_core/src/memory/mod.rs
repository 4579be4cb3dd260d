//! # Memory Management
//!
//! Reusable buffers and handle arenas for zero-allocation frames.
//!
//! ## Design Philosophy
//!
//! Memory is allocated when capacity is insufficient, and only then. During steady
//! state frames:
//! - No heap allocations
//! - Buffers are cleared and refilled in place
//! - Predictable, flat latency

mod arena;
mod grow_buffer;

pub use arena::{Arena, Handle};
pub use grow_buffer::GrowBuffer;
