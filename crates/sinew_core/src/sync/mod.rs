//! # Double Buffering
//!
//! ## The Problem
//!
//! ```text
//! Frame N:    write mesh, hand it to the renderer
//! Frame N+1:  write mesh again while the GPU may still read frame N
//!
//! One buffer:  rewrite while in flight → stalls or corruption
//! ```
//!
//! ## The Solution: Ping-Pong
//!
//! ```text
//! Frame N:
//!   Writer fills Buffer A, renderer is handed A
//!
//! Frame N+1:
//!   get_next() toggles
//!   Writer fills Buffer B, renderer still holds A until swap
//! ```
//!
//! Exclusive access is enforced by `&mut self`. No atomics, no locks.

mod double_buffer;

pub use double_buffer::DoubleBuffered;
