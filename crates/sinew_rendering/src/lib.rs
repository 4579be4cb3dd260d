//! # SINEW Rendering
//!
//! Rebuilds a batched, GPU-ready mesh from a posed 2D skeleton every frame:
//! - One draw call per run of slots sharing a material
//! - Triangle buffers only rebuilt when the frame's structure changes
//! - Double-buffered output so the GPU never reads a mesh being written
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MESH PIPELINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Skeleton → Instructions → Vertex Streams → Mesh Slot       │
//! │                 ↓                              ↑            │
//! │           Structure Diff → Triangle Buffers ───┘            │
//! │                 ↓                                           │
//! │           Material Diff  → Shared Materials → Draw Calls    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Contract
//!
//! - Called once per frame, after bone world transforms are final
//! - Steady state allocates nothing once buffers reach peak size
//! - A failed frame leaves the previous mesh current

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod differ;
pub mod error;
pub mod gpu;
pub mod instruction;
pub mod materials;
pub mod mesh_store;
pub mod renderer;
pub mod skeleton;
pub mod stats;
pub mod triangles;
pub mod vertex;

pub use config::RendererConfig;
pub use error::{RenderError, RenderResult};
pub use instruction::{build_instructions, FrameInstruction, SubmeshInstruction};
pub use materials::{AtlasMaterials, MaterialId, MaterialSource};
pub use mesh_store::{DrawSubmission, MeshResource, MeshStore, SmartMesh, SubmeshIndices};
pub use renderer::{FrameStatus, SkeletonRenderer, SkipReason};
pub use skeleton::{
    AtlasRegion, Attachment, AttachmentId, BlendMode, Bone, BoneId, Color, Color32, PageId,
    RegionAttachment, RegionPlacement, Skeleton, Slot, SlotId,
};
pub use stats::MeshStats;
pub use triangles::{TriangleBuffer, TriangleBuilder};
pub use vertex::{MeshBounds, VertexGenerator};
