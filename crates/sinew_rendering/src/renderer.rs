//! # Skeleton Renderer
//!
//! Per-frame orchestration of the mesh pipeline.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         FRAME TIMELINE                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  STEP 1  Instructions     draw order → submeshes             │
//! │          └── override set? hand off and stop                 │
//! │  STEP 2  Vertices         positions, colors, uvs, bounds     │
//! │  STEP 3  Commit           next mesh slot                     │
//! │          ├── diff vs slot snapshot → rebuild triangles?      │
//! │          ├── diff vs pushed list   → push materials?         │
//! │          └── snapshot working instruction                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Runs once per frame, strictly after the animation solver has resolved bone
//! transforms. A frame either commits fully or leaves the previous mesh
//! authoritative: material errors abort before any mesh slot is touched.

use std::collections::HashMap;

use crate::config::RendererConfig;
use crate::differ;
use crate::error::{RenderError, RenderResult};
use crate::instruction::{build_instructions, FrameInstruction, InstructionSettings, SlotOverrides};
use crate::materials::{MaterialId, MaterialSource};
use crate::mesh_store::{DrawSubmission, MeshResource, MeshStore};
use crate::skeleton::{Skeleton, SlotId};
use crate::stats::MeshStats;
use crate::triangles::{TriangleBuilder, TriangleSettings};
use crate::vertex::{MeshBounds, VertexGenerator, VertexSettings};

/// Callback receiving the working instruction instead of the built mesh.
pub type GenerateMeshOverride = Box<dyn FnMut(&FrameInstruction)>;

/// Callback invoked after a successful (re)initialization.
pub type RebuildCallback = Box<dyn FnMut(&SkeletonRenderer)>;

/// Why a frame produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not initialized, or initialization failed.
    Invalid,
    /// Rendering disabled and no override set.
    Disabled,
}

/// Outcome of [`SkeletonRenderer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Nothing was built.
    Skipped(SkipReason),
    /// The working instruction was handed to the override.
    Overridden,
    /// A new mesh was committed and is now current.
    Committed {
        /// Triangle buffers were rebuilt.
        structure_rebuilt: bool,
        /// The material list was re-pushed.
        materials_updated: bool,
    },
}

/// Turns a posed skeleton into a batched, double-buffered mesh.
pub struct SkeletonRenderer {
    config: RendererConfig,
    valid: bool,
    enabled: bool,
    skeleton: Option<Skeleton>,

    custom_slot_materials: HashMap<SlotId, MaterialId>,
    separator_slots: Vec<SlotId>,

    working: FrameInstruction,
    vertices: VertexGenerator,
    triangles: TriangleBuilder,
    meshes: MeshStore,
    /// Whether any frame has been committed since initialization.
    committed: bool,

    shared_materials: Vec<Option<MaterialId>>,
    draw_submissions: Vec<DrawSubmission>,
    stats: MeshStats,

    generate_mesh_override: Option<GenerateMeshOverride>,
    on_rebuild: Option<RebuildCallback>,
}

impl SkeletonRenderer {
    /// Creates an uninitialized renderer. It renders nothing until
    /// [`initialize`](Self::initialize) succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            valid: false,
            enabled: true,
            skeleton: None,
            custom_slot_materials: HashMap::new(),
            separator_slots: Vec::new(),
            working: FrameInstruction::default(),
            vertices: VertexGenerator::new(),
            triangles: TriangleBuilder::new(),
            meshes: MeshStore::default(),
            committed: false,
            shared_materials: Vec::new(),
            draw_submissions: Vec::new(),
            stats: MeshStats::default(),
            generate_mesh_override: None,
            on_rebuild: None,
        })
    }

    /// Takes ownership of a skeleton and builds the first frame.
    ///
    /// A valid renderer is left alone unless `overwrite` is set. Otherwise all
    /// buffers, snapshots and materials are cleared first. Custom slot materials
    /// survive.
    ///
    /// # Errors
    ///
    /// Returns `MissingSkeleton` if `skeleton` is `None` (the renderer stays
    /// invalid), or the error of the first frame's material resolution.
    pub fn initialize<M: MaterialSource + ?Sized>(
        &mut self,
        skeleton: Option<Skeleton>,
        materials: &M,
        overwrite: bool,
    ) -> RenderResult<()> {
        if self.valid && !overwrite {
            return Ok(());
        }

        self.clear();

        let Some(skeleton) = skeleton else {
            if self.config.log_errors {
                tracing::error!("Missing skeleton data, renderer disabled");
            }
            return Err(RenderError::MissingSkeleton);
        };

        self.separator_slots.clear();
        for name in &self.config.submesh_separators {
            match skeleton.find_slot(name) {
                Some(slot) => self.separator_slots.push(slot),
                None => tracing::warn!("Unknown submesh separator slot: {}", name),
            }
        }

        tracing::debug!(
            "Renderer initialized: {} slots, {} bones, {} separators",
            skeleton.slots.len(),
            skeleton.bones.len(),
            self.separator_slots.len()
        );

        self.skeleton = Some(skeleton);
        self.valid = true;

        self.update(materials)?;

        if let Some(mut callback) = self.on_rebuild.take() {
            callback(&*self);
            if self.on_rebuild.is_none() {
                self.on_rebuild = Some(callback);
            }
        }
        Ok(())
    }

    /// Drops the skeleton and every per-frame structure.
    fn clear(&mut self) {
        self.working.clear();
        self.vertices = VertexGenerator::new();
        self.triangles = TriangleBuilder::new();
        self.meshes = MeshStore::default();
        self.committed = false;
        self.shared_materials.clear();
        self.draw_submissions.clear();
        self.skeleton = None;
        self.valid = false;
    }

    /// Builds and commits one frame.
    ///
    /// # Errors
    ///
    /// Propagates material resolution errors. No mesh slot is modified in that case.
    pub fn update<M: MaterialSource + ?Sized>(&mut self, materials: &M) -> RenderResult<FrameStatus> {
        if !self.valid {
            return Ok(FrameStatus::Skipped(SkipReason::Invalid));
        }
        if !self.enabled && self.generate_mesh_override.is_none() {
            return Ok(FrameStatus::Skipped(SkipReason::Disabled));
        }
        let Some(skeleton) = self.skeleton.as_ref() else {
            return Ok(FrameStatus::Skipped(SkipReason::Invalid));
        };

        self.stats.frames += 1;

        // === STEP 1: Instructions ===
        let overrides = SlotOverrides {
            separators: &self.separator_slots,
            materials: &self.custom_slot_materials,
        };
        let built = build_instructions(
            skeleton,
            overrides,
            materials,
            InstructionSettings::from(&self.config),
            &mut self.working,
        );
        if let Err(err) = built {
            if self.config.log_errors {
                tracing::error!("Frame aborted: {}", err);
            }
            return Err(err);
        }

        if let Some(hook) = self.generate_mesh_override.as_mut() {
            hook(&self.working);
            self.stats.overridden_frames += 1;
            return Ok(FrameStatus::Overridden);
        }

        // === STEP 2: Vertices ===
        let reallocated = self.vertices.generate(
            skeleton,
            &self.working,
            VertexSettings::from(&self.config),
        );

        // === STEP 3: Commit into the next mesh slot ===
        let smart = self.meshes.get_next();

        let upload_normals = match &smart.instruction_used {
            Some(used) => used.vertex_count < self.working.vertex_count,
            None => true,
        };
        smart
            .mesh
            .upload_vertices(&self.vertices, upload_normals && self.config.calculate_normals);

        let structure_rebuilt =
            differ::must_update_structure(&self.working, smart.instruction_used.as_ref());
        if structure_rebuilt {
            self.triangles.rebuild(
                skeleton,
                &self.working,
                TriangleSettings::from(&self.config),
            );
            smart.mesh.upload_indices(self.triangles.buffers());
        }
        smart.mesh.set_bounds(self.vertices.bounds());

        let materials_updated = differ::must_update_materials(
            structure_rebuilt,
            &self.shared_materials,
            &self.working.submeshes,
        );
        if materials_updated {
            self.shared_materials.clear();
            self.shared_materials
                .extend(self.working.submeshes.iter().map(|s| s.material));
        }

        smart.remember(&self.working);
        self.committed = true;

        self.draw_submissions.clear();
        for (i, submesh) in smart.mesh.submeshes().iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let count = submesh.count as u32;
            self.draw_submissions.push(DrawSubmission {
                submesh: i,
                material: self.shared_materials.get(i).copied().flatten(),
                index_range: 0..count,
            });
        }

        // === Stats ===
        self.stats.commits += 1;
        if structure_rebuilt {
            self.stats.structure_rebuilds += 1;
        } else {
            self.stats.skipped_rebuilds += 1;
        }
        if reallocated {
            self.stats.vertex_reallocations += 1;
        }
        if materials_updated {
            self.stats.material_pushes += 1;
        }
        self.stats.last_vertex_count = self.working.vertex_count;
        self.stats.last_submesh_count = self.working.submeshes.len();

        Ok(FrameStatus::Committed {
            structure_rebuilt,
            materials_updated,
        })
    }

    /// Returns true once a skeleton has been accepted.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if rendering is enabled.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables rendering. A disabled renderer still feeds the override.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Configuration in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The owned skeleton.
    #[inline]
    #[must_use]
    pub const fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    /// The owned skeleton, for the animation solver to pose between frames.
    #[inline]
    pub fn skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        self.skeleton.as_mut()
    }

    /// Per-slot material overrides.
    #[inline]
    pub fn custom_slot_materials_mut(&mut self) -> &mut HashMap<SlotId, MaterialId> {
        &mut self.custom_slot_materials
    }

    /// Slots that always start a new submesh. Filled from the config on initialize.
    #[inline]
    pub fn submesh_separator_slots_mut(&mut self) -> &mut Vec<SlotId> {
        &mut self.separator_slots
    }

    /// Installs (or removes) the mesh-generation override.
    pub fn set_generate_mesh_override(&mut self, hook: Option<GenerateMeshOverride>) {
        self.generate_mesh_override = hook;
    }

    /// Installs (or removes) the callback run after each successful initialize.
    pub fn set_on_rebuild(&mut self, callback: Option<RebuildCallback>) {
        self.on_rebuild = callback;
    }

    /// The mesh exposed to the host renderer, once a frame has been committed.
    #[must_use]
    pub fn current_mesh(&self) -> Option<&MeshResource> {
        self.committed.then(|| &self.meshes.current().mesh)
    }

    /// Material per submesh, as last pushed.
    #[inline]
    #[must_use]
    pub fn shared_materials(&self) -> &[Option<MaterialId>] {
        &self.shared_materials
    }

    /// Draw calls for the current mesh.
    #[inline]
    #[must_use]
    pub fn draw_submissions(&self) -> &[DrawSubmission] {
        &self.draw_submissions
    }

    /// Bounds of the current mesh.
    #[must_use]
    pub fn bounds(&self) -> MeshBounds {
        self.current_mesh()
            .map(MeshResource::bounds)
            .unwrap_or_default()
    }

    /// The instruction built by the last update.
    #[inline]
    #[must_use]
    pub const fn working_instruction(&self) -> &FrameInstruction {
        &self.working
    }

    /// Rebuild counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> MeshStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::AtlasMaterials;
    use crate::skeleton::{
        AtlasRegion, Attachment, Bone, PageId, RegionAttachment, RegionPlacement, Slot,
    };
    use std::cell::Cell;
    use std::rc::Rc;

    fn materials() -> AtlasMaterials {
        AtlasMaterials::new().with_page(PageId(0), MaterialId(1))
    }

    fn skeleton(slots: &[&str]) -> Skeleton {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        for name in slots {
            let slot = skeleton.add_slot(Slot::new(*name, root));
            let quad = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
                *name,
                AtlasRegion::new(PageId(0), *name),
                RegionPlacement::sized(1.0, 1.0),
            )));
            skeleton.set_attachment(slot, Some(quad));
        }
        skeleton
    }

    #[test]
    fn test_new_validates_config() {
        let bad = RendererConfig {
            calculate_tangents: true,
            ..RendererConfig::default()
        };
        assert!(SkeletonRenderer::new(bad).is_err());
    }

    #[test]
    fn test_uninitialized_skips() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        assert_eq!(
            renderer.update(&materials()).unwrap(),
            FrameStatus::Skipped(SkipReason::Invalid)
        );
        assert!(renderer.current_mesh().is_none());
    }

    #[test]
    fn test_initialize_commits_first_frame() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        renderer
            .initialize(Some(skeleton(&["a", "b"])), &materials(), false)
            .unwrap();

        assert!(renderer.is_valid());
        let mesh = renderer.current_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(renderer.shared_materials(), &[Some(MaterialId(1))]);
        assert_eq!(renderer.draw_submissions()[0].index_range, 0..12);
        assert_eq!(renderer.stats().commits, 1);
    }

    #[test]
    fn test_initialize_without_overwrite_is_noop() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        renderer
            .initialize(Some(skeleton(&["a"])), &materials(), false)
            .unwrap();
        renderer
            .initialize(Some(skeleton(&["a", "b", "c"])), &materials(), false)
            .unwrap();
        assert_eq!(renderer.skeleton().unwrap().slots.len(), 1);

        renderer
            .initialize(Some(skeleton(&["a", "b", "c"])), &materials(), true)
            .unwrap();
        assert_eq!(renderer.skeleton().unwrap().slots.len(), 3);
        assert_eq!(renderer.stats().last_vertex_count, 12);
    }

    #[test]
    fn test_separator_names_resolved() {
        let config = RendererConfig {
            submesh_separators: vec!["b".to_string(), "missing".to_string()],
            ..RendererConfig::default()
        };
        let mut renderer = SkeletonRenderer::new(config).unwrap();
        renderer
            .initialize(Some(skeleton(&["a", "b", "c"])), &materials(), false)
            .unwrap();

        assert_eq!(renderer.submesh_separator_slots_mut(), &vec![SlotId(1)]);
        assert_eq!(renderer.draw_submissions().len(), 2);
    }

    #[test]
    fn test_disabled_skips_unless_overridden() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        renderer
            .initialize(Some(skeleton(&["a"])), &materials(), false)
            .unwrap();
        renderer.set_enabled(false);
        assert_eq!(
            renderer.update(&materials()).unwrap(),
            FrameStatus::Skipped(SkipReason::Disabled)
        );

        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        renderer.set_generate_mesh_override(Some(Box::new(move |instruction: &FrameInstruction| {
            counter.set(instruction.vertex_count);
        })));
        assert_eq!(renderer.update(&materials()).unwrap(), FrameStatus::Overridden);
        assert_eq!(seen.get(), 4);
        assert_eq!(renderer.stats().commits, 1);
    }

    #[test]
    fn test_on_rebuild_called() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);

        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        renderer.set_on_rebuild(Some(Box::new(move |r: &SkeletonRenderer| {
            assert!(r.is_valid());
            counter.set(counter.get() + 1);
        })));

        renderer
            .initialize(Some(skeleton(&["a"])), &materials(), false)
            .unwrap();
        renderer
            .initialize(Some(skeleton(&["a"])), &materials(), true)
            .unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_missing_skeleton() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        let err = renderer.initialize(None, &materials(), false).unwrap_err();

        assert!(matches!(err, RenderError::MissingSkeleton));
        assert!(!renderer.is_valid());
        assert_eq!(
            renderer.update(&materials()).unwrap(),
            FrameStatus::Skipped(SkipReason::Invalid)
        );
    }

    #[test]
    fn test_material_error_leaves_mesh() {
        let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
        renderer
            .initialize(Some(skeleton(&["a"])), &materials(), false)
            .unwrap();
        let before = renderer.meshes.current_index();

        let empty = AtlasMaterials::new();
        assert!(renderer.update(&empty).is_err());
        assert_eq!(renderer.meshes.current_index(), before);
        assert!(renderer.current_mesh().is_some());
    }
}
