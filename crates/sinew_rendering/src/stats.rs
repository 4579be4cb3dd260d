//! Mesh rebuild statistics.

/// Counters accumulated by a [`SkeletonRenderer`](crate::SkeletonRenderer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Calls to `update` that were not skipped.
    pub frames: u64,
    /// Frames committed into a mesh slot.
    pub commits: u64,
    /// Commits that rebuilt the triangle buffers.
    pub structure_rebuilds: u64,
    /// Commits that reused the previous triangle buffers.
    pub skipped_rebuilds: u64,
    /// Commits that reallocated the vertex streams.
    pub vertex_reallocations: u64,
    /// Commits that re-pushed the material list.
    pub material_pushes: u64,
    /// Frames handed to the mesh-generation override.
    pub overridden_frames: u64,
    /// Vertices in the last committed frame.
    pub last_vertex_count: usize,
    /// Submeshes in the last committed frame.
    pub last_submesh_count: usize,
}

impl MeshStats {
    /// Fraction of commits that rebuilt triangles (0.0 when nothing was committed).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rebuild_ratio(&self) -> f32 {
        if self.commits > 0 {
            self.structure_rebuilds as f32 / self.commits as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_ratio() {
        let mut stats = MeshStats::default();
        assert!(stats.rebuild_ratio().abs() < f32::EPSILON);

        stats.commits = 4;
        stats.structure_rebuilds = 1;
        assert!((stats.rebuild_ratio() - 0.25).abs() < f32::EPSILON);
    }
}
