//! Benchmark for per-frame mesh rebuild cost.
//!
//! TARGET: a static 64-slot pose commits with no index rebuild
//!
//! Run with: cargo bench --package sinew_rendering --bench mesh_rebuild_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sinew_rendering::{
    AtlasMaterials, AtlasRegion, Attachment, AttachmentId, Bone, MaterialId, PageId,
    RegionAttachment, RegionPlacement, RendererConfig, Skeleton, SkeletonRenderer, Slot, SlotId,
};

const SLOTS: usize = 64;

fn rig() -> (Skeleton, Vec<AttachmentId>) {
    let mut skeleton = Skeleton::new();
    let root = skeleton.add_bone(Bone::new("root"));
    let mut alternates = Vec::with_capacity(SLOTS);
    for i in 0..SLOTS {
        let name = format!("slot_{i}");
        let slot = skeleton.add_slot(Slot::new(name.as_str(), root));
        // Alternate pages so the batch splits into several submeshes
        let page = PageId((i / 16) as u32 % 2);
        let quad = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
            name.as_str(),
            AtlasRegion::new(page, name.as_str()),
            RegionPlacement::sized(1.0, 1.0),
        )));
        let alternate = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
            format!("{name}_alt"),
            AtlasRegion::new(page, name.as_str()),
            RegionPlacement::sized(1.5, 1.5),
        )));
        skeleton.set_attachment(slot, Some(quad));
        alternates.push(alternate);
    }
    (skeleton, alternates)
}

fn materials() -> AtlasMaterials {
    AtlasMaterials::new()
        .with_page(PageId(0), MaterialId(0))
        .with_page(PageId(1), MaterialId(1))
}

fn benchmark_static_pose(c: &mut Criterion) {
    let materials = materials();
    let (skeleton, _) = rig();
    let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
    renderer.initialize(Some(skeleton), &materials, false).unwrap();

    let mut group = c.benchmark_group("mesh_rebuild");
    group.throughput(Throughput::Elements(SLOTS as u64));

    group.bench_function("static_pose", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 0.01;
            if let Some(bone) = renderer.skeleton_mut().and_then(|s| s.bones.first_mut()) {
                bone.set_world(1.0, 0.0, 0.0, 1.0, x, 0.0);
            }
            black_box(renderer.update(&materials).unwrap())
        });
    });

    group.finish();
}

fn benchmark_changing_attachments(c: &mut Criterion) {
    let materials = materials();
    let (skeleton, alternates) = rig();
    let mut renderer = SkeletonRenderer::new(RendererConfig::default()).unwrap();
    renderer.initialize(Some(skeleton), &materials, false).unwrap();

    let mut group = c.benchmark_group("mesh_rebuild");
    group.throughput(Throughput::Elements(SLOTS as u64));

    group.bench_function("changing_attachments", |b| {
        let mut frame = 0usize;
        b.iter(|| {
            frame = frame.wrapping_add(1);
            let slot = SlotId(frame % SLOTS);
            if let Some(skeleton) = renderer.skeleton_mut() {
                // Toggle between visible and hidden to force a structure change
                let next = if frame % 2 == 0 {
                    Some(alternates[slot.0])
                } else {
                    None
                };
                skeleton.set_attachment(slot, next);
            }
            black_box(renderer.update(&materials).unwrap())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_static_pose,
    benchmark_changing_attachments,
);
criterion_main!(benches);
