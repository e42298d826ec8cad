//! Shared fixtures for skeleton node integration tests.

#![allow(dead_code)]

use glam::Vec2;

use skeletal2d::pose::fixture::{
    FixturePoseEngine, MeshAttachmentDesc, RegionAttachmentDesc, SkeletonDataDesc,
};
use skeletal2d::pose::{PageId, SharedPoseEngine};
use skeletal2d::render::Color;
use skeletal2d::skeleton::SkeletonNode;
use skeletal2d::{DrawList, RenderQueue, Renderer, Scene};

pub type FixtureNode = SkeletonNode<FixturePoseEngine>;
pub type FixtureScene = Scene<FixturePoseEngine>;

pub fn shared_engine() -> SharedPoseEngine<FixturePoseEngine> {
    skeletal2d::pose::shared(FixturePoseEngine::new())
}

/// One bone, one slot, one region quad spanning (-5,-5)..(5,5) on page 0.
pub fn single_region() -> SkeletonDataDesc {
    SkeletonDataDesc::new()
        .with_bone("root", Vec2::ZERO, Vec2::new(10.0, 0.0))
        .with_slot("body", Some("body-region"))
        .with_region(
            "body-region",
            RegionAttachmentDesc::quad(PageId(0), Vec2::ZERO, 5.0),
        )
}

/// A skeleton whose only slot draws nothing.
pub fn no_attachments() -> SkeletonDataDesc {
    SkeletonDataDesc::new()
        .with_bone("root", Vec2::ZERO, Vec2::new(10.0, 0.0))
        .with_slot("body", None)
}

/// Build a skeleton whose slots follow the given (page, additive)
/// sequence; `None` entries are slots without a visible attachment.
pub fn slot_run(slots: &[Option<(usize, bool)>]) -> SkeletonDataDesc {
    let mut desc = SkeletonDataDesc::new().with_bone("root", Vec2::ZERO, Vec2::new(10.0, 0.0));
    for (index, entry) in slots.iter().enumerate() {
        let slot_name = format!("slot{index}");
        match entry {
            Some((page, additive)) => {
                let att_name = format!("att{index}");
                desc = desc.with_region(
                    &att_name,
                    RegionAttachmentDesc::quad(PageId(*page), Vec2::ZERO, 1.0),
                );
                desc = if *additive {
                    desc.with_additive_slot(&slot_name, Some(&att_name))
                } else {
                    desc.with_slot(&slot_name, Some(&att_name))
                };
            }
            None => {
                desc = desc.with_slot(&slot_name, None);
            }
        }
    }
    desc
}

/// A mesh attachment with `triangles` independent triangles.
pub fn big_mesh(triangles: usize) -> SkeletonDataDesc {
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();
    for t in 0..triangles {
        let x = t as f32;
        positions.push(Vec2::new(x, 0.0));
        positions.push(Vec2::new(x + 1.0, 0.0));
        positions.push(Vec2::new(x, 1.0));
        uvs.extend([Vec2::ZERO, Vec2::X, Vec2::Y]);
        let base = (t * 3) as u16;
        indices.extend([base, base + 1, base + 2]);
    }
    SkeletonDataDesc::new()
        .with_bone("root", Vec2::ZERO, Vec2::new(10.0, 0.0))
        .with_slot("cloth", Some("cloth-mesh"))
        .with_mesh(
            "cloth-mesh",
            MeshAttachmentDesc {
                positions,
                uvs,
                indices,
                color: Color::WHITE,
                page: PageId(0),
            },
        )
}

/// Create a node owning a freshly loaded copy of `desc`.
pub fn spawn(engine: &SharedPoseEngine<FixturePoseEngine>, desc: SkeletonDataDesc) -> FixtureNode {
    let data = engine.lock().add_data(desc);
    SkeletonNode::with_data(engine.clone(), data, true).expect("fixture skeleton creation")
}

/// Run one full frame: update, draw, execute.
pub fn run_frame(scene: &mut FixtureScene, delta: f32) -> DrawList {
    let mut queue = RenderQueue::new();
    scene.update(delta);
    scene.draw(&mut queue);
    Renderer::execute(scene, &mut queue)
}

pub fn assert_color_near(actual: [f32; 4], expected: [f32; 4]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (a - e).abs() < 1e-5,
            "color {actual:?} differs from {expected:?}"
        );
    }
}
