//! Common types shared across pose engine implementations.

use glam::Vec2;

use crate::render::Color;

/// Handle to a loaded skeleton description (bones, slots, attachments, skins).
///
/// The description is shared: several skeleton instances may be created from
/// one data handle. Disposal is explicit via
/// [`PoseEngine::dispose_skeleton_data`](super::PoseEngine::dispose_skeleton_data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkeletonDataHandle(u64);

impl SkeletonDataHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle to a skeleton instance with mutable runtime pose state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkeletonHandle(u64);

impl SkeletonHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Index of a bone within a skeleton instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneId(pub usize);

/// Index of a slot within a skeleton instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Index of a texture page within an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub usize);

/// Attachment variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// A textured quad driven by a single bone.
    Region,
    /// A deformable triangle mesh with engine-supplied indices.
    Mesh,
}

/// Reference to an attachment resolved through the pose engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub name: String,
    pub kind: AttachmentKind,
    /// Texture page backing this attachment.
    pub page: PageId,
}

/// Per-slot state read back from the pose engine.
#[derive(Debug, Clone)]
pub struct SlotInfo {
    pub name: String,
    /// Currently bound attachment, `None` when the slot draws nothing.
    pub attachment: Option<AttachmentRef>,
    /// Slot requests additive blending.
    pub additive_blending: bool,
}

/// World-space geometry for a region attachment: 4 corners, 2 triangles.
#[derive(Debug, Clone, Copy)]
pub struct RegionGeometry {
    pub positions: [Vec2; 4],
    pub uvs: [Vec2; 4],
    /// Slot color, multiplied into the node tint at submission time.
    pub color: Color,
}

/// World-space geometry for a mesh attachment.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    /// Triangle list indexing into `positions`/`uvs`.
    pub indices: Vec<u16>,
    pub color: Color,
}

impl MeshGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// World-space bone pose used by the debug overlay.
#[derive(Debug, Clone, Copy)]
pub struct BonePose {
    /// Bone origin in world space.
    pub origin: Vec2,
    /// Origin displaced along the bone by its length.
    pub tip: Vec2,
}
