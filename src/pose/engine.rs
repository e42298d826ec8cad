//! The consumed pose engine interface.

use std::path::Path;

use thiserror::Error;

use crate::atlas::Atlas;

use super::types::{
    AttachmentRef, BoneId, BonePose, MeshGeometry, RegionGeometry, SkeletonDataHandle,
    SkeletonHandle, SlotId, SlotInfo,
};

/// Errors reported by a pose engine.
#[derive(Debug, Clone, Error)]
pub enum PoseError {
    #[error("failed to read skeleton data {path}: {reason}")]
    DataLoadFailed { path: String, reason: String },
    #[error("skeleton data handle is not live")]
    StaleData,
    #[error("skeleton handle is not live")]
    StaleSkeleton,
}

pub type PoseResult<T> = Result<T, PoseError>;

/// External skeletal-animation runtime.
///
/// The engine owns all pose state behind opaque handles: skeleton
/// descriptions ([`SkeletonDataHandle`]) and per-instance runtime pose
/// ([`SkeletonHandle`]). The node forwards queries and mutations through
/// this trait and never inspects pose internals.
///
/// Query methods taking a handle require it to be live (created and not
/// yet disposed); passing a stale handle is a contract violation and
/// implementations may panic.
pub trait PoseEngine {
    /// Load a skeleton description from `path`, resolving attachment
    /// texture regions against `atlas` and applying `scale` to all
    /// authored coordinates.
    fn load_skeleton_data(
        &mut self,
        path: &Path,
        atlas: &Atlas,
        scale: f32,
    ) -> PoseResult<SkeletonDataHandle>;

    /// Release a shared skeleton description.
    fn dispose_skeleton_data(&mut self, data: SkeletonDataHandle);

    /// Create a skeleton instance in setup pose.
    fn create_skeleton(&mut self, data: SkeletonDataHandle) -> PoseResult<SkeletonHandle>;

    /// Release a skeleton instance. The shared description is untouched.
    fn dispose_skeleton(&mut self, skeleton: SkeletonHandle);

    /// Advance the instance clock by `delta` seconds.
    fn advance_time(&mut self, skeleton: SkeletonHandle, delta: f32);

    /// Accumulated instance time in seconds.
    fn time(&self, skeleton: SkeletonHandle) -> f32;

    fn set_to_setup_pose(&mut self, skeleton: SkeletonHandle);
    fn set_bones_to_setup_pose(&mut self, skeleton: SkeletonHandle);
    fn set_slots_to_setup_pose(&mut self, skeleton: SkeletonHandle);

    fn find_bone(&self, skeleton: SkeletonHandle, name: &str) -> Option<BoneId>;
    fn find_slot(&self, skeleton: SkeletonHandle, name: &str) -> Option<SlotId>;

    /// Switch the active skin by name.
    ///
    /// Returns `false` when the skin is unknown; pose state is unchanged
    /// in that case.
    fn set_skin(&mut self, skeleton: SkeletonHandle, name: &str) -> bool;

    /// Resolve a named attachment for a named slot without binding it.
    fn attachment(
        &self,
        skeleton: SkeletonHandle,
        slot_name: &str,
        attachment_name: &str,
    ) -> Option<AttachmentRef>;

    /// Bind a named attachment to a named slot, or clear the slot with
    /// `None`. Returns `false` when the slot or attachment is unknown.
    fn set_attachment(
        &mut self,
        skeleton: SkeletonHandle,
        slot_name: &str,
        attachment_name: Option<&str>,
    ) -> bool;

    fn slot_count(&self, skeleton: SkeletonHandle) -> usize;

    /// Authoritative back-to-front slot rendering sequence.
    fn draw_order(&self, skeleton: SkeletonHandle) -> Vec<SlotId>;

    fn slot_info(&self, skeleton: SkeletonHandle, slot: SlotId) -> SlotInfo;

    /// World-space vertices for the region attachment bound to `slot`.
    fn region_geometry(&self, skeleton: SkeletonHandle, slot: SlotId) -> RegionGeometry;

    /// World-space vertices and indices for the mesh attachment bound to `slot`.
    fn mesh_geometry(&self, skeleton: SkeletonHandle, slot: SlotId) -> MeshGeometry;

    fn bone_count(&self, skeleton: SkeletonHandle) -> usize;
    fn bone_pose(&self, skeleton: SkeletonHandle, bone: BoneId) -> BonePose;

    /// Last error message recorded by the engine, if any.
    ///
    /// Fatal construction paths surface this message to the host.
    fn last_error(&self) -> Option<&str>;
}
