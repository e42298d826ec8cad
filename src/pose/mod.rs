//! Pose engine seam.
//!
//! The external skeletal-animation runtime is consumed through the
//! [`PoseEngine`] trait; all pose state lives behind opaque handles.
//! The [`fixture`] module provides an in-memory implementation for
//! tests and headless runs (feature `fixture-pose`, on by default).

mod engine;
mod types;

#[cfg(feature = "fixture-pose")]
pub mod fixture;

pub use engine::{PoseEngine, PoseError, PoseResult};
pub use types::{
    AttachmentKind, AttachmentRef, BoneId, BonePose, MeshGeometry, PageId, RegionGeometry,
    SkeletonDataHandle, SkeletonHandle, SlotId, SlotInfo,
};

use std::sync::Arc;

use parking_lot::Mutex;

/// Shared ownership of a pose engine between the host and its nodes.
pub type SharedPoseEngine<P> = Arc<Mutex<P>>;

/// Wrap a pose engine for sharing.
pub fn shared<P: PoseEngine>(engine: P) -> SharedPoseEngine<P> {
    Arc::new(Mutex::new(engine))
}
