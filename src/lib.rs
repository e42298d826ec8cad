//! Skeletal2D - a scene-graph node for skinned 2D skeletal animation
//!
//! The crate renders skeletons (bones, slots, attachments) posed by an
//! external skeletal-animation runtime, batching the resulting geometry
//! per texture page and blend state.
//!
//! # Architecture
//! - [`pose`] - the consumed pose engine seam: opaque handles, world
//!   vertex queries, and a fixture implementation for tests
//! - [`atlas`] - texture pages with premultiplied-alpha metadata
//! - [`render`] - the growable triangle batching surface, blend state
//!   selection, and the deferred render-command queue
//! - [`scene`] - a minimal host: transforms, lifecycle scheduling, and
//!   ordered command execution
//! - [`skeleton`] - the renderable skeleton node itself
//!
//! # Frame flow
//! ```ignore
//! use skeletal2d::{Renderer, RenderQueue, Scene};
//!
//! let mut queue = RenderQueue::new();
//! scene.update(delta);            // advance pose clocks
//! scene.draw(&mut queue);         // enqueue one command per node
//! let frame = Renderer::execute(&mut scene, &mut queue);
//! // hand frame.draws() to the GPU backend
//! ```

pub mod atlas;
pub mod pose;
pub mod render;
pub mod scene;
pub mod skeleton;

pub use atlas::{Atlas, AtlasError, TexturePage};
pub use pose::{PoseEngine, PoseError, SharedPoseEngine};
pub use render::{BlendFactor, BlendState, DrawCall, DrawList, RenderQueue};
pub use scene::{NodeId, Rect, Renderer, Scene, Transform2d};
pub use skeleton::{DebugFlags, SkeletonError, SkeletonNode};
