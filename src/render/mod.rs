//! Batching surface, blend state, and deferred draw submission.

mod batch;
mod blend;
mod draw_list;
mod queue;
mod vertex;

pub use batch::{
    DEFAULT_TRIANGLE_CAPACITY, MAX_TRIANGLE_CAPACITY, MAX_VERTEX_CAPACITY, TriangleBatch,
};
pub use blend::{BlendFactor, BlendState};
pub use draw_list::{DebugLine, DebugPoint, DrawCall, DrawList};
pub use queue::{NodeCommand, RenderQueue};
pub use vertex::{Color, Vertex2d};
