//! Deferred render command queue.
//!
//! Drawing never touches the GPU directly: a node's draw pass enqueues a
//! [`NodeCommand`] holding copies of the render state the later
//! submission pass needs. Commands are queued by value and executed by
//! the host render loop in submission order; no mutable state is
//! captured by reference across the update/draw boundary.

use glam::Mat4;

use crate::scene::NodeId;
use crate::skeleton::DebugFlags;

use super::vertex::Color;

/// A queued draw request for one node, one frame.
#[derive(Debug, Clone)]
pub struct NodeCommand {
    pub node: NodeId,
    /// Model transform captured at draw time.
    pub transform: Mat4,
    /// Base color captured at draw time.
    pub color: Color,
    /// Node opacity in `[0, 1]`.
    pub opacity: f32,
    /// Node-level premultiplied-alpha behavior.
    pub premultiplied_alpha: bool,
    /// Whether opacity also scales the rgb channels of the tint.
    pub opacity_modifies_rgb: bool,
    pub debug: DebugFlags,
}

/// Ordered queue of deferred node commands.
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<NodeCommand>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: NodeCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[NodeCommand] {
        &self.commands
    }

    /// Drain commands in submission order.
    pub fn drain(&mut self) -> impl Iterator<Item = NodeCommand> + '_ {
        self.commands.drain(..)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
