//! Minimal scene-graph host.
//!
//! The scene owns nodes, drives their lifecycle (entering schedules
//! per-frame updates, exiting deregisters them), and executes queued
//! render commands in submission order. Each frame is strictly ordered:
//! [`Scene::update`], [`Scene::draw`], then [`Renderer::execute`].

mod rect;
mod transform;

pub use rect::Rect;
pub use transform::Transform2d;

use crate::pose::PoseEngine;
use crate::render::{DrawList, RenderQueue};
use crate::skeleton::SkeletonNode;

/// Identifier of a node inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The scene containing renderable skeleton nodes.
pub struct Scene<P: PoseEngine> {
    content_scale_factor: f32,
    nodes: Vec<Option<SkeletonNode<P>>>,
}

impl<P: PoseEngine> Scene<P> {
    pub fn new() -> Self {
        Self::with_content_scale_factor(1.0)
    }

    /// Create a scene with a display content scale factor (points to
    /// pixels). Skeletons loaded with a zero scale default to its
    /// inverse.
    pub fn with_content_scale_factor(content_scale_factor: f32) -> Self {
        Self {
            content_scale_factor,
            nodes: Vec::new(),
        }
    }

    pub fn content_scale_factor(&self) -> f32 {
        self.content_scale_factor
    }

    /// Add a node to the scene. The node enters the graph and starts
    /// receiving per-frame updates.
    pub fn add(&mut self, mut node: SkeletonNode<P>) -> NodeId {
        node.on_enter();
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Remove a node. It exits the graph and stops receiving updates.
    pub fn remove(&mut self, id: NodeId) -> Option<SkeletonNode<P>> {
        let mut node = self.nodes.get_mut(id.0)?.take()?;
        node.on_exit();
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&SkeletonNode<P>> {
        self.nodes.get(id.0)?.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SkeletonNode<P>> {
        self.nodes.get_mut(id.0)?.as_mut()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Advance all scheduled nodes by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        for node in self.nodes.iter_mut().flatten() {
            if node.is_scheduled() {
                node.update(delta);
            }
        }
    }

    /// Let every node enqueue its deferred render command.
    pub fn draw(&self, queue: &mut RenderQueue) {
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(node) = node {
                node.draw(NodeId(index), queue);
            }
        }
    }
}

impl<P: PoseEngine> Default for Scene<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes queued render commands against the scene.
pub struct Renderer;

impl Renderer {
    /// Execute all queued commands in submission order, producing the
    /// frame's draw list.
    pub fn execute<P: PoseEngine>(scene: &mut Scene<P>, queue: &mut RenderQueue) -> DrawList {
        let mut out = DrawList::new();
        for command in queue.drain() {
            match scene.nodes.get_mut(command.node.0).and_then(|n| n.as_mut()) {
                Some(node) => node.submit(&command, &mut out),
                None => {
                    log::warn!("render command for removed node {:?}; skipping", command.node)
                }
            }
        }
        out
    }
}
