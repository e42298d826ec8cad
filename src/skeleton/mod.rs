//! The renderable skeleton node.
//!
//! [`SkeletonNode`] delegates pose computation to a [`PoseEngine`] and
//! turns the posed attachments into batched triangle geometry. Per
//! frame the host calls [`update`](SkeletonNode::update) (advance the
//! pose clock), then [`draw`](SkeletonNode::draw) (enqueue a deferred
//! command); the queued command is executed later by
//! [`Renderer::execute`](crate::scene::Renderer::execute), which walks
//! the slot draw order and routes triangles into the batching surface
//! keyed by (texture page, blend state).

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use thiserror::Error;

use crate::atlas::{Atlas, AtlasError};
use crate::pose::{
    AttachmentKind, AttachmentRef, BoneId, PoseEngine, PoseError, PoseResult, SharedPoseEngine,
    SkeletonDataHandle, SkeletonHandle, SlotId,
};
use crate::render::{
    BlendState, Color, DrawList, NodeCommand, RenderQueue, TriangleBatch, Vertex2d,
};
use crate::scene::{NodeId, Rect, Transform2d};

bitflags::bitflags! {
    /// Debug overlay selection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u32 {
        /// Wireframe quads over region attachment slots.
        const SLOTS = 1 << 0;
        /// Bone length lines and origin markers.
        const BONES = 1 << 1;
    }
}

/// Errors raised while constructing a skeleton node.
#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    Pose(#[from] PoseError),
}

/// A scene-graph node rendering one skinned 2D skeleton.
pub struct SkeletonNode<P: PoseEngine> {
    engine: SharedPoseEngine<P>,
    skeleton: SkeletonHandle,
    data: SkeletonDataHandle,
    /// Teardown disposes the shared skeleton description only when the
    /// node took ownership at construction.
    owns_data: bool,
    /// Atlas opened by this node; released on drop.
    atlas: Option<Atlas>,

    time_scale: f32,
    debug: DebugFlags,
    /// Host blend-protocol value. Slot geometry resolves its blending
    /// from the backing page and slot flags, not from this field.
    blend: BlendState,
    premultiplied_alpha: bool,
    opacity_modifies_rgb: bool,
    transform: Transform2d,
    color: Color,
    opacity: f32,
    scheduled: bool,
    batch: TriangleBatch,
}

impl<P: PoseEngine> SkeletonNode<P> {
    /// Build from an already-loaded skeleton description.
    ///
    /// With `owns_data`, dropping the node disposes the description;
    /// otherwise it stays alive for other instances sharing it.
    pub fn with_data(
        engine: SharedPoseEngine<P>,
        data: SkeletonDataHandle,
        owns_data: bool,
    ) -> PoseResult<Self> {
        let skeleton = engine.lock().create_skeleton(data)?;
        Ok(Self {
            engine,
            skeleton,
            data,
            owns_data,
            atlas: None,
            time_scale: 1.0,
            debug: DebugFlags::empty(),
            blend: BlendState::premultiplied_alpha(),
            premultiplied_alpha: true,
            opacity_modifies_rgb: true,
            transform: Transform2d::default(),
            color: Color::WHITE,
            opacity: 1.0,
            scheduled: false,
            batch: TriangleBatch::new(),
        })
    }

    /// Build by loading a skeleton description and an atlas from file
    /// paths. The node owns both.
    ///
    /// A `scale` of zero defaults to `1 / content_scale_factor`.
    pub fn try_from_files(
        engine: SharedPoseEngine<P>,
        skeleton_path: impl AsRef<Path>,
        atlas_path: impl AsRef<Path>,
        scale: f32,
        content_scale_factor: f32,
    ) -> Result<Self, SkeletonError> {
        let atlas = Atlas::from_file(atlas_path)?;
        let effective_scale = if scale == 0.0 {
            1.0 / content_scale_factor
        } else {
            scale
        };
        let data =
            engine
                .lock()
                .load_skeleton_data(skeleton_path.as_ref(), &atlas, effective_scale)?;
        let mut node = Self::with_data(engine, data, true)?;
        node.atlas = Some(atlas);
        Ok(node)
    }

    /// Like [`try_from_files`](Self::try_from_files), but a load failure
    /// halts execution with the pose engine's last error message.
    pub fn from_files(
        engine: SharedPoseEngine<P>,
        skeleton_path: impl AsRef<Path>,
        atlas_path: impl AsRef<Path>,
        scale: f32,
        content_scale_factor: f32,
    ) -> Self {
        let fallback = Arc::clone(&engine);
        match Self::try_from_files(engine, skeleton_path, atlas_path, scale, content_scale_factor)
        {
            Ok(node) => node,
            Err(err) => {
                // Only the pose path leaves a message on the engine; an
                // atlas failure never touched it, and a stale message
                // from an earlier load must not mask the actual error.
                if matches!(err, SkeletonError::Pose(_)) {
                    let engine = fallback.lock();
                    if let Some(message) = engine.last_error() {
                        panic!("{message}");
                    }
                }
                panic!("error loading skeleton: {err}")
            }
        }
    }

    // --- Lifecycle ---

    pub(crate) fn on_enter(&mut self) {
        self.scheduled = true;
    }

    pub(crate) fn on_exit(&mut self) {
        self.scheduled = false;
    }

    /// Whether the node is registered for per-frame updates.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    // --- Per-frame update ---

    /// Advance the pose clock by `delta` seconds scaled by the node's
    /// time multiplier. No geometry is computed here.
    pub fn update(&mut self, delta: f32) {
        self.engine
            .lock()
            .advance_time(self.skeleton, delta * self.time_scale);
    }

    // --- Draw submission ---

    /// Enqueue this node's deferred render command. The command carries
    /// copies of the transform and render flags; geometry is generated
    /// when the host executes the queue.
    pub fn draw(&self, id: NodeId, queue: &mut RenderQueue) {
        queue.add(NodeCommand {
            node: id,
            transform: self.transform.matrix(),
            color: self.color,
            opacity: self.opacity,
            premultiplied_alpha: self.premultiplied_alpha,
            opacity_modifies_rgb: self.opacity_modifies_rgb,
            debug: self.debug,
        });
    }

    /// Generate and batch this frame's geometry.
    pub(crate) fn submit(&mut self, cmd: &NodeCommand, out: &mut DrawList) {
        let engine = Arc::clone(&self.engine);
        let eng = engine.lock();

        // Final tint, computed once per frame.
        let mut tint = cmd.color;
        tint.a *= cmd.opacity;
        if cmd.premultiplied_alpha && cmd.opacity_modifies_rgb {
            tint = tint.premultiplied();
        }

        self.batch.reset();
        self.batch.set_transform(cmd.transform);

        for slot_id in eng.draw_order(self.skeleton) {
            let slot = eng.slot_info(self.skeleton, slot_id);
            let Some(attachment) = slot.attachment else {
                continue;
            };
            // Resolve the backing page. A page missing from a
            // self-opened atlas renders nothing.
            let page_premultiplied = match self.atlas.as_ref() {
                Some(atlas) => match atlas.page(attachment.page) {
                    Some(page) => page.premultiplied_alpha,
                    None => continue,
                },
                None => cmd.premultiplied_alpha,
            };
            let blend = BlendState::for_slot(page_premultiplied, slot.additive_blending);
            self.batch.begin(attachment.page, blend, out);

            match attachment.kind {
                AttachmentKind::Region => {
                    let geo = eng.region_geometry(self.skeleton, slot_id);
                    if !self.batch.reserve(4, 2, out) {
                        continue;
                    }
                    let color = tint.modulate(geo.color);
                    let vertices = std::array::from_fn(|i| {
                        Vertex2d::new(geo.positions[i], geo.uvs[i], color)
                    });
                    self.batch.push_region(vertices);
                }
                AttachmentKind::Mesh => {
                    let geo = eng.mesh_geometry(self.skeleton, slot_id);
                    if geo.positions.is_empty() {
                        continue;
                    }
                    if !self
                        .batch
                        .reserve(geo.positions.len(), geo.triangle_count(), out)
                    {
                        continue;
                    }
                    let color = tint.modulate(geo.color);
                    let vertices: Vec<Vertex2d> = geo
                        .positions
                        .iter()
                        .zip(&geo.uvs)
                        .map(|(position, uv)| Vertex2d::new(*position, *uv, color))
                        .collect();
                    self.batch.push_triangles(&vertices, &geo.indices);
                }
            }
        }
        self.batch.flush(out);

        if !cmd.debug.is_empty() {
            self.submit_debug_overlay(&eng, cmd, out);
        }
    }

    /// Debug overlays bypass batching and draw immediate primitives.
    fn submit_debug_overlay(&self, eng: &P, cmd: &NodeCommand, out: &mut DrawList) {
        let to_world = |p: Vec2| cmd.transform.transform_point3(p.extend(0.0)).truncate();

        if cmd.debug.contains(DebugFlags::SLOTS) {
            for slot_id in eng.draw_order(self.skeleton) {
                let slot = eng.slot_info(self.skeleton, slot_id);
                let is_region = slot
                    .attachment
                    .is_some_and(|a| a.kind == AttachmentKind::Region);
                if !is_region {
                    continue;
                }
                let geo = eng.region_geometry(self.skeleton, slot_id);
                let corners = geo.positions.map(to_world);
                out.draw_poly(&corners, Color::BLUE, 1.0);
            }
        }

        if cmd.debug.contains(DebugFlags::BONES) {
            // Bone lengths.
            for index in 0..eng.bone_count(self.skeleton) {
                let pose = eng.bone_pose(self.skeleton, BoneId(index));
                out.draw_line(to_world(pose.origin), to_world(pose.tip), Color::RED, 2.0);
            }
            // Bone origins; the root bone is blue, the rest green.
            for index in 0..eng.bone_count(self.skeleton) {
                let pose = eng.bone_pose(self.skeleton, BoneId(index));
                let color = if index == 0 { Color::BLUE } else { Color::GREEN };
                out.draw_point(to_world(pose.origin), color, 4.0);
            }
        }
    }

    // --- Bounds ---

    /// Axis-aligned bounding box of all visible attachment vertices in
    /// local space. A skeleton with no visible attachments yields the
    /// zero rect at the origin.
    pub fn local_bounds(&self) -> Rect {
        let eng = self.engine.lock();
        let mut bounds = None;
        for slot_id in eng.draw_order(self.skeleton) {
            let slot = eng.slot_info(self.skeleton, slot_id);
            let Some(attachment) = slot.attachment else {
                continue;
            };
            match attachment.kind {
                AttachmentKind::Region => {
                    for p in eng.region_geometry(self.skeleton, slot_id).positions {
                        bounds = Rect::fold(bounds, p);
                    }
                }
                AttachmentKind::Mesh => {
                    for p in eng.mesh_geometry(self.skeleton, slot_id).positions {
                        bounds = Rect::fold(bounds, p);
                    }
                }
            }
        }
        bounds.unwrap_or(Rect::ZERO)
    }

    /// Local bounds composed with the node's scale and position.
    pub fn bounding_box(&self) -> Rect {
        let local = self.local_bounds();
        let scale = self.transform.scale;
        Rect::from_min_size(
            self.transform.position + local.min * scale,
            local.size() * scale,
        )
    }

    // --- Pose query/mutation passthrough ---

    pub fn set_to_setup_pose(&mut self) {
        self.engine.lock().set_to_setup_pose(self.skeleton);
    }

    pub fn set_bones_to_setup_pose(&mut self) {
        self.engine.lock().set_bones_to_setup_pose(self.skeleton);
    }

    pub fn set_slots_to_setup_pose(&mut self) {
        self.engine.lock().set_slots_to_setup_pose(self.skeleton);
    }

    pub fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.engine.lock().find_bone(self.skeleton, name)
    }

    pub fn find_slot(&self, name: &str) -> Option<SlotId> {
        self.engine.lock().find_slot(self.skeleton, name)
    }

    /// Switch the active skin. Returns `false` for an unknown skin,
    /// leaving pose state unchanged.
    pub fn set_skin(&mut self, name: &str) -> bool {
        self.engine.lock().set_skin(self.skeleton, name)
    }

    pub fn attachment(&self, slot_name: &str, attachment_name: &str) -> Option<AttachmentRef> {
        self.engine
            .lock()
            .attachment(self.skeleton, slot_name, attachment_name)
    }

    pub fn set_attachment(&mut self, slot_name: &str, attachment_name: Option<&str>) -> bool {
        self.engine
            .lock()
            .set_attachment(self.skeleton, slot_name, attachment_name)
    }

    /// Accumulated pose time in seconds.
    pub fn pose_time(&self) -> f32 {
        self.engine.lock().time(self.skeleton)
    }

    // --- Render state accessors ---

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    pub fn set_debug_flags(&mut self, flags: DebugFlags) {
        self.debug = flags;
    }

    /// Blend state exposed to the host's node protocol. Per-slot
    /// blending is always derived from the backing page's alpha mode
    /// and the slot's additive flag.
    pub fn blend_state(&self) -> BlendState {
        self.blend
    }

    pub fn set_blend_state(&mut self, blend: BlendState) {
        self.blend = blend;
    }

    pub fn premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    pub fn set_premultiplied_alpha(&mut self, premultiplied: bool) {
        self.premultiplied_alpha = premultiplied;
    }

    pub fn opacity_modifies_rgb(&self) -> bool {
        self.opacity_modifies_rgb
    }

    pub fn set_opacity_modifies_rgb(&mut self, enabled: bool) {
        self.opacity_modifies_rgb = enabled;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    pub fn transform(&self) -> &Transform2d {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform2d {
        &mut self.transform
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.scale = scale;
    }

    /// Atlas opened by this node, if it was constructed from files.
    pub fn atlas(&self) -> Option<&Atlas> {
        self.atlas.as_ref()
    }

    pub fn skeleton_handle(&self) -> SkeletonHandle {
        self.skeleton
    }

    pub fn data_handle(&self) -> SkeletonDataHandle {
        self.data
    }

    pub fn owns_data(&self) -> bool {
        self.owns_data
    }
}

impl<P: PoseEngine> Drop for SkeletonNode<P> {
    fn drop(&mut self) {
        let mut engine = self.engine.lock();
        engine.dispose_skeleton(self.skeleton);
        if self.owns_data {
            engine.dispose_skeleton_data(self.data);
        }
    }
}
