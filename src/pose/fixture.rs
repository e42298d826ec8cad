//! Fixture pose engine for testing and headless development.
//!
//! This engine performs no animation math. Skeleton descriptions are
//! built programmatically with [`SkeletonDataDesc`], attachment geometry
//! is static, and the instance clock simply accumulates. It provides a
//! valid [`PoseEngine`] implementation for exercising the node without
//! a real skeletal-animation runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::atlas::Atlas;
use crate::render::Color;

use super::engine::{PoseEngine, PoseError, PoseResult};
use super::types::{
    AttachmentKind, AttachmentRef, BoneId, BonePose, MeshGeometry, PageId, RegionGeometry,
    SkeletonDataHandle, SkeletonHandle, SlotId, SlotInfo,
};

/// Region attachment description: a static world-space quad.
#[derive(Debug, Clone)]
pub struct RegionAttachmentDesc {
    pub positions: [Vec2; 4],
    pub uvs: [Vec2; 4],
    pub color: Color,
    pub page: PageId,
}

impl RegionAttachmentDesc {
    /// Axis-aligned quad centered at `center` with the full page mapped.
    pub fn quad(page: PageId, center: Vec2, half_extent: f32) -> Self {
        let h = half_extent;
        Self {
            positions: [
                center + Vec2::new(-h, -h),
                center + Vec2::new(h, -h),
                center + Vec2::new(h, h),
                center + Vec2::new(-h, h),
            ],
            uvs: [
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
            color: Color::WHITE,
            page,
        }
    }
}

/// Mesh attachment description: static vertices with a triangle list.
#[derive(Debug, Clone)]
pub struct MeshAttachmentDesc {
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub color: Color,
    pub page: PageId,
}

#[derive(Debug, Clone)]
pub enum AttachmentDesc {
    Region(RegionAttachmentDesc),
    Mesh(MeshAttachmentDesc),
}

impl AttachmentDesc {
    fn kind(&self) -> AttachmentKind {
        match self {
            AttachmentDesc::Region(_) => AttachmentKind::Region,
            AttachmentDesc::Mesh(_) => AttachmentKind::Mesh,
        }
    }

    fn page(&self) -> PageId {
        match self {
            AttachmentDesc::Region(r) => r.page,
            AttachmentDesc::Mesh(m) => m.page,
        }
    }
}

#[derive(Debug, Clone)]
struct BoneDesc {
    name: String,
    origin: Vec2,
    tip: Vec2,
}

#[derive(Debug, Clone)]
struct SlotDesc {
    name: String,
    additive_blending: bool,
    /// Setup-pose attachment binding.
    attachment: Option<String>,
}

/// Programmatic skeleton description for the fixture engine.
#[derive(Debug, Clone, Default)]
pub struct SkeletonDataDesc {
    bones: Vec<BoneDesc>,
    slots: Vec<SlotDesc>,
    attachments: HashMap<String, AttachmentDesc>,
    skins: HashMap<String, HashMap<String, String>>,
}

impl SkeletonDataDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bone(mut self, name: &str, origin: Vec2, tip: Vec2) -> Self {
        self.bones.push(BoneDesc {
            name: name.to_string(),
            origin,
            tip,
        });
        self
    }

    /// Add a slot with an optional setup-pose attachment.
    pub fn with_slot(mut self, name: &str, attachment: Option<&str>) -> Self {
        self.slots.push(SlotDesc {
            name: name.to_string(),
            additive_blending: false,
            attachment: attachment.map(str::to_string),
        });
        self
    }

    /// Add a slot flagged for additive blending.
    pub fn with_additive_slot(mut self, name: &str, attachment: Option<&str>) -> Self {
        self.slots.push(SlotDesc {
            name: name.to_string(),
            additive_blending: true,
            attachment: attachment.map(str::to_string),
        });
        self
    }

    pub fn with_region(mut self, name: &str, desc: RegionAttachmentDesc) -> Self {
        self.attachments
            .insert(name.to_string(), AttachmentDesc::Region(desc));
        self
    }

    pub fn with_mesh(mut self, name: &str, desc: MeshAttachmentDesc) -> Self {
        self.attachments
            .insert(name.to_string(), AttachmentDesc::Mesh(desc));
        self
    }

    /// Register a named skin mapping slot names to attachment names.
    pub fn with_skin(mut self, name: &str, entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(slot, att)| (slot.to_string(), att.to_string()))
            .collect();
        self.skins.insert(name.to_string(), map);
        self
    }

    fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    fn setup_bindings(&self) -> Vec<Option<String>> {
        self.slots.iter().map(|s| s.attachment.clone()).collect()
    }
}

#[derive(Debug)]
struct LoadedData {
    desc: SkeletonDataDesc,
    scale: f32,
}

#[derive(Debug)]
struct SkeletonState {
    data: SkeletonDataHandle,
    time: f32,
    skin: Option<String>,
    bindings: Vec<Option<String>>,
}

/// Fixture pose engine.
#[derive(Debug, Default)]
pub struct FixturePoseEngine {
    registry: HashMap<PathBuf, SkeletonDataDesc>,
    data: Vec<Option<LoadedData>>,
    skeletons: Vec<Option<SkeletonState>>,
    last_error: Option<String>,
}

impl FixturePoseEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a description under a path key so file-based loading
    /// resolves it.
    pub fn register_data(&mut self, path: impl Into<PathBuf>, desc: SkeletonDataDesc) {
        self.registry.insert(path.into(), desc);
    }

    /// Load a description directly, bypassing the path registry.
    pub fn add_data(&mut self, desc: SkeletonDataDesc) -> SkeletonDataHandle {
        let handle = SkeletonDataHandle::from_raw(self.data.len() as u64);
        self.data.push(Some(LoadedData { desc, scale: 1.0 }));
        handle
    }

    /// Scale recorded when the data was loaded.
    pub fn loaded_scale(&self, data: SkeletonDataHandle) -> f32 {
        self.data_ref(data).scale
    }

    pub fn live_data_count(&self) -> usize {
        self.data.iter().flatten().count()
    }

    pub fn live_skeleton_count(&self) -> usize {
        self.skeletons.iter().flatten().count()
    }

    fn data_ref(&self, handle: SkeletonDataHandle) -> &LoadedData {
        match self
            .data
            .get(handle.raw() as usize)
            .and_then(|d| d.as_ref())
        {
            Some(data) => data,
            None => panic!("skeleton data handle {:?} is not live", handle),
        }
    }

    fn state(&self, handle: SkeletonHandle) -> &SkeletonState {
        match self
            .skeletons
            .get(handle.raw() as usize)
            .and_then(|s| s.as_ref())
        {
            Some(state) => state,
            None => panic!("skeleton handle {:?} is not live", handle),
        }
    }

    fn state_mut(&mut self, handle: SkeletonHandle) -> &mut SkeletonState {
        match self
            .skeletons
            .get_mut(handle.raw() as usize)
            .and_then(|s| s.as_mut())
        {
            Some(state) => state,
            None => panic!("skeleton handle {:?} is not live", handle),
        }
    }

    fn attachment_desc<'a>(
        &'a self,
        state: &SkeletonState,
        slot: SlotId,
    ) -> Option<&'a AttachmentDesc> {
        let name = state.bindings.get(slot.0)?.as_deref()?;
        self.data_ref(state.data).desc.attachments.get(name)
    }
}

impl PoseEngine for FixturePoseEngine {
    fn load_skeleton_data(
        &mut self,
        path: &Path,
        _atlas: &Atlas,
        scale: f32,
    ) -> PoseResult<SkeletonDataHandle> {
        let Some(desc) = self.registry.get(path).cloned() else {
            let reason = "file not registered with fixture engine".to_string();
            self.last_error = Some(format!(
                "failed to read skeleton data {}: {reason}",
                path.display()
            ));
            return Err(PoseError::DataLoadFailed {
                path: path.display().to_string(),
                reason,
            });
        };
        let handle = SkeletonDataHandle::from_raw(self.data.len() as u64);
        self.data.push(Some(LoadedData { desc, scale }));
        log::debug!("fixture: loaded skeleton data {} as {:?}", path.display(), handle);
        Ok(handle)
    }

    fn dispose_skeleton_data(&mut self, data: SkeletonDataHandle) {
        if let Some(slot) = self.data.get_mut(data.raw() as usize) {
            *slot = None;
        }
    }

    fn create_skeleton(&mut self, data: SkeletonDataHandle) -> PoseResult<SkeletonHandle> {
        let bindings = match self.data.get(data.raw() as usize).and_then(|d| d.as_ref()) {
            Some(loaded) => loaded.desc.setup_bindings(),
            None => return Err(PoseError::StaleData),
        };
        let handle = SkeletonHandle::from_raw(self.skeletons.len() as u64);
        self.skeletons.push(Some(SkeletonState {
            data,
            time: 0.0,
            skin: None,
            bindings,
        }));
        Ok(handle)
    }

    fn dispose_skeleton(&mut self, skeleton: SkeletonHandle) {
        if let Some(slot) = self.skeletons.get_mut(skeleton.raw() as usize) {
            *slot = None;
        }
    }

    fn advance_time(&mut self, skeleton: SkeletonHandle, delta: f32) {
        self.state_mut(skeleton).time += delta;
    }

    fn time(&self, skeleton: SkeletonHandle) -> f32 {
        self.state(skeleton).time
    }

    fn set_to_setup_pose(&mut self, skeleton: SkeletonHandle) {
        self.set_bones_to_setup_pose(skeleton);
        self.set_slots_to_setup_pose(skeleton);
    }

    fn set_bones_to_setup_pose(&mut self, _skeleton: SkeletonHandle) {
        // Fixture bones are static; nothing to restore.
    }

    fn set_slots_to_setup_pose(&mut self, skeleton: SkeletonHandle) {
        let state = self.state(skeleton);
        let desc = &self.data_ref(state.data).desc;
        let mut bindings = desc.setup_bindings();
        if let Some(skin) = state.skin.as_ref().and_then(|s| desc.skins.get(s)) {
            for (slot_name, att_name) in skin {
                if let Some(index) = desc.slot_index(slot_name) {
                    bindings[index] = Some(att_name.clone());
                }
            }
        }
        self.state_mut(skeleton).bindings = bindings;
    }

    fn find_bone(&self, skeleton: SkeletonHandle, name: &str) -> Option<BoneId> {
        let state = self.state(skeleton);
        self.data_ref(state.data)
            .desc
            .bones
            .iter()
            .position(|b| b.name == name)
            .map(BoneId)
    }

    fn find_slot(&self, skeleton: SkeletonHandle, name: &str) -> Option<SlotId> {
        let state = self.state(skeleton);
        self.data_ref(state.data).desc.slot_index(name).map(SlotId)
    }

    fn set_skin(&mut self, skeleton: SkeletonHandle, name: &str) -> bool {
        let state = self.state(skeleton);
        let desc = &self.data_ref(state.data).desc;
        let Some(skin) = desc.skins.get(name) else {
            return false;
        };
        let mut updates = Vec::new();
        for (slot_name, att_name) in skin {
            if let Some(index) = desc.slot_index(slot_name) {
                updates.push((index, att_name.clone()));
            }
        }
        let state = self.state_mut(skeleton);
        state.skin = Some(name.to_string());
        for (index, att_name) in updates {
            state.bindings[index] = Some(att_name);
        }
        true
    }

    fn attachment(
        &self,
        skeleton: SkeletonHandle,
        slot_name: &str,
        attachment_name: &str,
    ) -> Option<AttachmentRef> {
        let state = self.state(skeleton);
        let desc = &self.data_ref(state.data).desc;
        desc.slot_index(slot_name)?;
        desc.attachments.get(attachment_name).map(|att| AttachmentRef {
            name: attachment_name.to_string(),
            kind: att.kind(),
            page: att.page(),
        })
    }

    fn set_attachment(
        &mut self,
        skeleton: SkeletonHandle,
        slot_name: &str,
        attachment_name: Option<&str>,
    ) -> bool {
        let state = self.state(skeleton);
        let desc = &self.data_ref(state.data).desc;
        let Some(index) = desc.slot_index(slot_name) else {
            return false;
        };
        match attachment_name {
            Some(name) => {
                if !desc.attachments.contains_key(name) {
                    return false;
                }
                let binding = Some(name.to_string());
                self.state_mut(skeleton).bindings[index] = binding;
            }
            None => self.state_mut(skeleton).bindings[index] = None,
        }
        true
    }

    fn slot_count(&self, skeleton: SkeletonHandle) -> usize {
        let state = self.state(skeleton);
        self.data_ref(state.data).desc.slots.len()
    }

    fn draw_order(&self, skeleton: SkeletonHandle) -> Vec<SlotId> {
        (0..self.slot_count(skeleton)).map(SlotId).collect()
    }

    fn slot_info(&self, skeleton: SkeletonHandle, slot: SlotId) -> SlotInfo {
        let state = self.state(skeleton);
        let desc = &self.data_ref(state.data).desc;
        let slot_desc = &desc.slots[slot.0];
        let attachment = state.bindings[slot.0].as_ref().and_then(|name| {
            desc.attachments.get(name).map(|att| AttachmentRef {
                name: name.clone(),
                kind: att.kind(),
                page: att.page(),
            })
        });
        SlotInfo {
            name: slot_desc.name.clone(),
            attachment,
            additive_blending: slot_desc.additive_blending,
        }
    }

    fn region_geometry(&self, skeleton: SkeletonHandle, slot: SlotId) -> RegionGeometry {
        let state = self.state(skeleton);
        let scale = self.data_ref(state.data).scale;
        match self.attachment_desc(state, slot) {
            Some(AttachmentDesc::Region(region)) => RegionGeometry {
                positions: region.positions.map(|p| p * scale),
                uvs: region.uvs,
                color: region.color,
            },
            _ => panic!("slot {:?} is not bound to a region attachment", slot),
        }
    }

    fn mesh_geometry(&self, skeleton: SkeletonHandle, slot: SlotId) -> MeshGeometry {
        let state = self.state(skeleton);
        let scale = self.data_ref(state.data).scale;
        match self.attachment_desc(state, slot) {
            Some(AttachmentDesc::Mesh(mesh)) => MeshGeometry {
                positions: mesh.positions.iter().map(|p| *p * scale).collect(),
                uvs: mesh.uvs.clone(),
                indices: mesh.indices.clone(),
                color: mesh.color,
            },
            _ => panic!("slot {:?} is not bound to a mesh attachment", slot),
        }
    }

    fn bone_count(&self, skeleton: SkeletonHandle) -> usize {
        let state = self.state(skeleton);
        self.data_ref(state.data).desc.bones.len()
    }

    fn bone_pose(&self, skeleton: SkeletonHandle, bone: BoneId) -> BonePose {
        let state = self.state(skeleton);
        let loaded = self.data_ref(state.data);
        let desc = &loaded.desc.bones[bone.0];
        BonePose {
            origin: desc.origin * loaded.scale,
            tip: desc.tip * loaded.scale,
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_slot_desc() -> SkeletonDataDesc {
        SkeletonDataDesc::new()
            .with_bone("root", Vec2::ZERO, Vec2::new(10.0, 0.0))
            .with_slot("body", Some("body-region"))
            .with_slot("head", Some("head-region"))
            .with_region(
                "body-region",
                RegionAttachmentDesc::quad(PageId(0), Vec2::ZERO, 5.0),
            )
            .with_region(
                "head-region",
                RegionAttachmentDesc::quad(PageId(0), Vec2::new(0.0, 8.0), 2.0),
            )
            .with_region(
                "helmet",
                RegionAttachmentDesc::quad(PageId(1), Vec2::new(0.0, 8.0), 2.0),
            )
            .with_skin("armored", &[("head", "helmet")])
    }

    #[test]
    fn time_accumulates_across_updates() {
        let mut engine = FixturePoseEngine::new();
        let data = engine.add_data(two_slot_desc());
        let skeleton = engine.create_skeleton(data).unwrap();
        engine.advance_time(skeleton, 0.25);
        engine.advance_time(skeleton, 0.5);
        assert_eq!(engine.time(skeleton), 0.75);
    }

    #[test]
    fn unknown_skin_is_rejected_without_mutation() {
        let mut engine = FixturePoseEngine::new();
        let data = engine.add_data(two_slot_desc());
        let skeleton = engine.create_skeleton(data).unwrap();
        let before = engine.slot_info(skeleton, SlotId(1));

        assert!(!engine.set_skin(skeleton, "missing"));
        let after = engine.slot_info(skeleton, SlotId(1));
        assert_eq!(before.attachment, after.attachment);

        assert!(engine.set_skin(skeleton, "armored"));
        let swapped = engine.slot_info(skeleton, SlotId(1));
        assert_eq!(swapped.attachment.unwrap().name, "helmet");
    }

    #[test]
    fn setup_pose_restores_skin_bindings() {
        let mut engine = FixturePoseEngine::new();
        let data = engine.add_data(two_slot_desc());
        let skeleton = engine.create_skeleton(data).unwrap();
        assert!(engine.set_skin(skeleton, "armored"));
        assert!(engine.set_attachment(skeleton, "head", None));
        assert!(engine.slot_info(skeleton, SlotId(1)).attachment.is_none());

        engine.set_slots_to_setup_pose(skeleton);
        let info = engine.slot_info(skeleton, SlotId(1));
        assert_eq!(info.attachment.unwrap().name, "helmet");
    }

    #[test]
    fn unregistered_path_fails_with_last_error() {
        let mut engine = FixturePoseEngine::new();
        let atlas = Atlas::new();
        let result = engine.load_skeleton_data(Path::new("missing.skel"), &atlas, 1.0);
        assert!(result.is_err());
        assert!(engine.last_error().is_some());
    }

    #[test]
    fn set_attachment_rejects_unknown_names() {
        let mut engine = FixturePoseEngine::new();
        let data = engine.add_data(two_slot_desc());
        let skeleton = engine.create_skeleton(data).unwrap();
        assert!(!engine.set_attachment(skeleton, "head", Some("missing")));
        assert!(!engine.set_attachment(skeleton, "missing", Some("helmet")));
        assert!(engine.set_attachment(skeleton, "head", Some("helmet")));
    }
}
