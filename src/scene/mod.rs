pub mod serialization;

use crate::naming::{MapSlot, TextureColorSpace};
use glam::Vec4;
use std::collections::BTreeMap;

pub type MaterialId = usize;

pub const NEUTRAL_TINT: Vec4 = Vec4::ONE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvChannel {
    Primary,
    Secondary,
}

impl UvChannel {
    pub fn index(self) -> usize {
        match self {
            UvChannel::Primary => 0,
            UvChannel::Secondary => 1,
        }
    }
}

/// What a material slot holds after a texture was applied.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextureBinding {
    pub key: String,
    pub filename: String,
    pub color_space: TextureColorSpace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

/// The part of a scene graph the resolver may read and mutate.
///
/// Implementations expose meshes by index and materials by id. The resolver
/// never creates or removes meshes, materials or geometry; it only fills
/// slots, resets tint, toggles vertex colours and adds a secondary UV set.
pub trait SceneTarget {
    fn mesh_count(&self) -> usize;
    fn mesh_name(&self, mesh: usize) -> &str;
    fn mesh_materials(&self, mesh: usize) -> Vec<MaterialId>;
    /// Whether the mesh geometry carries an explicit per-vertex colour attribute.
    fn mesh_has_vertex_colors(&self, mesh: usize) -> bool;
    fn mesh_has_uv(&self, mesh: usize, channel: UvChannel) -> bool;
    fn copy_primary_uv_to_secondary(&mut self, mesh: usize);

    fn material_name(&self, material: MaterialId) -> &str;
    /// Texture path the model file already referenced for `slot`, if any.
    fn texture_reference(&self, material: MaterialId, slot: MapSlot) -> Option<&str>;
    fn slot_binding(&self, material: MaterialId, slot: MapSlot) -> Option<&TextureBinding>;
    fn set_slot(&mut self, material: MaterialId, slot: MapSlot, binding: TextureBinding);
    fn set_tint(&mut self, material: MaterialId, tint: Vec4);
    fn set_vertex_colors(&mut self, material: MaterialId, enabled: bool);
}

fn neutral_tint() -> Vec4 {
    NEUTRAL_TINT
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    #[serde(default = "neutral_tint")]
    pub tint: Vec4,
    #[serde(default)]
    pub vertex_colors: bool,
    /// Texture paths embedded in the source model, per slot.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<MapSlot, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<MapSlot, TextureBinding>,
}

impl MaterialRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tint: NEUTRAL_TINT,
            vertex_colors: false,
            references: BTreeMap::new(),
            bindings: BTreeMap::new(),
        }
    }

    pub fn with_tint(mut self, tint: Vec4) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.vertex_colors = enabled;
        self
    }

    pub fn with_reference(mut self, slot: MapSlot, path: impl Into<String>) -> Self {
        self.references.insert(slot, path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshRecord {
    pub name: String,
    pub materials: Vec<MaterialId>,
    #[serde(default)]
    pub has_vertex_colors: bool,
    /// UV sets in channel order; each holds one coordinate per vertex.
    #[serde(default)]
    pub uv_channels: Vec<Vec<[f32; 2]>>,
}

impl MeshRecord {
    pub fn new(name: impl Into<String>, materials: Vec<MaterialId>) -> Self {
        Self {
            name: name.into(),
            materials,
            has_vertex_colors: false,
            uv_channels: Vec::new(),
        }
    }

    pub fn with_vertex_colors(mut self, present: bool) -> Self {
        self.has_vertex_colors = present;
        self
    }

    pub fn with_uv_channel(mut self, coords: Vec<[f32; 2]>) -> Self {
        self.uv_channels.push(coords);
        self
    }
}

/// In-memory scene: a flat material table shared by meshes.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub meshes: Vec<MeshRecord>,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            meshes: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: MaterialRecord) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: MeshRecord) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn material(&self, id: MaterialId) -> Option<&MaterialRecord> {
        self.materials.get(id)
    }

    pub fn material_by_name(&self, name: &str) -> Option<&MaterialRecord> {
        self.materials.iter().find(|material| material.name == name)
    }

    pub fn mesh(&self, index: usize) -> Option<&MeshRecord> {
        self.meshes.get(index)
    }
}

impl SceneTarget for SceneDocument {
    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn mesh_name(&self, mesh: usize) -> &str {
        &self.meshes[mesh].name
    }

    fn mesh_materials(&self, mesh: usize) -> Vec<MaterialId> {
        let count = self.materials.len();
        self.meshes[mesh]
            .materials
            .iter()
            .copied()
            .filter(|id| {
                let known = *id < count;
                if !known {
                    log::warn!("Mesh {} references missing material {}", self.meshes[mesh].name, id);
                }
                known
            })
            .collect()
    }

    fn mesh_has_vertex_colors(&self, mesh: usize) -> bool {
        self.meshes[mesh].has_vertex_colors
    }

    fn mesh_has_uv(&self, mesh: usize, channel: UvChannel) -> bool {
        self.meshes[mesh].uv_channels.len() > channel.index()
    }

    fn copy_primary_uv_to_secondary(&mut self, mesh: usize) {
        let channels = &mut self.meshes[mesh].uv_channels;
        // Never replace an existing secondary set.
        if channels.len() == 1 {
            let primary = channels[0].clone();
            channels.push(primary);
        }
    }

    fn material_name(&self, material: MaterialId) -> &str {
        &self.materials[material].name
    }

    fn texture_reference(&self, material: MaterialId, slot: MapSlot) -> Option<&str> {
        self.materials[material]
            .references
            .get(&slot)
            .map(String::as_str)
    }

    fn slot_binding(&self, material: MaterialId, slot: MapSlot) -> Option<&TextureBinding> {
        self.materials[material].bindings.get(&slot)
    }

    fn set_slot(&mut self, material: MaterialId, slot: MapSlot, binding: TextureBinding) {
        self.materials[material].bindings.insert(slot, binding);
    }

    fn set_tint(&mut self, material: MaterialId, tint: Vec4) {
        self.materials[material].tint = tint;
    }

    fn set_vertex_colors(&mut self, material: MaterialId, enabled: bool) {
        self.materials[material].vertex_colors = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_uv_is_only_added_once() {
        let mut scene = SceneDocument::new();
        let mesh = scene.add_mesh(
            MeshRecord::new("Head", vec![])
                .with_uv_channel(vec![[0.0, 0.0], [1.0, 1.0]])
                .with_uv_channel(vec![[0.5, 0.5], [0.25, 0.25]]),
        );
        scene.copy_primary_uv_to_secondary(mesh);
        let uvs = &scene.mesh(mesh).unwrap().uv_channels;
        assert_eq!(uvs.len(), 2);
        assert_eq!(uvs[1], vec![[0.5, 0.5], [0.25, 0.25]]);
    }

    #[test]
    fn primary_uv_is_duplicated() {
        let mut scene = SceneDocument::new();
        let mesh = scene.add_mesh(MeshRecord::new("Body", vec![]).with_uv_channel(vec![[0.1, 0.2]]));
        assert!(!scene.mesh_has_uv(mesh, UvChannel::Secondary));
        scene.copy_primary_uv_to_secondary(mesh);
        assert!(scene.mesh_has_uv(mesh, UvChannel::Secondary));
        assert_eq!(scene.mesh(mesh).unwrap().uv_channels[1], vec![[0.1, 0.2]]);
    }

    #[test]
    fn dangling_material_ids_are_skipped() {
        let mut scene = SceneDocument::new();
        let body = scene.add_material(MaterialRecord::new("Body"));
        let mesh = scene.add_mesh(MeshRecord::new("Body", vec![body, 7]));
        assert_eq!(scene.mesh_materials(mesh), vec![body]);
    }

    #[test]
    fn new_material_has_neutral_tint() {
        let material = MaterialRecord::new("Hair");
        assert_eq!(material.tint, Vec4::ONE);
        assert!(!material.vertex_colors);
    }
}
