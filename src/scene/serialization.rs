use crate::scene::SceneDocument;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mesh {mesh} references material {material}, but the scene has {count} materials")]
    MissingMaterial {
        mesh: String,
        material: usize,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn save_scene_to_file(scene: &SceneDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(scene)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_scene_from_file(path: &Path) -> Result<SceneDocument> {
    let json = std::fs::read_to_string(path)?;
    let scene: SceneDocument = serde_json::from_str(&json)?;
    validate(&scene)?;
    Ok(scene)
}

fn validate(scene: &SceneDocument) -> Result<()> {
    let count = scene.materials.len();
    for mesh in &scene.meshes {
        if let Some(material) = mesh.materials.iter().find(|id| **id >= count) {
            return Err(SerializationError::MissingMaterial {
                mesh: mesh.name.clone(),
                material: *material,
                count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{MapSlot, TextureColorSpace};
    use crate::scene::{MaterialRecord, MeshRecord, TextureBinding};
    use glam::Vec4;

    #[test]
    fn test_empty_scene_serialization() {
        let scene = SceneDocument::new();
        let json = serde_json::to_string_pretty(&scene).unwrap();
        let loaded: SceneDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.materials.len(), 0);
        assert_eq!(loaded.meshes.len(), 0);
    }

    #[test]
    fn test_minimal_manifest_takes_defaults() {
        let json = r#"{
            "materials": [{ "name": "DevilHeadMtl" }],
            "meshes": [{ "name": "Head", "materials": [0] }]
        }"#;
        let scene: SceneDocument = serde_json::from_str(json).unwrap();
        let material = &scene.materials[0];
        assert_eq!(material.tint, Vec4::ONE);
        assert!(!material.vertex_colors);
        assert!(material.references.is_empty());
        assert!(scene.meshes[0].uv_channels.is_empty());
    }

    #[test]
    fn test_bindings_roundtrip_via_file() {
        let mut scene = SceneDocument::new();
        let mut material = MaterialRecord::new("Body")
            .with_tint(Vec4::new(0.2, 0.3, 0.4, 1.0))
            .with_reference(MapSlot::Normal, "textures/Body_Normal.png");
        material.bindings.insert(
            MapSlot::BaseColor,
            TextureBinding {
                key: "WhiteBodyMtl_BaseColor.png".to_string(),
                filename: "WhiteBodyMtl_BaseColor.png".to_string(),
                color_space: TextureColorSpace::Srgb,
                source_hash: Some("abc123".to_string()),
            },
        );
        let body = scene.add_material(material);
        scene.add_mesh(
            MeshRecord::new("Body", vec![body])
                .with_vertex_colors(true)
                .with_uv_channel(vec![[0.0, 1.0]]),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        save_scene_to_file(&scene, &path).unwrap();
        let loaded = load_scene_from_file(&path).unwrap();
        assert_eq!(loaded, scene);

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"BaseColor\""));
        assert!(json.contains("\"Srgb\""));
    }

    #[test]
    fn test_dangling_material_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(
            &path,
            r#"{ "materials": [], "meshes": [{ "name": "Orphan", "materials": [3] }] }"#,
        )
        .unwrap();
        let err = load_scene_from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            SerializationError::MissingMaterial { material: 3, count: 0, .. }
        ));
    }
}
