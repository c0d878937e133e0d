//! Scene sources
//!
//! A scene is an ordered list of named objects; mesh-like objects carry a
//! tessellated [`SourceMesh`]. Sources are loaded from OBJ or glTF/GLB files.

mod gltf;
mod obj;

use anyhow::{Result, bail};
use glam::Mat4;
use std::path::Path;

use crate::mesh::SourceMesh;

pub use self::gltf::GltfScene;
pub use self::obj::ObjScene;

/// Kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Curve,
    /// Anything without geometry (transform nodes, cameras, lights)
    Empty,
}

impl ObjectKind {
    /// Whether objects of this kind are exported when exporting a whole scene
    pub fn is_mesh_like(self) -> bool {
        matches!(self, ObjectKind::Mesh | ObjectKind::Curve)
    }
}

/// One object of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Object-local transform
    pub transform: Mat4,
    pub mesh: Option<SourceMesh>,
}

/// Provider of scene objects
pub trait SceneSource {
    /// All objects, in scene order
    fn objects(&self) -> &[SceneObject];

    /// Name of the object exported when not exporting the whole scene
    fn active_object(&self) -> Option<&str>;

    /// Look up an object by name
    fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects().iter().find(|o| o.name == name)
    }
}

/// Load a scene, picking the loader by file extension
pub fn load_scene(path: &Path) -> Result<Box<dyn SceneSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => Ok(Box::new(ObjScene::load(path)?)),
        "gltf" | "glb" => Ok(Box::new(GltfScene::load(path)?)),
        _ => bail!(
            "Unsupported scene format: {:?} (use .obj, .gltf, or .glb)",
            path
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_like_kinds() {
        assert!(ObjectKind::Mesh.is_mesh_like());
        assert!(ObjectKind::Curve.is_mesh_like());
        assert!(!ObjectKind::Empty.is_mesh_like());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_scene(Path::new("scene.fbx")).err().unwrap();
        assert!(err.to_string().contains("Unsupported scene format"));
    }
}
