//! Export entry point: scene -> session -> header file

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::bundle::ExportSession;
use crate::formats::{EmitOptions, save_header};
use crate::scene::{SceneObject, SceneSource};

/// Settings of one export pass
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Export every mesh-like object instead of only the active one
    pub entire_scene: bool,
    /// Largest bounding-box extent after rescaling; 0 keeps the original size
    pub target_size: f32,
    /// Active object override (defaults to the scene's own active object)
    pub active: Option<String>,
    pub emit: EmitOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            entire_scene: true,
            target_size: 0.0,
            active: None,
            emit: EmitOptions::default(),
        }
    }
}

/// Objects selected for export, in scene order
pub fn select_objects<'a>(
    scene: &'a dyn SceneSource,
    options: &ExportOptions,
) -> Result<Vec<&'a SceneObject>> {
    if options.entire_scene {
        let mut selected = Vec::new();
        for object in scene.objects() {
            if !object.kind.is_mesh_like() {
                tracing::debug!("Skipping '{}' ({:?})", object.name, object.kind);
            } else if face_count(object) == 0 {
                // Its arrays would be zero-length, which is not valid C
                tracing::warn!("Skipping '{}': {:?} without faces", object.name, object.kind);
            } else {
                selected.push(object);
            }
        }
        return Ok(selected);
    }

    let name = match options.active.as_deref().or_else(|| scene.active_object()) {
        Some(name) => name,
        None => bail!("Scene has no active object"),
    };
    let object = scene
        .object(name)
        .with_context(|| format!("Object '{}' not found in scene", name))?;
    if !object.kind.is_mesh_like() {
        bail!("Object '{}' is not a mesh ({:?})", name, object.kind);
    }
    if face_count(object) == 0 {
        bail!("Object '{}' has no faces", name);
    }
    Ok(vec![object])
}

fn face_count(object: &SceneObject) -> usize {
    object.mesh.as_ref().map_or(0, |m| m.faces.len())
}

/// Consolidate the selected objects into a fresh session
pub fn build_session(scene: &dyn SceneSource, options: &ExportOptions) -> Result<ExportSession> {
    let mut session = ExportSession::new(options.target_size);
    for object in select_objects(scene, options)? {
        if let Some(mesh) = &object.mesh {
            session.add_object(&object.name, object.transform, mesh)?;
        }
    }
    if session.is_empty() {
        tracing::warn!("No mesh objects selected, the header will only declare the struct");
    }
    Ok(session)
}

/// Export a scene to a header file at `output`
///
/// Nothing is written unless every selected object converts successfully.
pub fn export(
    scene: &dyn SceneSource,
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSession> {
    tracing::info!("Exporting to {:?}", output);
    let session = build_session(scene, options)?;
    save_header(output, session.bundles(), &options.emit)?;
    Ok(session)
}
