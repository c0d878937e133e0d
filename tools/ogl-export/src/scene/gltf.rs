//! glTF/GLB scene source

use ::gltf::mesh::Mode;
use anyhow::{Context, Result, bail};
use glam::Mat4;
use std::path::Path;

use super::{ObjectKind, SceneObject, SceneSource};
use crate::mesh::{Channels, Corner, DEFAULT_COLOR, DEFAULT_UV, Face, SourceMesh};

/// Scene read from a glTF/GLB file
///
/// Every node of the default scene is one object, in depth-first order.
#[derive(Debug, Clone)]
pub struct GltfScene {
    objects: Vec<SceneObject>,
}

impl GltfScene {
    pub fn load(path: &Path) -> Result<Self> {
        let (document, buffers, _images) =
            ::gltf::import(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;
        Self::from_document(&document, &buffers)
            .with_context(|| format!("Failed to read glTF scene: {:?}", path))
    }

    pub fn from_document(
        document: &::gltf::Document,
        buffers: &[::gltf::buffer::Data],
    ) -> Result<Self> {
        let mut nodes = Vec::new();
        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => {
                for root in scene.nodes() {
                    collect_depth_first(root, &mut nodes);
                }
            }
            // No scene at all: fall back to every node in file order
            None => nodes.extend(document.nodes()),
        }

        let objects = nodes
            .iter()
            .map(|node| read_object(node, buffers))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { objects })
    }
}

impl SceneSource for GltfScene {
    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn active_object(&self) -> Option<&str> {
        self.objects
            .iter()
            .find(|o| o.kind.is_mesh_like())
            .map(|o| o.name.as_str())
    }
}

fn collect_depth_first<'a>(node: ::gltf::Node<'a>, out: &mut Vec<::gltf::Node<'a>>) {
    let children: Vec<_> = node.children().collect();
    out.push(node);
    for child in children {
        collect_depth_first(child, out);
    }
}

fn object_name(node: &::gltf::Node<'_>) -> String {
    node.name()
        .or_else(|| node.mesh().and_then(|m| m.name()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

fn read_object(node: &::gltf::Node<'_>, buffers: &[::gltf::buffer::Data]) -> Result<SceneObject> {
    let name = object_name(node);
    let transform = Mat4::from_cols_array_2d(&node.transform().matrix());

    let mesh = match node.mesh() {
        Some(mesh) => Some(
            read_mesh(&mesh, buffers).with_context(|| format!("Failed to read mesh of '{}'", name))?,
        ),
        None => None,
    };

    Ok(SceneObject {
        name,
        kind: if mesh.is_some() {
            ObjectKind::Mesh
        } else {
            ObjectKind::Empty
        },
        transform,
        mesh,
    })
}

/// Turn every triangle-list primitive of `mesh` into triangle faces
fn read_mesh(mesh: &::gltf::Mesh<'_>, buffers: &[::gltf::buffer::Data]) -> Result<SourceMesh> {
    let mut faces = Vec::new();
    let mut channels = Channels {
        has_uv: false,
        has_color: false,
    };

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} of mesh {:?}: mode {:?} is not a triangle list",
                primitive.index(),
                mesh.name(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("No positions in primitive")?
            .collect();
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
        let uvs: Option<Vec<[f32; 2]>> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().collect());
        let colors: Option<Vec<[f32; 3]>> = reader
            .read_colors(0)
            .map(|iter| iter.into_rgb_f32().collect());

        for (attribute, len) in [
            ("NORMAL", normals.as_ref().map(Vec::len)),
            ("TEXCOORD_0", uvs.as_ref().map(Vec::len)),
            ("COLOR_0", colors.as_ref().map(Vec::len)),
        ] {
            if let Some(len) = len.filter(|&len| len != positions.len()) {
                bail!(
                    "{} has {} entries but primitive {} has {} positions",
                    attribute,
                    len,
                    primitive.index(),
                    positions.len()
                );
            }
        }

        channels.has_uv |= uvs.is_some();
        channels.has_color |= colors.is_some();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            bail!(
                "Index {} exceeds vertex count {} in primitive {}",
                bad,
                positions.len(),
                primitive.index()
            );
        }

        let corner = |i: u32| {
            let i = i as usize;
            Corner {
                position: positions[i],
                normal: normals.as_ref().map_or([0.0; 3], |n| n[i]),
                uv: uvs.as_ref().map_or(DEFAULT_UV, |t| t[i]),
                color: colors.as_ref().map_or(DEFAULT_COLOR, |c| c[i]),
            }
        };

        for tri in indices.chunks_exact(3) {
            let corners = tri.iter().map(|&i| corner(i));
            faces.push(if normals.is_some() {
                Face::smooth(corners)
            } else {
                Face::flat(corners)
            });
        }
    }

    Ok(SourceMesh { faces, channels })
}
