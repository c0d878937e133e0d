//! Per-object export records and the session that collects them

use glam::Mat4;
use hashbrown::HashMap;

use crate::error::ExportError;
use crate::mesh::{Mesh, SourceMesh, consolidate, rescale};
use crate::naming::SymbolNames;

/// Everything the header emitter needs for one object
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    /// Name of the source object
    pub source_name: String,
    pub names: SymbolNames,
    pub vertex_count: usize,
    /// `3 * triangle count`
    pub index_count: usize,
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub triangles: Vec<[u16; 3]>,
    /// Object-local transform, column-major
    pub transform: [f32; 16],
    /// Factor already applied to `positions`
    pub scale: f32,
}

impl ExportBundle {
    /// Combine a consolidated mesh with its object's name and transform
    pub fn assemble(name: &str, transform: Mat4, mesh: Mesh, scale: f32) -> Self {
        Self {
            source_name: name.to_string(),
            names: SymbolNames::new(name),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            positions: mesh.positions,
            tex_coords: mesh.uvs,
            normals: mesh.normals,
            colors: mesh.colors,
            triangles: mesh.triangles,
            transform: transform.to_cols_array(),
            scale,
        }
    }

    /// Transform as four columns of four floats
    pub fn transform_columns(&self) -> impl Iterator<Item = &[f32]> {
        self.transform.chunks_exact(4)
    }
}

/// Bundles accumulated during one export pass
///
/// Create one per export; bundles keep the order objects were added in.
#[derive(Debug, Default)]
pub struct ExportSession {
    target_size: f32,
    bundles: Vec<ExportBundle>,
    /// Lower-camel symbol stem -> source name that claimed it
    camel_symbols: HashMap<String, String>,
    /// Upper-case define stem -> source name that claimed it
    upper_symbols: HashMap<String, String>,
}

impl ExportSession {
    /// Empty session; `target_size` of 0 disables rescaling
    pub fn new(target_size: f32) -> Self {
        Self {
            target_size,
            ..Default::default()
        }
    }

    /// Consolidate, rescale, name and append one object
    pub fn add_object(
        &mut self,
        name: &str,
        transform: Mat4,
        source: &SourceMesh,
    ) -> Result<&ExportBundle, ExportError> {
        let names = SymbolNames::new(name);
        // Arrays and the instance use the camel form, defines the upper form
        for (claimed, symbol) in [
            (&self.camel_symbols, &names.camel),
            (&self.upper_symbols, &names.upper),
        ] {
            if let Some(first) = claimed.get(symbol) {
                return Err(ExportError::NameCollision {
                    first: first.clone(),
                    second: name.to_string(),
                    symbol: symbol.clone(),
                });
            }
        }

        tracing::info!("Building for: {}", name);
        let mut mesh = consolidate(source).map_err(|e| e.for_object(name))?;
        let scale = rescale(&mut mesh, self.target_size).map_err(|e| e.for_object(name))?;
        if self.target_size != 0.0 {
            tracing::debug!("scale: {} -> {}", scale, self.target_size);
        }

        let bundle = ExportBundle::assemble(name, transform, mesh, scale);
        tracing::info!(
            "Consolidated '{}': {} vertices, {} indices ({} faces)",
            name,
            bundle.vertex_count,
            bundle.index_count,
            source.faces.len()
        );

        self.camel_symbols.insert(names.camel, name.to_string());
        self.upper_symbols.insert(names.upper, name.to_string());
        let index = self.bundles.len();
        self.bundles.push(bundle);
        Ok(&self.bundles[index])
    }

    pub fn bundles(&self) -> &[ExportBundle] {
        &self.bundles
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn into_bundles(self) -> Vec<ExportBundle> {
        self.bundles
    }
}
