//! Types and constants for mesh consolidation

use smallvec::SmallVec;

/// Width of the emitted index type (`unsigned short`).
pub const INDEX_WIDTH_BITS: u32 = u16::BITS;

/// Maximum number of unique vertices a consolidated mesh may hold.
/// Meshes with more vertices must be split before export.
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize;

/// Texture coordinate used when an object has no active UV channel
pub const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

/// Color used when an object has no active color channel
pub const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// One face-vertex occurrence as supplied by a scene source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: [f32; 3],
    /// Per-vertex normal, used only when the owning face is smooth-shaded
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl Corner {
    /// Corner with default UV/color and a zero normal
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
            uv: DEFAULT_UV,
            color: DEFAULT_COLOR,
        }
    }
}

/// Polygon of (nominally) 3 or 4 corners
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub corners: SmallVec<[Corner; 4]>,
    /// Smooth-shaded faces use per-corner normals, flat faces use `normal`
    pub smooth: bool,
    /// Flat face normal
    pub normal: [f32; 3],
}

impl Face {
    /// Flat-shaded face whose normal is computed from the corner positions
    pub fn flat(corners: impl IntoIterator<Item = Corner>) -> Self {
        let corners: SmallVec<[Corner; 4]> = corners.into_iter().collect();
        let normal = newell_normal(corners.iter().map(|c| c.position));
        Self {
            corners,
            smooth: false,
            normal,
        }
    }

    /// Smooth-shaded face using the normals stored on each corner
    pub fn smooth(corners: impl IntoIterator<Item = Corner>) -> Self {
        let mut face = Self::flat(corners);
        face.smooth = true;
        face
    }

    /// Normal that a corner of this face contributes to its vertex
    pub fn corner_normal(&self, corner: &Corner) -> [f32; 3] {
        if self.smooth {
            corner.normal
        } else {
            self.normal
        }
    }
}

/// Attribute channels available on a source mesh, resolved once per object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub has_uv: bool,
    pub has_color: bool,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            has_uv: true,
            has_color: true,
        }
    }
}

impl Channels {
    pub fn uv(&self, corner: &Corner) -> [f32; 2] {
        if self.has_uv { corner.uv } else { DEFAULT_UV }
    }

    pub fn color(&self, corner: &Corner) -> [f32; 3] {
        if self.has_color {
            corner.color
        } else {
            DEFAULT_COLOR
        }
    }
}

/// Tessellated mesh of one scene object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub faces: Vec<Face>,
    pub channels: Channels,
}

/// Deduplicated, indexed mesh
///
/// Attribute arrays are parallel: vertex `i` is
/// `(positions[i], normals[i], uvs[i], colors[i])`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 3]>,
    pub triangles: Vec<[u16; 3]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of entries in the flattened index buffer
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

/// Face normal via Newell's method; zero for degenerate polygons
fn newell_normal(positions: impl Iterator<Item = [f32; 3]> + Clone) -> [f32; 3] {
    let next = positions.clone().cycle().skip(1);
    let mut n = glam::Vec3::ZERO;
    for (a, b) in positions.zip(next) {
        n.x += (a[1] - b[1]) * (a[2] + b[2]);
        n.y += (a[2] - b[2]) * (a[0] + b[0]);
        n.z += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n.normalize_or_zero().to_array()
}
