//! Vertex deduplication and quad triangulation

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use super::round::{fixed2, fixed3, round3, unfixed};
use super::types::{Face, MAX_VERTEX_COUNT, Mesh, SourceMesh};
use crate::error::ExportError;

/// Rounded (position, normal, uv). Color is not part of the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    position: [i64; 3],
    normal: [i64; 3],
    uv: [i64; 2],
}

/// Build an indexed mesh from a face stream
///
/// Corners sharing a [`VertexKey`] collapse into the vertex of their first
/// occurrence; the color of later corners is discarded. Triangles keep their
/// winding, quads `(i0, i1, i2, i3)` fan-split into `(i0, i1, i2)` and
/// `(i0, i2, i3)`.
///
/// Errors carry an empty object name; callers attach it with
/// [`ExportError::for_object`].
pub fn consolidate(source: &SourceMesh) -> Result<Mesh, ExportError> {
    let channels = source.channels;
    let mut lookup: HashMap<VertexKey, u16> = HashMap::new();
    let mut mesh = Mesh::default();

    for (face_index, face) in source.faces.iter().enumerate() {
        check_face(face_index, face)?;

        let mut indices = [0u16; 4];
        for (slot, corner) in face.corners.iter().enumerate() {
            let uv = fixed2(channels.uv(corner));
            let key = VertexKey {
                position: fixed3(corner.position),
                normal: fixed3(face.corner_normal(corner)),
                uv,
            };

            indices[slot] = match lookup.entry(key) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    if mesh.positions.len() >= MAX_VERTEX_COUNT {
                        return Err(ExportError::IndexOverflow {
                            object: String::new(),
                        });
                    }
                    let index = mesh.positions.len() as u16;
                    mesh.positions.push(key.position.map(unfixed));
                    mesh.normals.push(key.normal.map(unfixed));
                    mesh.uvs.push(uv.map(unfixed));
                    mesh.colors.push(round3(channels.color(corner)));
                    *e.insert(index)
                }
            };
        }

        let [i0, i1, i2, i3] = indices;
        mesh.triangles.push([i0, i1, i2]);
        if face.corners.len() == 4 {
            mesh.triangles.push([i0, i2, i3]);
        }
    }

    Ok(mesh)
}

fn check_face(face_index: usize, face: &Face) -> Result<(), ExportError> {
    match face.corners.len() {
        3 | 4 => Ok(()),
        corners => Err(ExportError::InvalidGeometry {
            object: String::new(),
            face: face_index,
            corners,
        }),
    }
}
