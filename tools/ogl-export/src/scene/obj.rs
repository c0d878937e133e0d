//! Wavefront OBJ scene source
//!
//! Supported statements: `v` (with optional `r g b` vertex color), `vt`,
//! `vn`, `f`, `l`, `o`, `g` and `s`. Everything else is ignored.

use anyhow::{Context, Result, bail};
use glam::Mat4;
use smallvec::SmallVec;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{ObjectKind, SceneObject, SceneSource};
use crate::mesh::{Channels, Corner, DEFAULT_COLOR, DEFAULT_UV, Face, SourceMesh};

/// Scene read from an OBJ file; every `o`/`g` block becomes one object
#[derive(Debug, Clone)]
pub struct ObjScene {
    objects: Vec<SceneObject>,
}

impl ObjScene {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open OBJ: {:?}", path))?;
        let default_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string());
        Self::parse(BufReader::new(file), &default_name)
            .with_context(|| format!("Failed to parse OBJ: {:?}", path))
    }

    /// Parse OBJ text; geometry before the first `o`/`g` goes into an object
    /// called `default_name`
    pub fn parse<R: BufRead>(reader: R, default_name: &str) -> Result<Self> {
        let mut parser = Parser::new(default_name);
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            parser
                .statement(line.trim())
                .with_context(|| format!("line {}", line_no + 1))?;
        }
        Ok(Self {
            objects: parser.finish(),
        })
    }
}

impl SceneSource for ObjScene {
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

/// Reference to one face corner: (position, uv, normal), zero-based
type CornerRef = (usize, Option<usize>, Option<usize>);

/// Object being accumulated
struct PendingObject {
    name: String,
    /// Named by an `o`/`g` statement
    explicit: bool,
    faces: Vec<Vec<CornerRef>>,
    /// Smoothing state per face (`None` when no `s` statement applied)
    smoothing: Vec<Option<bool>>,
    lines: usize,
}

impl PendingObject {
    fn new(name: &str, explicit: bool) -> Self {
        Self {
            name: name.to_string(),
            explicit,
            faces: Vec::new(),
            smoothing: Vec::new(),
            lines: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.lines == 0
    }
}

struct Parser {
    positions: Vec<[f32; 3]>,
    colors: Vec<Option<[f32; 3]>>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    smoothing: Option<bool>,
    current: PendingObject,
    done: Vec<PendingObject>,
}

impl Parser {
    fn new(default_name: &str) -> Self {
        Self {
            positions: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            smoothing: None,
            current: PendingObject::new(default_name, false),
            done: Vec::new(),
        }
    }

    fn statement(&mut self, line: &str) -> Result<()> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let args = &parts[1..];
        match parts[0] {
            "v" => {
                let v = parse_floats(args)?;
                if v.len() < 3 {
                    bail!("vertex needs 3 coordinates, got {}", v.len());
                }
                self.positions.push([v[0], v[1], v[2]]);
                self.colors
                    .push((v.len() >= 6).then(|| [v[3], v[4], v[5]]));
            }
            "vt" => {
                let v = parse_floats(args)?;
                if v.is_empty() {
                    bail!("texture coordinate needs at least 1 component");
                }
                self.tex_coords
                    .push([v[0], v.get(1).copied().unwrap_or(0.0)]);
            }
            "vn" => {
                let v = parse_floats(args)?;
                if v.len() < 3 {
                    bail!("normal needs 3 components, got {}", v.len());
                }
                self.normals.push([v[0], v[1], v[2]]);
            }
            "f" => {
                let corners = args
                    .iter()
                    .map(|s| self.corner_ref(s))
                    .collect::<Result<Vec<_>>>()?;
                if corners.len() < 3 {
                    bail!("face needs at least 3 corners, got {}", corners.len());
                }
                self.current.faces.push(corners);
                self.current.smoothing.push(self.smoothing);
            }
            "l" => self.current.lines += 1,
            "o" | "g" => {
                let name = args.join(" ");
                if self.current.is_empty() && !self.current.explicit {
                    self.current = PendingObject::new(&name, true);
                } else {
                    let next = PendingObject::new(&name, true);
                    self.done.push(std::mem::replace(&mut self.current, next));
                }
            }
            "s" => {
                self.smoothing = Some(!matches!(args.first(), Some(&"off") | Some(&"0")));
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse a corner reference: "v", "v/vt", "v/vt/vn" or "v//vn"
    fn corner_ref(&self, s: &str) -> Result<CornerRef> {
        let mut parts = s.split('/');
        let vi = parts
            .next()
            .context("empty face corner")
            .and_then(|p| resolve_index(p, self.positions.len()))?;
        let vti = match parts.next() {
            Some(p) if !p.is_empty() => Some(resolve_index(p, self.tex_coords.len())?),
            _ => None,
        };
        let vni = match parts.next() {
            Some(p) if !p.is_empty() => Some(resolve_index(p, self.normals.len())?),
            _ => None,
        };
        Ok((vi, vti, vni))
    }

    fn finish(mut self) -> Vec<SceneObject> {
        let last = std::mem::replace(&mut self.current, PendingObject::new("", false));
        if !last.is_empty() || last.explicit || self.done.is_empty() {
            self.done.push(last);
        }

        let pending = std::mem::take(&mut self.done);
        pending.iter().map(|p| self.build_object(p)).collect()
    }

    fn build_object(&self, pending: &PendingObject) -> SceneObject {
        let kind = if !pending.faces.is_empty() {
            ObjectKind::Mesh
        } else if pending.lines > 0 {
            ObjectKind::Curve
        } else {
            ObjectKind::Empty
        };

        let mesh = kind.is_mesh_like().then(|| {
            let channels = Channels {
                has_uv: pending.faces.iter().flatten().any(|c| c.1.is_some()),
                has_color: pending
                    .faces
                    .iter()
                    .flatten()
                    .any(|c| self.colors[c.0].is_some()),
            };
            let faces = pending
                .faces
                .iter()
                .zip(&pending.smoothing)
                .map(|(refs, &smoothing)| self.build_face(refs, smoothing))
                .collect();
            SourceMesh { faces, channels }
        });

        SceneObject {
            name: pending.name.clone(),
            kind,
            transform: Mat4::IDENTITY,
            mesh,
        }
    }

    fn build_face(&self, refs: &[CornerRef], smoothing: Option<bool>) -> Face {
        let corners: SmallVec<[Corner; 4]> = refs
            .iter()
            .map(|&(vi, vti, vni)| Corner {
                position: self.positions[vi],
                normal: vni.map_or([0.0; 3], |i| self.normals[i]),
                uv: vti.map_or(DEFAULT_UV, |i| self.tex_coords[i]),
                color: self.colors[vi].unwrap_or(DEFAULT_COLOR),
            })
            .collect();

        // Explicit normals are used unless smoothing is switched off
        let has_normals = refs.iter().all(|r| r.2.is_some());
        if has_normals && smoothing != Some(false) {
            Face::smooth(corners)
        } else {
            Face::flat(corners)
        }
    }
}

fn parse_floats(args: &[&str]) -> Result<Vec<f32>> {
    args.iter()
        .map(|s| {
            s.parse::<f32>()
                .with_context(|| format!("invalid number {:?}", s))
        })
        .collect()
}

/// Resolve a one-based (or negative, relative) OBJ index against `len`
/// elements defined so far
fn resolve_index(s: &str, len: usize) -> Result<usize> {
    let i: i64 = s
        .parse()
        .with_context(|| format!("invalid index {:?}", s))?;
    let resolved = match i {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => bail!("index 0 is not valid in OBJ"),
    };
    if resolved < 0 || resolved >= len as i64 {
        bail!("index {} out of range ({} elements defined)", i, len);
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ObjScene {
        ObjScene::parse(text.as_bytes(), "scene").unwrap()
    }

    const QUAD: &str = "
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn test_default_object() {
        let scene = parse(QUAD);
        assert_eq!(scene.objects().len(), 1);
        let obj = &scene.objects()[0];
        assert_eq!(obj.name, "scene");
        assert_eq!(obj.kind, ObjectKind::Mesh);
        assert_eq!(obj.transform, Mat4::IDENTITY);

        let mesh = obj.mesh.as_ref().unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].corners.len(), 4);
        assert!(!mesh.faces[0].smooth);
        assert_eq!(mesh.faces[0].normal, [0.0, 0.0, 1.0]);
        assert!(!mesh.channels.has_uv);
        assert!(!mesh.channels.has_color);
        assert_eq!(scene.active_object(), Some("scene"));
    }

    #[test]
    fn test_named_objects() {
        let text = "
v 0 0 0
v 1 0 0
v 0 1 0
o First
f 1 2 3
o Second Part
f -3 -2 -1
o Axis
l 1 2
o Nothing
";
        let scene = parse(text);
        let names: Vec<&str> = scene.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["First", "Second Part", "Axis", "Nothing"]);
        assert_eq!(scene.objects()[2].kind, ObjectKind::Curve);
        assert!(scene.objects()[2].mesh.as_ref().unwrap().faces.is_empty());
        assert_eq!(scene.objects()[3].kind, ObjectKind::Empty);
        assert!(scene.objects()[3].mesh.is_none());
        assert_eq!(scene.active_object(), Some("First"));
        assert!(scene.object("Second Part").is_some());
    }

    #[test]
    fn test_normals_uvs_and_colors() {
        let text = "
v 0 0 0 1 0 0
v 1 0 0 0 1 0
v 0 1 0 0 0 1
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";
        let scene = parse(text);
        let mesh = scene.objects()[0].mesh.as_ref().unwrap();
        assert!(mesh.channels.has_uv);
        assert!(mesh.channels.has_color);

        let face = &mesh.faces[0];
        assert!(face.smooth);
        assert_eq!(face.corners[1].uv, [1.0, 0.0]);
        assert_eq!(face.corners[2].color, [0.0, 0.0, 1.0]);
        assert_eq!(face.corners[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_smoothing_off_uses_face_normal() {
        let text = "
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
s off
f 1//1 2//1 3//1
s 1
f 1//1 2//1 3//1
";
        let scene = parse(text);
        let faces = &scene.objects()[0].mesh.as_ref().unwrap().faces;
        assert!(!faces[0].smooth);
        assert!(faces[1].smooth);
    }

    #[test]
    fn test_large_polygon_kept() {
        let text = "
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v -1 1 0
f 1 2 3 4 5
";
        let scene = parse(text);
        assert_eq!(
            scene.objects()[0].mesh.as_ref().unwrap().faces[0].corners.len(),
            5
        );
    }

    #[test]
    fn test_invalid_references() {
        let err = ObjScene::parse("v 0 0 0\nf 1 2 3\n".as_bytes(), "x").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));

        assert!(ObjScene::parse("v 0 0\n".as_bytes(), "x").is_err());
        assert!(ObjScene::parse("v a b c\n".as_bytes(), "x").is_err());
        assert!(ObjScene::parse("v 0 0 0\nf 0 1 1\n".as_bytes(), "x").is_err());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index("1", 3).unwrap(), 0);
        assert_eq!(resolve_index("-1", 3).unwrap(), 2);
        assert!(resolve_index("4", 3).is_err());
        assert!(resolve_index("-4", 3).is_err());
    }
}
