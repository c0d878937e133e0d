//! C/C++ array header emitter
//!
//! Layout of one document:
//! - include guard derived from the output file name
//! - the shared `BlenderVuforiaExportObject` struct, behind its own guard
//! - per object: count defines, position / texcoord / normal / color /
//!   index / transform arrays, then one struct instance
//!
//! Symbol names come from [`SymbolNames`](crate::naming::SymbolNames) plus
//! the fixed prefixes below.

use std::fmt::{self, Write};

use super::{EmitOptions, FloatFormat};
use crate::bundle::ExportBundle;
use crate::naming::sanitize;

/// Prefix of every preprocessor define
pub const DEFINE_PREFIX: &str = "_BLENDER_VUFORIA_EXPORT_";

/// Name of the shared aggregate type
pub const STRUCT_NAME: &str = "BlenderVuforiaExportObject";

/// Prefix of every generated array
pub const ARRAY_PREFIX: &str = "_BlenderVuforiaExportObject_";

/// Include guard for a document written to `file_name`
pub fn guard_name(file_name: &str) -> String {
    format!("{}_{}", DEFINE_PREFIX, sanitize(file_name).to_uppercase())
}

/// Render the whole document
pub fn render_header(file_name: &str, bundles: &[ExportBundle], options: &EmitOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_header(&mut out, file_name, bundles, options);
    out
}

/// Write the whole document to `w`
pub fn write_header<W: Write>(
    w: &mut W,
    file_name: &str,
    bundles: &[ExportBundle],
    options: &EmitOptions,
) -> fmt::Result {
    let guard = guard_name(file_name);
    writeln!(w, "#ifndef {guard}")?;
    writeln!(w, "#define {guard}")?;
    writeln!(w)?;

    write_struct_definition(w)?;

    let floats = FloatWriter(options.float_format);
    for bundle in bundles {
        write_bundle(w, bundle, floats)?;
    }

    write!(w, "\n#endif\n")
}

fn write_struct_definition<W: Write>(w: &mut W) -> fmt::Result {
    let guard = format!("{DEFINE_PREFIX}OBJECT_STRUCT_");
    writeln!(w)?;
    writeln!(w, "#ifndef {guard}")?;
    writeln!(w, "#define {guard}")?;
    writeln!(w)?;
    writeln!(w, "struct {STRUCT_NAME}")?;
    writeln!(w, "{{")?;
    writeln!(w, "\tunsigned int numVertices;")?;
    writeln!(w, "\tconst float * vertices;")?;
    writeln!(w, "\tconst float * normals;")?;
    writeln!(w, "\tconst float * colors;")?;
    writeln!(w, "\tconst float * texCoords;")?;
    writeln!(w)?;
    writeln!(w, "\tunsigned int numIndices;")?;
    writeln!(w, "\tconst unsigned short * indices;")?;
    writeln!(w)?;
    writeln!(w, "\tconst float * transform;")?;
    writeln!(w, "}};")?;
    writeln!(w)?;
    writeln!(w, "#endif")?;
    writeln!(w)
}

/// Names of everything generated for one bundle
struct BundleSymbols {
    num_vertices: String,
    num_indices: String,
    vertices: String,
    tex_coords: String,
    normals: String,
    colors: String,
    indices: String,
    transform: String,
    instance: String,
}

impl BundleSymbols {
    fn new(bundle: &ExportBundle) -> Self {
        let upper = &bundle.names.upper;
        let camel = &bundle.names.camel;
        let array = |suffix: &str| format!("{ARRAY_PREFIX}{camel}{suffix}");
        Self {
            num_vertices: format!("{DEFINE_PREFIX}_{upper}_OBJECT_NUM_VERTICES"),
            num_indices: format!("{DEFINE_PREFIX}_{upper}_OBJECT_NUM_INDICES"),
            vertices: array("Vertices"),
            tex_coords: array("TexCoords"),
            normals: array("Normals"),
            colors: array("Colors"),
            indices: array("Indices"),
            transform: array("Transform"),
            instance: format!("{camel}Object"),
        }
    }
}

fn write_bundle<W: Write>(w: &mut W, bundle: &ExportBundle, floats: FloatWriter) -> fmt::Result {
    let s = BundleSymbols::new(bundle);

    writeln!(w, "#define {} {}", s.num_vertices, bundle.vertex_count)?;
    writeln!(
        w,
        "#define {} ({} * 3)",
        s.num_indices,
        bundle.triangles.len()
    )?;
    writeln!(w)?;

    // Positions are followed by an extra blank line before the brace
    writeln!(
        w,
        "static const float {}[ {} * 3 ] =\n{{",
        s.vertices, s.num_vertices
    )?;
    for p in &bundle.positions {
        floats.row(w, p)?;
    }
    writeln!(w, "\n}};\n")?;

    writeln!(
        w,
        "static const float {}[ {} * 2 ] =\n{{",
        s.tex_coords, s.num_vertices
    )?;
    for uv in &bundle.tex_coords {
        floats.row(w, uv)?;
    }
    writeln!(w, "}};\n")?;

    writeln!(
        w,
        "static const float {}[ {} * 3 ] =\n{{",
        s.normals, s.num_vertices
    )?;
    for n in &bundle.normals {
        floats.row(w, n)?;
    }
    writeln!(w, "}};\n")?;

    writeln!(
        w,
        "static const float {}[ {} * 3 ] =\n{{",
        s.colors, s.num_vertices
    )?;
    for c in &bundle.colors {
        floats.row(w, c)?;
    }
    writeln!(w, "}};\n")?;

    writeln!(
        w,
        "static const unsigned short {}[ {} ] =\n{{",
        s.indices, s.num_indices
    )?;
    for [a, b, c] in &bundle.triangles {
        writeln!(w, "\t{a}, {b}, {c},")?;
    }
    writeln!(w, "}};\n")?;

    writeln!(w, "static const float {}[ 16 ] =\n{{", s.transform)?;
    for column in bundle.transform_columns() {
        floats.row(w, column)?;
    }
    writeln!(w, "}};\n")?;

    writeln!(w, "static const {} {} =\n{{", STRUCT_NAME, s.instance)?;
    for field in [
        &s.num_vertices,
        &s.vertices,
        &s.normals,
        &s.colors,
        &s.tex_coords,
        &s.num_indices,
        &s.indices,
        &s.transform,
    ] {
        writeln!(w, "\t{field},")?;
    }
    writeln!(w, "}};\n")
}

/// Formats float literals (`1.5f`)
#[derive(Clone, Copy)]
struct FloatWriter(FloatFormat);

impl FloatWriter {
    fn literal<W: Write>(self, w: &mut W, v: f32) -> fmt::Result {
        match self.0 {
            // Debug output is the shortest round-trip form and always keeps
            // a '.' or an exponent, so the `f` suffix stays a valid literal
            FloatFormat::Shortest => write!(w, "{v:?}f"),
            FloatFormat::Fixed6 => write!(w, "{v:.6}f"),
        }
    }

    /// One tab-indented line of comma-terminated literals
    fn row<W: Write>(self, w: &mut W, values: &[f32]) -> fmt::Result {
        w.write_char('\t')?;
        for (i, &v) in values.iter().enumerate() {
            if i > 0 {
                w.write_char(' ')?;
            }
            self.literal(w, v)?;
            w.write_char(',')?;
        }
        w.write_char('\n')
    }
}
