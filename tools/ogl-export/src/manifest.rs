//! Manifest parsing and build orchestration
//!
//! Parses export.toml and exports every header it lists.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::export::{ExportOptions, export};
use crate::formats::{EmitOptions, FloatFormat};
use crate::mesh::check_target_size;
use crate::scene::load_scene;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub headers: BTreeMap<String, HeaderEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("include/")
}

fn default_entire_scene() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    Simple(PathBuf),
    Detailed {
        source: PathBuf,
        #[serde(default)]
        output: Option<PathBuf>,
        #[serde(default = "default_entire_scene")]
        entire_scene: bool,
        #[serde(default)]
        scale_to: f32,
        #[serde(default)]
        active: Option<String>,
        #[serde(default)]
        float_format: FloatFormat,
    },
}

impl HeaderEntry {
    pub fn source(&self) -> &Path {
        match self {
            HeaderEntry::Simple(p) => p,
            HeaderEntry::Detailed { source, .. } => source,
        }
    }

    /// Output file name, `<name>.h` unless overridden
    pub fn output_file(&self, name: &str) -> PathBuf {
        match self {
            HeaderEntry::Detailed {
                output: Some(output),
                ..
            } => output.clone(),
            _ => PathBuf::from(format!("{}.h", name)),
        }
    }

    pub fn options(&self) -> ExportOptions {
        match self {
            HeaderEntry::Simple(_) => ExportOptions::default(),
            HeaderEntry::Detailed {
                entire_scene,
                scale_to,
                active,
                float_format,
                ..
            } => ExportOptions {
                entire_scene: *entire_scene,
                target_size: *scale_to,
                active: active.clone(),
                emit: EmitOptions {
                    float_format: *float_format,
                },
            },
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Validate a manifest without building
///
/// Relative paths are resolved against `base_dir`.
pub fn validate(manifest: &Manifest, base_dir: &Path) -> Result<()> {
    for (name, entry) in &manifest.headers {
        let source = base_dir.join(entry.source());
        if !source.exists() {
            anyhow::bail!("Header '{}' source not found: {:?}", name, source);
        }
        check_target_size(entry.options().target_size)
            .with_context(|| format!("Header '{}' has an invalid scale_to", name))?;
    }
    Ok(())
}

/// Export every header of the manifest
///
/// `output_override` replaces the manifest's output directory. Relative
/// paths are resolved against `base_dir`.
pub fn build_all(
    manifest: &Manifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<()> {
    validate(manifest, base_dir)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => base_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for (name, entry) in &manifest.headers {
        let source = base_dir.join(entry.source());
        let output = output_dir.join(entry.output_file(name));
        tracing::info!("Header '{}': {:?} -> {:?}", name, source, output);

        let scene = load_scene(&source)?;
        export(scene.as_ref(), &output, &entry.options())
            .with_context(|| format!("Failed to export header '{}'", name))?;
    }

    tracing::info!("Built {} headers", manifest.headers.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[output]
dir = "generated"

[headers]
simple = "models/simple.obj"

[headers.scaled]
source = "models/scene.glb"
output = "scene_data.h"
entire_scene = false
scale_to = 2.5
active = "Cube"
float_format = "fixed"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.output.dir, PathBuf::from("generated"));
        assert_eq!(manifest.headers.len(), 2);

        let simple = &manifest.headers["simple"];
        assert_eq!(simple.source(), Path::new("models/simple.obj"));
        assert_eq!(simple.output_file("simple"), PathBuf::from("simple.h"));
        assert_eq!(simple.options(), ExportOptions::default());

        let scaled = &manifest.headers["scaled"];
        assert_eq!(scaled.output_file("scaled"), PathBuf::from("scene_data.h"));
        let options = scaled.options();
        assert!(!options.entire_scene);
        assert_eq!(options.target_size, 2.5);
        assert_eq!(options.active.as_deref(), Some("Cube"));
        assert_eq!(options.emit.float_format, FloatFormat::Fixed6);
    }

    #[test]
    fn test_detailed_defaults() {
        let manifest: Manifest = toml::from_str("[headers.a]\nsource = \"a.obj\"\n").unwrap();
        assert_eq!(manifest.output.dir, PathBuf::from("include/"));
        let options = manifest.headers["a"].options();
        assert!(options.entire_scene);
        assert_eq!(options.target_size, 0.0);
        assert_eq!(options.emit.float_format, FloatFormat::Shortest);
    }

    #[test]
    fn test_validate_missing_source() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&manifest, dir.path()).unwrap_err();
        assert!(err.to_string().contains("source not found"));
    }

    #[test]
    fn test_validate_negative_scale() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.obj"), "").unwrap();
        let manifest: Manifest =
            toml::from_str("[headers.a]\nsource = \"a.obj\"\nscale_to = -1.0\n").unwrap();
        let err = validate(&manifest, dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid scale_to"));
    }

    #[test]
    fn test_build_all() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tri.obj"),
            "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();
        let manifest: Manifest = toml::from_str("[headers]\ntri = \"tri.obj\"\n").unwrap();

        build_all(&manifest, dir.path(), None).unwrap();
        let text = std::fs::read_to_string(dir.path().join("include").join("tri.h")).unwrap();
        assert!(text.starts_with("#ifndef _BLENDER_VUFORIA_EXPORT__TRI_H\n"));
        assert!(text.contains("triObject"));
    }
}
