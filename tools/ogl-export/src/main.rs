//! ogl-export - mesh to C/C++ header export tool
//!
//! Converts OBJ and glTF/GLB scenes into indexed `static const` vertex and
//! index arrays (.h)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ogl_export::mesh::check_target_size;
use ogl_export::{EmitOptions, ExportOptions, FloatFormat, export, load_scene, manifest};

#[derive(Parser)]
#[command(name = "ogl-export")]
#[command(about = "Mesh to C/C++ header export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene file to a header
    Export {
        /// Input scene file (OBJ/glTF/GLB)
        input: PathBuf,

        /// Output .h file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export only this object instead of the whole scene
        #[arg(long)]
        active: Option<String>,

        /// Export only the scene's active object
        #[arg(long, conflicts_with = "active")]
        selected: bool,

        /// Scale so the largest bounding-box extent equals this size (0 = off)
        #[arg(long, default_value_t = 0.0)]
        scale_to: f32,

        /// Float literal style
        #[arg(long, value_enum, default_value_t = FloatFormat::Shortest)]
        float_format: FloatFormat,
    },

    /// Build headers from a manifest file
    Build {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,
    },

    /// List the objects of a scene file
    List {
        /// Input scene file (OBJ/glTF/GLB)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Export {
            input,
            output,
            active,
            selected,
            scale_to,
            float_format,
        } => {
            check_target_size(scale_to).context("Invalid --scale-to")?;
            let output = output.unwrap_or_else(|| input.with_extension("h"));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let scene = load_scene(&input)?;
            let options = ExportOptions {
                entire_scene: !selected && active.is_none(),
                target_size: scale_to,
                active,
                emit: EmitOptions { float_format },
            };
            let session = export(scene.as_ref(), &output, &options)?;
            tracing::info!("Done! Exported {} objects", session.bundles().len());
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building headers from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, manifest_dir(&manifest), output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, manifest_dir(&manifest))?;
            tracing::info!("Manifest is valid!");
        }

        Commands::List { input } => {
            let scene = load_scene(&input)?;
            for object in scene.objects() {
                let faces = object.mesh.as_ref().map_or(0, |m| m.faces.len());
                println!("{}\t{:?}\t{} faces", object.name, object.kind, faces);
            }
            if let Some(active) = scene.active_object() {
                println!("active: {}", active);
            }
        }
    }

    Ok(())
}

fn manifest_dir(manifest: &Path) -> &Path {
    manifest.parent().unwrap_or(Path::new("."))
}
