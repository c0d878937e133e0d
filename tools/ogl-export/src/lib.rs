//! ogl-export library
//!
//! Consolidates scene meshes into indexed vertex/triangle buffers and writes
//! them as `static const` arrays in a C/C++ header.

pub mod bundle;
pub mod error;
pub mod export;
pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod naming;
pub mod scene;

// Re-export key types for exporting
pub use bundle::{ExportBundle, ExportSession};
pub use error::ExportError;
pub use export::{ExportOptions, build_session, export, select_objects};
pub use formats::{EmitOptions, FloatFormat, render_header, save_header};
pub use mesh::{Channels, Corner, Face, Mesh, SourceMesh, consolidate};
pub use naming::{SymbolNames, sanitize};
pub use scene::{GltfScene, ObjScene, ObjectKind, SceneObject, SceneSource, load_scene};
