//! Mesh consolidation (faces -> indexed vertices + triangles)

mod consolidate;
pub mod round;
mod scale;
mod types;

// Re-export public API
pub use consolidate::consolidate;
pub use scale::{Bounds, check_target_size, rescale, scale_factor};
pub use types::{
    Channels, Corner, DEFAULT_COLOR, DEFAULT_UV, Face, INDEX_WIDTH_BITS, MAX_VERTEX_COUNT, Mesh,
    SourceMesh,
};
