//! Export errors
//!
//! Every variant aborts the whole export before the output file is touched.

use std::path::PathBuf;

use crate::mesh::MAX_VERTEX_COUNT;

/// Failure of an export pass
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A face outside the 3-4 corner range
    #[error("object '{object}': face {face} has {corners} corners (only triangles and quads are supported)")]
    InvalidGeometry {
        object: String,
        face: usize,
        corners: usize,
    },

    /// More unique vertices than the 16-bit index buffer can address
    #[error(
        "object '{object}' has more than {} unique vertices, exceeding the 16-bit index range. \
        Split the mesh into smaller parts.",
        MAX_VERTEX_COUNT
    )]
    IndexOverflow { object: String },

    /// Rescaling requested but all vertices coincide
    #[error("object '{object}' has a zero-size bounding box and cannot be scaled to {target_size}")]
    DegenerateGeometry { object: String, target_size: f32 },

    /// Rescale target that is negative, infinite or NaN
    #[error("target size {target_size} must be a finite value >= 0")]
    InvalidTargetSize { target_size: f32 },

    /// Two objects map to the same generated symbol name
    #[error("objects '{first}' and '{second}' both map to the symbol name '{symbol}'")]
    NameCollision {
        first: String,
        second: String,
        symbol: String,
    },

    /// Output could not be written
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Attach the object name to a geometry error raised without one
    pub(crate) fn for_object(self, name: &str) -> Self {
        match self {
            Self::InvalidGeometry { face, corners, .. } => Self::InvalidGeometry {
                object: name.to_string(),
                face,
                corners,
            },
            Self::IndexOverflow { .. } => Self::IndexOverflow {
                object: name.to_string(),
            },
            Self::DegenerateGeometry { target_size, .. } => Self::DegenerateGeometry {
                object: name.to_string(),
                target_size,
            },
            other => other,
        }
    }
}
