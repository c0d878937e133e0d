//! Uniform bounding-box rescaling

use super::types::Mesh;
use crate::error::ExportError;

/// Axis-aligned bounds of a vertex set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    /// Bounds of `positions`, or `None` when there are no positions
    pub fn of(positions: &[[f32; 3]]) -> Option<Self> {
        let (first, rest) = positions.split_first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(p[axis]);
                bounds.max[axis] = bounds.max[axis].max(p[axis]);
            }
        }
        Some(bounds)
    }

    /// Per-axis extent
    pub fn spans(&self) -> [f32; 3] {
        [0, 1, 2].map(|axis| self.max[axis] - self.min[axis])
    }

    /// Largest extent over the three axes
    pub fn max_span(&self) -> f32 {
        self.spans().into_iter().fold(0.0, f32::max)
    }
}

/// Reject rescale targets that would put non-finite values in the output
pub fn check_target_size(target_size: f32) -> Result<(), ExportError> {
    if target_size.is_finite() && target_size >= 0.0 {
        Ok(())
    } else {
        Err(ExportError::InvalidTargetSize { target_size })
    }
}

/// Scale factor that fits the largest bounding-box extent to `target_size`
///
/// A target of 0 disables scaling and always yields 1. The factor is always
/// finite.
pub fn scale_factor(positions: &[[f32; 3]], target_size: f32) -> Result<f32, ExportError> {
    check_target_size(target_size)?;
    if target_size == 0.0 {
        return Ok(1.0);
    }

    let max_span = Bounds::of(positions).map_or(0.0, |b| b.max_span());
    let scale = target_size / max_span;
    // Zero or subnormal spans overflow the division
    if max_span == 0.0 || !scale.is_finite() {
        return Err(ExportError::DegenerateGeometry {
            object: String::new(),
            target_size,
        });
    }

    Ok(scale)
}

/// Rescale every position about the origin; returns the applied factor
///
/// No recentering happens: a vertex at `p` ends up at `p * scale`.
pub fn rescale(mesh: &mut Mesh, target_size: f32) -> Result<f32, ExportError> {
    let scale = scale_factor(&mesh.positions, target_size)?;
    if scale != 1.0 {
        for p in &mut mesh.positions {
            *p = p.map(|c| c * scale);
        }
    }
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with(positions: Vec<[f32; 3]>) -> Mesh {
        Mesh {
            positions,
            ..Default::default()
        }
    }

    #[test]
    fn test_bounds() {
        let b = Bounds::of(&[[1.0, -1.0, 0.0], [-1.0, 3.0, 8.0], [0.0, 0.0, 2.0]]).unwrap();
        assert_eq!(b.min, [-1.0, -1.0, 0.0]);
        assert_eq!(b.max, [1.0, 3.0, 8.0]);
        assert_eq!(b.spans(), [2.0, 4.0, 8.0]);
        assert_eq!(b.max_span(), 8.0);
        assert_eq!(Bounds::of(&[]), None);
    }

    #[test]
    fn test_zero_target_is_identity() {
        let positions = vec![[0.123456, 5.0, -3.0], [7.0, 7.0, 7.0]];
        let mut mesh = mesh_with(positions.clone());
        assert_eq!(rescale(&mut mesh, 0.0).unwrap(), 1.0);
        assert_eq!(mesh.positions, positions);
    }

    #[test]
    fn test_uniform_scale_without_recentering() {
        // Spans (2, 4, 8)
        let mut mesh = mesh_with(vec![[1.0, 1.0, 1.0], [-1.0, -3.0, -7.0], [0.0, 0.0, 0.0]]);
        let scale = rescale(&mut mesh, 4.0).unwrap();
        assert_eq!(scale, 0.5);
        assert_eq!(mesh.positions[0], [0.5, 0.5, 0.5]);
        assert_eq!(mesh.positions[1], [-0.5, -1.5, -3.5]);
        assert_eq!(mesh.positions[2], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let mut mesh = mesh_with(vec![[2.0, 2.0, 2.0]; 3]);
        let err = rescale(&mut mesh, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::DegenerateGeometry { .. }));
        assert_eq!(mesh.positions, vec![[2.0, 2.0, 2.0]; 3]);

        let err = scale_factor(&[], 1.0).unwrap_err();
        assert!(matches!(err, ExportError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_degenerate_bounds_allowed_without_target() {
        assert_eq!(scale_factor(&[[2.0, 2.0, 2.0]], 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        for target in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -2.0] {
            let mut mesh = mesh_with(positions.to_vec());
            let err = rescale(&mut mesh, target).unwrap_err();
            assert!(matches!(err, ExportError::InvalidTargetSize { .. }));
            assert_eq!(mesh.positions, positions.to_vec());
        }
        assert!(check_target_size(0.0).is_ok());
        assert!(check_target_size(2.5).is_ok());
    }

    #[test]
    fn test_tiny_span_overflow_rejected() {
        // 1e30 / 1e-40 overflows f32
        let positions = [[0.0, 0.0, 0.0], [1e-40, 0.0, 0.0]];
        let err = scale_factor(&positions, 1e30).unwrap_err();
        assert!(matches!(err, ExportError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_flat_mesh_scales_on_largest_axis() {
        // A planar mesh only spans two axes
        let positions = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(scale_factor(&positions, 1.0).unwrap(), 0.5);
    }
}
