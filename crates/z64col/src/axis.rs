//! Axis conversion for imported vertex coordinates.
//!
//! Game data is Y-up. Viewers commonly expect Z-up with Y forward, so the
//! import transform rotates the chosen source forward axis onto +Y and the
//! source up axis onto +Z, then applies a uniform scale.

use clap::ValueEnum;
use glam::{Affine3A, Mat3, Vec3};

use crate::error::{Error, Result};

/// A signed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Axis {
    #[value(name = "x")]
    X,
    #[value(name = "y")]
    Y,
    #[value(name = "z")]
    Z,
    #[value(name = "-x")]
    NegX,
    #[value(name = "-y")]
    NegY,
    #[value(name = "-z")]
    NegZ,
}

impl Axis {
    #[must_use]
    pub fn vector(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::NegX => Vec3::NEG_X,
            Axis::NegY => Vec3::NEG_Y,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }
}

/// Rotation taking `forward` to +Y and `up` to +Z.
///
/// # Errors
///
/// Returns an error if the two axes are parallel.
pub fn axis_conversion(forward: Axis, up: Axis) -> Result<Mat3> {
    let forward = forward.vector();
    let up = up.vector();
    let right = forward.cross(up);
    if right == Vec3::ZERO {
        return Err(Error::InvalidArgument {
            context: "axes",
            detail: format!("forward {forward} and up {up} are parallel"),
        });
    }

    // The basis is orthonormal, so its transpose is its inverse.
    Ok(Mat3::from_cols(right, forward, up).transpose())
}

/// Full vertex transform: axis conversion followed by uniform scale.
pub fn import_transform(forward: Axis, up: Axis, scale: f32) -> Result<Affine3A> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidArgument {
            context: "scale",
            detail: format!("{scale} is not a positive number"),
        });
    }
    let rotation = axis_conversion(forward, up)?;
    Ok(Affine3A::from_mat3(rotation) * Affine3A::from_scale(Vec3::splat(scale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axes_y_up_to_z_up() {
        let m = axis_conversion(Axis::NegZ, Axis::Y).unwrap();
        assert_eq!(m * Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, -3.0, 2.0));
    }

    #[test]
    fn test_identity_axes() {
        let m = axis_conversion(Axis::Y, Axis::Z).unwrap();
        assert_eq!(m, Mat3::IDENTITY);
    }

    #[test]
    fn test_axes_map_onto_targets() {
        let m = axis_conversion(Axis::X, Axis::NegY).unwrap();
        assert_eq!(m * Vec3::X, Vec3::Y);
        assert_eq!(m * Vec3::NEG_Y, Vec3::Z);
    }

    #[test]
    fn test_parallel_axes_rejected() {
        assert!(axis_conversion(Axis::Z, Axis::NegZ).is_err());
        assert!(axis_conversion(Axis::Y, Axis::Y).is_err());
    }

    #[test]
    fn test_import_transform_scales_after_rotation() {
        let t = import_transform(Axis::NegZ, Axis::Y, 0.5).unwrap();
        assert_eq!(
            t.transform_point3(Vec3::new(2.0, 4.0, 6.0)),
            Vec3::new(1.0, -3.0, 2.0)
        );
        assert!(import_transform(Axis::NegZ, Axis::Y, 0.0).is_err());
    }
}
