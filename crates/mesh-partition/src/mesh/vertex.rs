//! Per-vertex attribute bundle and interpolation.

use nalgebra::{Point3, Vector2, Vector3};

/// Texture coordinate pair.
pub type TextureCoordinates = Vector2<f32>;

/// An 8-bit RGBA vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend towards `other`, each channel rounded and clamped to 0-255.
    pub fn lerp(&self, other: &ColorRgba, t: f32) -> Self {
        let mix = |a: u8, b: u8| -> u8 {
            let value = a as f32 + (b as f32 - a as f32) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Every attribute of one mesh vertex, gathered out of the parallel arrays.
///
/// Attributes the owning mesh does not carry are left at their defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshVertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub texture_coordinates: TextureCoordinates,
    pub color: ColorRgba,
    pub bone_id: Option<u8>,
    /// Offsets from `position`, one per animation frame.
    pub animation_offsets: Vec<Vector3<f32>>,
}

impl MeshVertex {
    /// Vertex at `position` with zeroed attributes.
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Attribute-wise interpolation between `self` (t = 0) and `other` (t = 1).
    ///
    /// Bone ids can't be blended, so the nearer endpoint's id is kept. Frame
    /// offsets are blended pairwise when both ends carry the same frame count.
    pub fn interpolate(&self, other: &MeshVertex, t: f32) -> MeshVertex {
        let nearer = if t < 0.5 { self } else { other };
        let animation_offsets = if self.animation_offsets.len() == other.animation_offsets.len() {
            self.animation_offsets
                .iter()
                .zip(&other.animation_offsets)
                .map(|(a, b)| a + (b - a) * t)
                .collect()
        } else {
            nearer.animation_offsets.clone()
        };

        MeshVertex {
            position: self.position + (other.position - self.position) * t,
            normal: self.normal + (other.normal - self.normal) * t,
            texture_coordinates: self.texture_coordinates
                + (other.texture_coordinates - self.texture_coordinates) * t,
            color: self.color.lerp(&other.color, t),
            bone_id: nearer.bone_id,
            animation_offsets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn color_lerp_midpoint() {
        let a = ColorRgba::new(0, 100, 200, 255);
        let b = ColorRgba::new(255, 100, 0, 255);
        assert_eq!(a.lerp(&b, 0.5), ColorRgba::new(128, 100, 100, 255));
    }

    #[test]
    fn color_lerp_clamps() {
        let a = ColorRgba::new(10, 250, 0, 0);
        let b = ColorRgba::new(0, 255, 0, 0);
        let out = a.lerp(&b, 3.0);
        assert_eq!(out.r, 0);
        assert_eq!(out.g, 255);
    }

    #[test]
    fn interpolate_all_attributes() {
        let a = MeshVertex {
            position: Point3::new(0.0, 0.0, 0.0),
            normal: Vector3::new(0.0, 0.0, 1.0),
            texture_coordinates: TextureCoordinates::new(0.0, 0.0),
            color: ColorRgba::new(0, 0, 0, 0),
            bone_id: Some(1),
            animation_offsets: vec![Vector3::new(0.0, 0.0, 0.0)],
        };
        let b = MeshVertex {
            position: Point3::new(2.0, 4.0, 0.0),
            normal: Vector3::new(1.0, 0.0, 0.0),
            texture_coordinates: TextureCoordinates::new(1.0, 2.0),
            color: ColorRgba::new(200, 100, 50, 0),
            bone_id: Some(7),
            animation_offsets: vec![Vector3::new(4.0, 0.0, 0.0)],
        };

        let mid = a.interpolate(&b, 0.25);
        assert_approx_eq!(mid.position.x, 0.5);
        assert_approx_eq!(mid.position.y, 1.0);
        assert_approx_eq!(mid.normal.x, 0.25);
        assert_approx_eq!(mid.normal.z, 0.75);
        assert_approx_eq!(mid.texture_coordinates.y, 0.5);
        assert_eq!(mid.color, ColorRgba::new(50, 25, 13, 0));
        assert_eq!(mid.bone_id, Some(1));
        assert_approx_eq!(mid.animation_offsets[0].x, 1.0);

        assert_eq!(a.interpolate(&b, 0.75).bone_id, Some(7));
    }

    #[test]
    fn mismatched_frames_take_nearer() {
        let a = MeshVertex {
            animation_offsets: vec![Vector3::new(1.0, 0.0, 0.0)],
            ..MeshVertex::default()
        };
        let b = MeshVertex::default();
        assert_eq!(a.interpolate(&b, 0.1).animation_offsets.len(), 1);
        assert!(a.interpolate(&b, 0.9).animation_offsets.is_empty());
    }
}
