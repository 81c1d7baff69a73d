//! Math utilities and types
//!
//! Provides fundamental math types for 3D transforms and matrix composition.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
///
/// Purely local: a transform has no notion of a parent. Hierarchy is the
/// scene graph's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    ///
    /// Composition order is translate, then rotate, then scale.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Translate by the given offset in local space
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Apply an additional rotation on top of the current one
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
    }
}

/// Extract the translation column of a transformation matrix
pub fn extract_translation(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Extract the rotation of a transformation matrix, discarding scale
pub fn extract_rotation(matrix: &Mat4) -> Quat {
    let scale = extract_scale(matrix);
    let rotation_matrix = nalgebra::Matrix3::new(
        matrix.m11 / scale.x,
        matrix.m12 / scale.y,
        matrix.m13 / scale.z,
        matrix.m21 / scale.x,
        matrix.m22 / scale.y,
        matrix.m23 / scale.z,
        matrix.m31 / scale.x,
        matrix.m32 / scale.y,
        matrix.m33 / scale.z,
    );
    Quat::from_matrix(&rotation_matrix)
}

/// Extract the per-axis scale of a transformation matrix
pub fn extract_scale(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude(),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude(),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude(),
    )
}
