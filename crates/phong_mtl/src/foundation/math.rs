//! Math types shared with renderers consuming the materials

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;
