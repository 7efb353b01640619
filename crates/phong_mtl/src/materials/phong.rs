//! Phong material model
//!
//! `Color` and `Material` are plain values; the material name lives in the
//! owning [`MaterialCollection`](super::MaterialCollection) as its key.

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// RGB color with channels nominally in the 0.0-1.0 range
///
/// The range is not enforced: values read from a file are kept as written.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from normalized channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a gray color with all channels set to `v`
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Create a color from 8-bit channels in the 0-255 range
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Channels as 8-bit values
    ///
    /// Each channel is scaled by 255 and truncated; out-of-range channels
    /// saturate at 0 or 255.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (255.0 * self.r) as u8,
            (255.0 * self.g) as u8,
            (255.0 * self.b) as u8,
        ]
    }

    /// Channels as a normalized array
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as a math vector
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<(f32, f32, f32)> for Color {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::from_rgb8(r, g, b)
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.to_rgb8()
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        c.to_vec3()
    }
}

/// Space separated channels, honoring a requested precision (`{:.6}`)
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.p$} {:.p$} {:.p$}", self.r, self.g, self.b, p = p),
            None => write!(f, "{} {} {}", self.r, self.g, self.b),
        }
    }
}

impl AbsDiffEq for Color {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.r.abs_diff_eq(&other.r, epsilon)
            && self.g.abs_diff_eq(&other.g, epsilon)
            && self.b.abs_diff_eq(&other.b, epsilon)
    }
}

impl RelativeEq for Color {
    fn default_max_relative() -> Self::Epsilon {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.r.relative_eq(&other.r, epsilon, max_relative)
            && self.g.relative_eq(&other.g, epsilon, max_relative)
            && self.b.relative_eq(&other.b, epsilon, max_relative)
    }
}

/// Phong material parameters (Wavefront `Ka`/`Kd`/`Ks`/`Ns`/`Tr`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient color (Ka)
    pub ambient: Color,
    /// Diffuse color (Kd)
    pub diffuse: Color,
    /// Specular color (Ks)
    pub specular: Color,
    /// Specular exponent (Ns)
    pub shininess: f32,
    /// Transparency (Tr), 0.0 = opaque. The `d` directive stores `1 - d` here.
    pub transparency: f32,
}

impl Material {
    /// Field values used for anything a file leaves unspecified
    pub const DEFAULT: Self = Self {
        ambient: Color::gray(0.2),
        diffuse: Color::gray(0.8),
        specular: Color::WHITE,
        shininess: 0.0,
        transparency: 0.0,
    };

    /// Opacity, the complement of transparency (the `d` dissolve value)
    pub fn dissolve(&self) -> f32 {
        1.0 - self.transparency
    }

    /// Set transparency from a dissolve value
    pub fn set_dissolve(&mut self, dissolve: f32) {
        self.transparency = 1.0 - dissolve;
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AbsDiffEq for Material {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.ambient.abs_diff_eq(&other.ambient, epsilon)
            && self.diffuse.abs_diff_eq(&other.diffuse, epsilon)
            && self.specular.abs_diff_eq(&other.specular, epsilon)
            && self.shininess.abs_diff_eq(&other.shininess, epsilon)
            && self.transparency.abs_diff_eq(&other.transparency, epsilon)
    }
}
