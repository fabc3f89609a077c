//! Geographic coordinates and their placement on a sphere.
//!
//! A [`GeoCoordinate`] always stores radians. Use [`GeoCoordinate::from_degrees`]
//! when the source data is in degrees.
//!
//! The conversion follows the usual spherical-to-Cartesian transform
//!
//! ```text
//! a = R · cos(lat) · cos(long)
//! b = R · cos(lat) · sin(long)
//! c = R · sin(lat)
//! ```
//!
//! and [`AxisConvention`] decides how `(a, b, c)` map onto world axes.

use cgmath::Point3;

/// How the converter's `(a, b, c)` components land on the world axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisConvention {
    /// Textbook layout with the poles on Z: `(x, y, z) = (a, b, c)`.
    ZUp,
    /// Poles on Y, longitude 0 on +Z and 90° east on +X: `(x, y, z) = (b, c, a)`.
    ///
    /// This matches the renderer's Y-up world and the equirectangular sphere
    /// texture once the Earth mesh is turned by -π/2 around Y.
    #[default]
    YUp,
}

/// A latitude/longitude pair in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f32,
    pub longitude: f32,
}

/// Downtown Vancouver, BC. Longitude is stored east-positive past 180°.
pub const VANCOUVER: GeoCoordinate = GeoCoordinate {
    latitude: 49.2827 * (std::f32::consts::PI / 180.0),
    longitude: (360.0 - 123.1207) * (std::f32::consts::PI / 180.0),
};

impl GeoCoordinate {
    pub fn from_radians(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn from_degrees(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude: latitude.to_radians(),
            longitude: longitude.to_radians(),
        }
    }

    /// Project onto a sphere of `radius` centered at the origin.
    pub fn to_cartesian(&self, radius: f32, convention: AxisConvention) -> Point3<f32> {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_long, cos_long) = self.longitude.sin_cos();

        let a = radius * cos_lat * cos_long;
        let b = radius * cos_lat * sin_long;
        let c = radius * sin_lat;

        match convention {
            AxisConvention::ZUp => Point3::new(a, b, c),
            AxisConvention::YUp => Point3::new(b, c, a),
        }
    }
}
