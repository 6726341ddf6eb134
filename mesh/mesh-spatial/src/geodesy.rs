//! Ellipsoid and projection math.
//!
//! Geographic positions are `(lon, lat, h)` in degrees and ellipsoidal metres,
//! matching the x/y/z order vertices use for WGS-84 meshes.

use nalgebra::{Matrix3, Point3, Vector3};

/// WGS-84 ellipsoid constants.
pub mod wgs84 {
    /// Semi-major axis (equatorial radius) in meters.
    pub const A: f64 = 6_378_137.0;

    /// Flattening factor (1 / 298.257223563).
    pub const F: f64 = 1.0 / 298.257_223_563;

    /// First eccentricity squared.
    pub const E2: f64 = F * (2.0 - F);

    /// Semi-minor axis (polar radius) in meters.
    pub const B: f64 = A * (1.0 - F);

    /// Second eccentricity squared.
    pub const E2P: f64 = (A * A - B * B) / (B * B);
}

/// Sphere radius used by Web Mercator.
pub const WEB_MERCATOR_RADIUS: f64 = wgs84::A;

/// Geodetic `(lon, lat, h)` to Earth-centred, Earth-fixed metres.
#[inline]
#[must_use]
pub fn geodetic_to_ecef(lon_deg: f64, lat_deg: f64, h_m: f64) -> Point3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    // Prime vertical radius of curvature
    let n = wgs84::A / (1.0 - wgs84::E2 * sin_lat * sin_lat).sqrt();

    Point3::new(
        (n + h_m) * cos_lat * cos_lon,
        (n + h_m) * cos_lat * sin_lon,
        (n * (1.0 - wgs84::E2) + h_m) * sin_lat,
    )
}

/// ECEF metres back to geodetic `(lon, lat, h)` (Bowring's method).
#[inline]
#[must_use]
pub fn ecef_to_geodetic(ecef: &Point3<f64>) -> Point3<f64> {
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);
    let p = x.hypot(y);
    let lon = y.atan2(x);

    let theta = (z * wgs84::A).atan2(p * wgs84::B);
    let (sin_theta, cos_theta) = theta.sin_cos();

    let lat = (z + wgs84::E2P * wgs84::B * sin_theta.powi(3))
        .atan2(p - wgs84::E2 * wgs84::A * cos_theta.powi(3));

    let sin_lat = lat.sin();
    let n = wgs84::A / (1.0 - wgs84::E2 * sin_lat * sin_lat).sqrt();
    let h = p / lat.cos() - n;

    Point3::new(lon.to_degrees(), lat.to_degrees(), h)
}

/// Inverse spherical Mercator: easting/northing metres to `(lon, lat)`.
#[inline]
#[must_use]
pub fn web_mercator_to_geodetic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    (lon, lat)
}

/// Forward spherical Mercator: `(lon, lat)` to easting/northing metres.
#[inline]
#[must_use]
pub fn geodetic_to_web_mercator(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = WEB_MERCATOR_RADIUS * lon_deg.to_radians();
    let y = WEB_MERCATOR_RADIUS
        * (std::f64::consts::FRAC_PI_4 + lat_deg.to_radians() / 2.0)
            .tan()
            .ln();
    (x, y)
}

/// Rotation from ECEF axes to east/north/up at a geodetic position.
#[must_use]
pub fn ecef_to_enu_rotation(lon_deg: f64, lat_deg: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Tangent-plane frame anchored at a geodetic origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnuFrame {
    origin_ecef: Point3<f64>,
    rotation: Matrix3<f64>,
}

impl EnuFrame {
    /// Frame whose origin is the given geodetic position.
    #[must_use]
    pub fn at(lon_deg: f64, lat_deg: f64, h_m: f64) -> Self {
        Self {
            origin_ecef: geodetic_to_ecef(lon_deg, lat_deg, h_m),
            rotation: ecef_to_enu_rotation(lon_deg, lat_deg),
        }
    }

    /// ECEF point to east/north/up metres relative to the origin.
    #[must_use]
    pub fn ecef_to_enu(&self, ecef: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * (ecef - self.origin_ecef))
    }

    /// Geodetic position to east/north/up metres relative to the origin.
    #[must_use]
    pub fn geodetic_to_enu(&self, lon_deg: f64, lat_deg: f64, h_m: f64) -> Point3<f64> {
        self.ecef_to_enu(&geodetic_to_ecef(lon_deg, lat_deg, h_m))
    }

    /// Re-express a direction given in the ENU frame at `(lon, lat)` in this frame.
    #[must_use]
    pub fn rotate_from_local(&self, lon_deg: f64, lat_deg: f64, dir: &Vector3<f64>) -> Vector3<f64> {
        let local = ecef_to_enu_rotation(lon_deg, lat_deg);
        self.rotation * (local.transpose() * dir)
    }
}
