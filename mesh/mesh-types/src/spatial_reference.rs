//! Coordinate system identifiers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate system identified by its well-known id.
///
/// Vertices are only meaningful relative to their spatial reference. Two
/// meshes can be merged directly only when their references are equal.
///
/// ```
/// use mesh_types::SpatialReference;
///
/// assert!(SpatialReference::WGS84.is_global());
/// assert!(SpatialReference::new(102_100).is_web_mercator());
/// assert!(!SpatialReference::new(2056).is_global());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialReference {
    /// Horizontal well-known id (EPSG or ESRI code).
    pub wkid: u32,
    /// Vertical datum well-known id, if known.
    pub vertical_wkid: Option<u32>,
}

impl SpatialReference {
    /// Geographic WGS-84 (longitude/latitude degrees, ellipsoidal metres).
    pub const WGS84: Self = Self::new(4326);

    /// Spherical Web Mercator.
    pub const WEB_MERCATOR: Self = Self::new(3857);

    /// Local cartesian frame produced by vertex-space normalization.
    pub const LOCAL: Self = Self::new(0);

    /// Create a reference without a vertical datum.
    #[must_use]
    pub const fn new(wkid: u32) -> Self {
        Self {
            wkid,
            vertical_wkid: None,
        }
    }

    /// Set the vertical datum.
    #[must_use]
    pub const fn with_vertical(mut self, vertical_wkid: u32) -> Self {
        self.vertical_wkid = Some(vertical_wkid);
        self
    }

    /// Geographic WGS-84.
    #[must_use]
    pub const fn is_wgs84(&self) -> bool {
        self.wkid == 4326
    }

    /// Any of the aliases used for spherical Web Mercator.
    #[must_use]
    pub const fn is_web_mercator(&self) -> bool {
        matches!(self.wkid, 3857 | 102_100 | 102_113 | 900_913)
    }

    /// A standard global reference system (geographic or web-projected).
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.is_wgs84() || self.is_web_mercator()
    }

    /// The local frame marker.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.wkid == 0
    }

    /// Equality that treats Web Mercator aliases as the same system.
    #[must_use]
    pub const fn matches(&self, other: &Self) -> bool {
        let horizontal = self.wkid == other.wkid
            || (self.is_web_mercator() && other.is_web_mercator());
        let vertical = match (self.vertical_wkid, other.vertical_wkid) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        horizontal && vertical
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::LOCAL
    }
}

impl std::fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.vertical_wkid {
            Some(v) => write!(f, "wkid:{}+{}", self.wkid, v),
            None => write!(f, "wkid:{}", self.wkid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_mercator_aliases_match() {
        let a = SpatialReference::new(3857);
        let b = SpatialReference::new(102_100);
        assert!(a.matches(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn vertical_datum_mismatch() {
        let a = SpatialReference::new(2056).with_vertical(5728);
        let b = SpatialReference::new(2056).with_vertical(5729);
        let c = SpatialReference::new(2056);
        assert!(!a.matches(&b));
        assert!(a.matches(&c));
    }

    #[test]
    fn display_includes_vertical() {
        let sr = SpatialReference::WGS84.with_vertical(115_700);
        assert_eq!(sr.to_string(), "wkid:4326+115700");
    }
}
