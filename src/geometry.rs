//! Geographic coordinates and the distances between them.

use crate::Error;
use nalgebra::Vector2;
use std::fmt;

/// Mean Earth radius, in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A (latitude, longitude) pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, checking that both components are finite and within
    /// `[-90, 90]` and `[-180, 180]` respectively.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        let coordinate = Self::new_unchecked(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(coordinate)
    }

    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// The coordinate as a point of the (latitude, longitude) plane.
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.latitude, self.longitude)
    }

    pub fn from_vector(v: Vector2<f64>) -> Self {
        Self::new_unchecked(v.x, v.y)
    }

    /// Euclidean distance in degree units, treating latitude and longitude as
    /// the axes of a flat plane.
    pub fn planar_distance(self, other: Coordinate) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_distance(self, other: Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = f64::sin(dlat / 2.0).powi(2)
            + lat1.cos() * lat2.cos() * f64::sin(dlon / 2.0).powi(2);
        2.0 * EARTH_RADIUS_KM * f64::asin(f64::min(a.sqrt(), 1.0))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// How the distance between a new order and a centroid is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Euclidean distance on raw degrees.
    ///
    /// Ignores the curvature of the Earth and the compression of longitudes
    /// away from the equator, which is fine at the scale of a city.
    #[default]
    Planar,

    /// Great-circle distance, in kilometres.
    Haversine,
}

impl Metric {
    pub fn distance(self, a: Coordinate, b: Coordinate) -> f64 {
        match self {
            Metric::Planar => a.planar_distance(b),
            Metric::Haversine => a.haversine_distance(b),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planar" | "euclidean" => Ok(Metric::Planar),
            "haversine" | "geodesic" => Ok(Metric::Haversine),
            _ => Err(format!("unknown metric {s:?}, expected planar or haversine")),
        }
    }
}
