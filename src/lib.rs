//! A library that assigns new delivery orders to the nearest cluster of
//! historical orders within their zone.
//!
//! # Crate Layout
//!
//! The assignment pipeline is made of four steps, each exposed as a free
//! function:
//!
//! 1. [`scope_to_zone`] selects the orders of a zone from an [`OrderDataset`],
//! 2. [`sample`] optionally bounds the size of that [`WorkingSet`] with a
//!    seeded generator,
//! 3. [`compute_centroids`] averages the coordinates of each cluster,
//! 4. [`assign_nearest`] picks the cluster whose centroid is the nearest to a
//!    new coordinate.
//!
//! [`ZoneIndex`] runs steps 1 to 3 for every zone of a dataset once, and then
//! answers assignment requests.
//!
//! All functions are pure: the dataset is never mutated, and none of them
//! hold global state.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod assign;
mod centroid;
mod dataset;
mod geometry;
mod index;
mod sample;
mod scope;


pub use crate::assign::assign_many;
pub use crate::assign::assign_nearest;
pub use crate::assign::assign_nearest_with;
pub use crate::assign::Assignment;
pub use crate::centroid::compute_centroids;
pub use crate::centroid::Cluster;
pub use crate::centroid::Clusters;
pub use crate::dataset::ClusterId;
pub use crate::dataset::Order;
pub use crate::dataset::OrderDataset;
pub use crate::geometry::Coordinate;
pub use crate::geometry::Metric;
pub use crate::index::ZoneEntry;
pub use crate::index::ZoneIndex;
pub use crate::sample::rng;
pub use crate::sample::sample;
pub use crate::sample::sample_seeded;
pub use crate::sample::Sampling;
pub use crate::scope::scope_to_zone;
pub use crate::scope::WorkingSet;

pub use rand;
pub use rayon;

use std::fmt;

/// Errors returned by the assignment pipeline.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The requested zone is not part of the dataset.
    UnknownZone { zone: String },

    /// The zone has no cluster in its current working set.
    NoClustersAvailable,

    /// The coordinate is not finite, or out of the valid latitude/longitude
    /// ranges.
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// An order given to [`OrderDataset::new`] is malformed.
    InvalidOrder { index: usize, reason: String },

    /// A zone declared with [`OrderDataset::with_zones`] has an empty
    /// identifier.
    EmptyZoneDeclaration,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownZone { zone } => write!(f, "unknown zone {zone:?}"),
            Error::NoClustersAvailable => {
                write!(f, "cannot assign, no reference clusters in this zone")
            }
            Error::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(
                f,
                "invalid coordinate ({latitude}, {longitude}), expected a latitude in [-90, 90] and a longitude in [-180, 180]",
            ),
            Error::InvalidOrder { index, reason } => write!(f, "invalid order #{index}: {reason}"),
            Error::EmptyZoneDeclaration => write!(f, "declared zone identifier is empty"),
        }
    }
}

impl std::error::Error for Error {}
