//! Per-zone cache of centroids, built once per dataset and sampling.

use crate::assign::assign_nearest_with;
use crate::assign::Assignment;
use crate::centroid::compute_centroids;
use crate::centroid::Clusters;
use crate::dataset::OrderDataset;
use crate::geometry::Coordinate;
use crate::geometry::Metric;
use crate::sample::Sampling;
use crate::scope::scope_to_zone;
use crate::Error;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Centroids and summary of a zone's working set.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEntry {
    pub clusters: Clusters,
    /// Number of orders in the working set, after sampling.
    pub working_set_len: usize,
    /// Mean coordinate of the working set, `None` if it is empty.
    pub mean_coordinate: Option<Coordinate>,
}

/// The clusters of every zone of a dataset.
///
/// The index is immutable. Changing the sampling settings or the dataset means
/// building a new one.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), zonal::Error> {
/// use zonal::{Coordinate, Order, OrderDataset, Sampling, ZoneIndex};
///
/// let dataset = OrderDataset::new(vec![
///     Order::new("Beirut", Coordinate::new(33.89, 35.50)?).with_cluster(0),
///     Order::new("Beirut", Coordinate::new(33.95, 35.60)?).with_cluster(1),
/// ])?;
/// let index = ZoneIndex::build(&dataset, Sampling::default());
///
/// let assignment = index.assign("Beirut", Coordinate::new(33.94, 35.58)?)?;
/// assert_eq!(assignment.cluster_id, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    zones: BTreeMap<String, ZoneEntry>,
    sampling: Sampling,
    metric: Metric,
}

impl ZoneIndex {
    /// Scope, sample and compute the centroids of each zone of `dataset`.
    ///
    /// Zones are processed in parallel.
    pub fn build(dataset: &OrderDataset, sampling: Sampling) -> Self {
        let span = tracing::info_span!("build zone index", zones = dataset.zones().len());
        let _enter = span.enter();

        let zones: Vec<&str> = dataset.zones().collect();
        let zones = zones
            .into_par_iter()
            .filter_map(|zone| {
                // Zones come from the dataset itself, so scoping cannot fail.
                let working_set = sampling.apply(scope_to_zone(dataset, zone).ok()?);
                let entry = ZoneEntry {
                    clusters: compute_centroids(&working_set),
                    working_set_len: working_set.len(),
                    mean_coordinate: working_set.mean_coordinate(),
                };
                tracing::debug!(
                    zone,
                    orders = entry.working_set_len,
                    clusters = entry.clusters.len(),
                    "indexed zone"
                );
                Some((zone.to_string(), entry))
            })
            .collect();

        Self {
            zones,
            sampling,
            metric: Metric::default(),
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Indexed zones, in lexicographic order.
    pub fn zones(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.zones.keys().map(String::as_str)
    }

    pub fn zone(&self, zone: &str) -> Result<&ZoneEntry, Error> {
        self.zones.get(zone).ok_or_else(|| Error::UnknownZone {
            zone: zone.to_string(),
        })
    }

    pub fn clusters(&self, zone: &str) -> Result<&Clusters, Error> {
        self.zone(zone).map(|entry| &entry.clusters)
    }

    pub fn mean_coordinate(&self, zone: &str) -> Result<Option<Coordinate>, Error> {
        self.zone(zone).map(|entry| entry.mean_coordinate)
    }

    /// Assign `coordinate` to the nearest cluster of `zone`.
    pub fn assign(&self, zone: &str, coordinate: Coordinate) -> Result<Assignment, Error> {
        let clusters = self.clusters(zone)?;
        assign_nearest_with(coordinate, clusters, self.metric)
    }
}
