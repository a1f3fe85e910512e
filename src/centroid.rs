//! Per-cluster centroids of a working set.

use crate::dataset::ClusterId;
use crate::geometry::Coordinate;
use crate::scope::WorkingSet;
use itertools::Itertools as _;
use nalgebra::Vector2;
use std::collections::BTreeMap;

/// A zone-scoped group of historical orders, represented by its centroid.
///
/// Clusters are derived from a working set and become stale as soon as the
/// working set of their zone changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub zone: String,
    pub cluster_id: ClusterId,
    pub centroid: Coordinate,
    pub member_count: usize,
}

/// The clusters of a single zone, addressed by id.
pub type Clusters = BTreeMap<ClusterId, Cluster>;

/// Compute the mean coordinate of every cluster of `working_set`.
///
/// All orders of `working_set` must belong to the same zone, as the sets
/// returned by [`scope_to_zone`] do. Cluster ids are only unique within a
/// zone, so mixing zones would merge unrelated clusters.
///
/// Orders without a cluster id do not contribute to any centroid. An empty
/// working set gives an empty mapping.
///
/// [`scope_to_zone`]: crate::scope_to_zone
pub fn compute_centroids(working_set: &WorkingSet<'_>) -> Clusters {
    let unlabeled = working_set
        .iter()
        .filter(|order| order.cluster_id.is_none())
        .count();
    if unlabeled != 0 {
        tracing::debug!(unlabeled, "ignoring orders without a cluster id");
    }

    let zone = match working_set.first() {
        Some(order) => order.zone.as_str(),
        None => return Clusters::new(),
    };
    debug_assert!(
        working_set.iter().all(|order| order.zone == zone),
        "working set mixes several zones",
    );

    working_set
        .iter()
        .filter_map(|order| {
            let cluster_id = order.cluster_id?;
            Some((cluster_id, order.coordinate.to_vector()))
        })
        .into_grouping_map()
        .fold((Vector2::<f64>::zeros(), 0usize), |(sum, count), _, p| {
            (sum + p, count + 1)
        })
        .into_iter()
        .map(|(cluster_id, (sum, member_count))| {
            let cluster = Cluster {
                zone: zone.to_string(),
                cluster_id,
                centroid: Coordinate::from_vector(sum / member_count as f64),
                member_count,
            };
            (cluster_id, cluster)
        })
        .collect()
}
