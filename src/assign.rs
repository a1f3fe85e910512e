//! Nearest-centroid assignment of new orders.

use crate::centroid::Clusters;
use crate::dataset::ClusterId;
use crate::geometry::Coordinate;
use crate::geometry::Metric;
use crate::Error;
use rayon::prelude::*;

/// The cluster a new order was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub cluster_id: ClusterId,
    /// Distance from the order to the centroid of its cluster, in the unit of
    /// the metric used (degrees for [`Metric::Planar`]).
    pub distance: f64,
    pub zone: String,
}

/// Assign `coordinate` to the cluster with the nearest centroid, using the
/// planar metric.
///
/// Exact ties are broken in favor of the lowest cluster id.
///
/// # Errors
///
/// - [`Error::InvalidCoordinate`] if `coordinate` is not finite or out of
///   range,
/// - [`Error::NoClustersAvailable`] if `clusters` is empty.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), zonal::Error> {
/// use zonal::{Cluster, Clusters, Coordinate};
///
/// let mut clusters = Clusters::new();
/// for (cluster_id, latitude) in [(0, 33.89), (1, 33.95)] {
///     clusters.insert(cluster_id, Cluster {
///         zone: "Beirut".to_string(),
///         cluster_id,
///         centroid: Coordinate::new(latitude, 35.50)?,
///         member_count: 1,
///     });
/// }
///
/// let assignment = zonal::assign_nearest(Coordinate::new(33.90, 35.50)?, &clusters)?;
/// assert_eq!(assignment.cluster_id, 0);
/// # Ok(())
/// # }
/// ```
pub fn assign_nearest(coordinate: Coordinate, clusters: &Clusters) -> Result<Assignment, Error> {
    assign_nearest_with(coordinate, clusters, Metric::Planar)
}

/// Same as [`assign_nearest`], measuring distances with `metric`.
pub fn assign_nearest_with(
    coordinate: Coordinate,
    clusters: &Clusters,
    metric: Metric,
) -> Result<Assignment, Error> {
    if !coordinate.is_valid() {
        return Err(Error::InvalidCoordinate {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        });
    }

    // Clusters iterate by increasing id, so keeping the first strict minimum
    // resolves ties toward the lowest id.
    let mut nearest = None;
    for cluster in clusters.values() {
        let distance = metric.distance(coordinate, cluster.centroid);
        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((cluster, distance)),
        }
    }

    let (cluster, distance) = nearest.ok_or(Error::NoClustersAvailable)?;
    Ok(Assignment {
        cluster_id: cluster.cluster_id,
        distance,
        zone: cluster.zone.clone(),
    })
}

/// Assign each of `coordinates` in parallel.
///
/// The output has one entry per input coordinate, in the same order.
pub fn assign_many(
    coordinates: &[Coordinate],
    clusters: &Clusters,
    metric: Metric,
) -> Vec<Result<Assignment, Error>> {
    let span = tracing::info_span!("assign_many", count = coordinates.len());
    let _enter = span.enter();

    coordinates
        .par_iter()
        .map(|coordinate| assign_nearest_with(*coordinate, clusters, metric))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centroid::Cluster;
    use approx::assert_ulps_eq;
    use proptest::prelude::*;

    fn make_clusters(centroids: &[(ClusterId, f64, f64)]) -> Clusters {
        centroids
            .iter()
            .map(|&(cluster_id, lat, lon)| {
                let cluster = Cluster {
                    zone: "Beirut".to_string(),
                    cluster_id,
                    centroid: Coordinate::new_unchecked(lat, lon),
                    member_count: 1,
                };
                (cluster_id, cluster)
            })
            .collect()
    }

    #[test]
    fn test_assign_on_centroid() {
        let clusters = make_clusters(&[(0, 33.89, 35.50), (1, 33.90, 35.52), (2, 34.0, 35.6)]);
        let assignment = assign_nearest(Coordinate::new_unchecked(33.90, 35.52), &clusters).unwrap();
        assert_eq!(assignment.cluster_id, 1);
        assert_eq!(assignment.zone, "Beirut");
        assert_ulps_eq!(assignment.distance, 0.0);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        // The new order sits exactly between both centroids.
        let clusters = make_clusters(&[(5, 1.0, 0.0), (2, -1.0, 0.0)]);
        for _ in 0..10 {
            let assignment = assign_nearest(Coordinate::new_unchecked(0.0, 0.0), &clusters).unwrap();
            assert_eq!(assignment.cluster_id, 2);
            assert_ulps_eq!(assignment.distance, 1.0);
        }

        let clusters = make_clusters(&[(3, 0.0, 2.0), (1, 0.0, -2.0), (9, 2.0, 0.0)]);
        let assignment = assign_nearest(Coordinate::new_unchecked(0.0, 0.0), &clusters).unwrap();
        assert_eq!(assignment.cluster_id, 1);
    }

    #[test]
    fn test_no_clusters() {
        let err = assign_nearest(Coordinate::new_unchecked(33.9, 35.5), &Clusters::new()).unwrap_err();
        assert!(matches!(err, Error::NoClustersAvailable));
    }

    #[test]
    fn test_invalid_coordinate() {
        let clusters = make_clusters(&[(0, 33.89, 35.50)]);
        for (lat, lon) in [
            (90.0001, 35.5),
            (-90.0001, 35.5),
            (33.9, 180.0001),
            (f64::NAN, 35.5),
            (33.9, f64::NEG_INFINITY),
        ] {
            let err = assign_nearest(Coordinate::new_unchecked(lat, lon), &clusters).unwrap_err();
            assert!(matches!(err, Error::InvalidCoordinate { .. }));
        }

        // Validation comes first, even without clusters.
        let err = assign_nearest(Coordinate::new_unchecked(91.0, 0.0), &Clusters::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_haversine_metric() {
        let clusters = make_clusters(&[(0, 60.0, 0.0), (1, 60.0, 1.9)]);
        let target = Coordinate::new_unchecked(60.9, 1.0);
        let planar = assign_nearest_with(target, &clusters, Metric::Planar).unwrap();
        let haversine = assign_nearest_with(target, &clusters, Metric::Haversine).unwrap();
        assert_eq!(planar.cluster_id, haversine.cluster_id);
        assert!(haversine.distance > 50.0);
    }

    #[test]
    fn test_assign_many() {
        let clusters = make_clusters(&[(0, 0.0, 0.0), (1, 10.0, 10.0)]);
        let coordinates = [
            Coordinate::new_unchecked(1.0, 1.0),
            Coordinate::new_unchecked(95.0, 1.0),
            Coordinate::new_unchecked(9.0, 9.0),
        ];
        let results = assign_many(&coordinates, &clusters, Metric::Planar);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().cluster_id, 0);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().cluster_id, 1);
    }

    proptest!(
        /// Assigning twice gives the same answer, and no centroid is nearer.
        #[test]
        fn idempotent_and_minimal(
            centroids in prop::collection::vec((0..20i64, -90.0..90.0f64, -180.0..180.0f64), 1..40),
            lat in -90.0..90.0f64,
            lon in -180.0..180.0f64,
        ) {
            let clusters = make_clusters(&centroids);
            let target = Coordinate::new_unchecked(lat, lon);
            let first = assign_nearest(target, &clusters).unwrap();
            let second = assign_nearest(target, &clusters).unwrap();
            prop_assert_eq!(&first, &second);
            for cluster in clusters.values() {
                prop_assert!(first.distance <= target.planar_distance(cluster.centroid));
            }
        }

        /// Centroids mirrored around the new order are equidistant, and the
        /// lowest id wins whatever the insertion order.
        #[test]
        fn tie_goes_to_lowest_id(
            (x, y) in (-300..300i32, -700..700i32),
            d in 1..40i32,
            along_latitude in any::<bool>(),
            (a, b) in (0..50i64, 0..50i64).prop_filter("distinct ids", |(a, b)| a != b),
        ) {
            // Quarter degrees keep every coordinate and difference exact.
            let (x, y, d) = (x as f64 / 4.0, y as f64 / 4.0, d as f64 / 4.0);
            let (dx, dy) = if along_latitude { (d, 0.0) } else { (0.0, d) };
            let clusters = make_clusters(&[
                (a, x + dx, y + dy),
                (b, x - dx, y - dy),
                (100, x + 3.0 * dx, y + 3.0 * dy),
            ]);

            let assignment = assign_nearest(Coordinate::new_unchecked(x, y), &clusters).unwrap();
            prop_assert_eq!(assignment.cluster_id, i64::min(a, b));
            prop_assert_eq!(assignment.distance, d);
        }
    );
}
