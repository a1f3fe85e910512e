//! Zone scoping of the order dataset.

use crate::dataset::Order;
use crate::dataset::OrderDataset;
use crate::geometry::Coordinate;
use crate::Error;
use std::ops::Deref;

/// The orders of a single zone currently used to compute centroids.
///
/// A working set borrows its orders from the dataset and keeps them in dataset
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet<'a> {
    pub(crate) orders: Vec<&'a Order>,
}

impl<'a> WorkingSet<'a> {
    pub fn new(orders: Vec<&'a Order>) -> Self {
        Self { orders }
    }

    pub fn orders(&self) -> &[&'a Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<&'a Order> {
        self.orders
    }

    /// Mean coordinate of all orders, or `None` for an empty set.
    pub fn mean_coordinate(&self) -> Option<Coordinate> {
        if self.orders.is_empty() {
            return None;
        }
        let sum = self
            .orders
            .iter()
            .map(|order| order.coordinate.to_vector())
            .sum::<nalgebra::Vector2<f64>>();
        Some(Coordinate::from_vector(sum / self.orders.len() as f64))
    }
}

impl<'a> Deref for WorkingSet<'a> {
    type Target = [&'a Order];

    fn deref(&self) -> &Self::Target {
        &self.orders
    }
}

impl<'a> FromIterator<&'a Order> for WorkingSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Order>>(iter: I) -> Self {
        Self {
            orders: iter.into_iter().collect(),
        }
    }
}

/// Select the orders of `zone`.
///
/// Fails with [`Error::UnknownZone`] if `zone` is not in the dataset's zone
/// set. A declared zone without orders yields an empty working set.
pub fn scope_to_zone<'a>(dataset: &'a OrderDataset, zone: &str) -> Result<WorkingSet<'a>, Error> {
    if !dataset.contains_zone(zone) {
        return Err(Error::UnknownZone {
            zone: zone.to_string(),
        });
    }
    Ok(dataset
        .orders()
        .iter()
        .filter(|order| order.zone == zone)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    fn dataset() -> OrderDataset {
        OrderDataset::new(vec![
            Order::new("Beirut", Coordinate::new_unchecked(33.0, 35.0)).with_cluster(0),
            Order::new("Tripoli", Coordinate::new_unchecked(34.0, 35.8)).with_cluster(0),
            Order::new("Beirut", Coordinate::new_unchecked(34.0, 36.0)).with_cluster(1),
            Order::new("Beirut", Coordinate::new_unchecked(35.0, 37.0)).with_cluster(0),
        ])
        .unwrap()
    }

    #[test]
    fn test_scope_preserves_order() {
        let dataset = dataset();
        let ws = scope_to_zone(&dataset, "Beirut").unwrap();
        assert_eq!(ws.len(), 3);
        assert!(ws.iter().all(|order| order.zone == "Beirut"));
        let lats: Vec<f64> = ws.iter().map(|o| o.coordinate.latitude).collect();
        assert_eq!(lats, [33.0, 34.0, 35.0]);
    }

    #[test]
    fn test_unknown_zone() {
        let dataset = dataset();
        let err = scope_to_zone(&dataset, "Sidon").unwrap_err();
        assert!(matches!(err, Error::UnknownZone { zone } if zone == "Sidon"));
    }

    #[test]
    fn test_empty_zone_is_not_unknown() {
        let dataset = OrderDataset::with_zones(dataset().orders().to_vec(), ["Sidon"]).unwrap();
        let ws = scope_to_zone(&dataset, "Sidon").unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_mean_coordinate() {
        let dataset = dataset();
        let ws = scope_to_zone(&dataset, "Beirut").unwrap();
        let mean = ws.mean_coordinate().unwrap();
        assert_ulps_eq!(mean.latitude, 34.0);
        assert_ulps_eq!(mean.longitude, 36.0);
        assert_eq!(WorkingSet::default().mean_coordinate(), None);
    }
}
