//! Historical orders and the immutable dataset that holds them.

use crate::geometry::Coordinate;
use crate::Error;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identifier of a cluster, unique within a zone only.
pub type ClusterId = i64;

/// A delivery order.
///
/// Historical orders carry the id of the cluster they were labeled with. New
/// orders have none until they are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub coordinate: Coordinate,
    pub zone: String,
    pub area_name: Option<String>,
    pub cluster_id: Option<ClusterId>,
}

impl Order {
    pub fn new(zone: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            zone: zone.into(),
            area_name: None,
            cluster_id: None,
        }
    }

    pub fn with_cluster(mut self, cluster_id: ClusterId) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }

    pub fn with_area_name(mut self, area_name: impl Into<String>) -> Self {
        self.area_name = Some(area_name.into());
        self
    }

    fn check(&self, index: usize) -> Result<(), Error> {
        if self.zone.is_empty() {
            return Err(Error::InvalidOrder {
                index,
                reason: "empty zone".to_string(),
            });
        }
        if !self.coordinate.is_valid() {
            return Err(Error::InvalidOrder {
                index,
                reason: format!("coordinate {} is out of range", self.coordinate),
            });
        }
        Ok(())
    }
}

/// An immutable collection of historical orders.
///
/// Build it once and share it (see [`OrderDataset::into_shared`]). Reloading
/// the data means building a new dataset and swapping the handle, never
/// mutating the old one.
#[derive(Debug, Clone, Default)]
pub struct OrderDataset {
    orders: Vec<Order>,
    zones: BTreeSet<String>,
}

impl OrderDataset {
    /// Validate `orders` and index their zones.
    ///
    /// Fails with [`Error::InvalidOrder`] on the first order with an empty
    /// zone or an out-of-range coordinate.
    pub fn new(orders: Vec<Order>) -> Result<Self, Error> {
        let mut zones = BTreeSet::new();
        for (index, order) in orders.iter().enumerate() {
            order.check(index)?;
            if !zones.contains(&order.zone) {
                zones.insert(order.zone.clone());
            }
        }
        tracing::debug!(orders = orders.len(), zones = zones.len(), "dataset loaded");
        Ok(Self { orders, zones })
    }

    /// Like [`OrderDataset::new`], but also declares `zones` as part of the
    /// dataset's zone set even if no order belongs to them.
    ///
    /// Fails with [`Error::EmptyZoneDeclaration`] if one of `zones` is empty.
    pub fn with_zones<I, S>(orders: Vec<Order>, zones: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(orders)?;
        for zone in zones {
            let zone = zone.into();
            if zone.is_empty() {
                return Err(Error::EmptyZoneDeclaration);
            }
            dataset.zones.insert(zone);
        }
        Ok(dataset)
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Zone identifiers, in lexicographic order.
    pub fn zones(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.zones.iter().map(String::as_str)
    }

    pub fn contains_zone(&self, zone: &str) -> bool {
        self.zones.contains(zone)
    }
}

impl TryFrom<Vec<Order>> for OrderDataset {
    type Error = Error;

    fn try_from(orders: Vec<Order>) -> Result<Self, Self::Error> {
        Self::new(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones_are_sorted_and_unique() {
        let dataset = OrderDataset::new(vec![
            Order::new("Tripoli", Coordinate::new_unchecked(34.43, 35.84)).with_cluster(0),
            Order::new("Beirut", Coordinate::new_unchecked(33.89, 35.50)).with_cluster(0),
            Order::new("Tripoli", Coordinate::new_unchecked(34.44, 35.83)).with_cluster(1),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.zones().collect::<Vec<_>>(), ["Beirut", "Tripoli"]);
        assert!(dataset.contains_zone("Beirut"));
        assert!(!dataset.contains_zone("Sidon"));
    }

    #[test]
    fn test_rejects_invalid_orders() {
        let err = OrderDataset::new(vec![
            Order::new("Beirut", Coordinate::new_unchecked(33.89, 35.50)),
            Order::new("Beirut", Coordinate::new_unchecked(91.0, 35.50)),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOrder { index: 1, .. }));

        let err = OrderDataset::new(vec![Order::new("", Coordinate::default())]).unwrap_err();
        assert!(matches!(err, Error::InvalidOrder { index: 0, .. }));
    }

    #[test]
    fn test_declared_zones() {
        let orders = vec![Order::new("Beirut", Coordinate::new_unchecked(33.89, 35.50))];

        let dataset = OrderDataset::with_zones(orders.clone(), ["Zahle"]).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.zones().collect::<Vec<_>>(), ["Beirut", "Zahle"]);

        let err = OrderDataset::with_zones(orders, ["Zahle", ""]).unwrap_err();
        assert_eq!(err, Error::EmptyZoneDeclaration);
    }
}
