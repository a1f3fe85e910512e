//! Order dataset encoder/decoder.
//!
//! Datasets are CSV files with a header row and the following columns:
//!
//! - `zone` (or `recipient_zone_original`): zone identifier,
//! - `latitude`, `longitude`: coordinate in degrees,
//! - `cluster`: cluster id, empty for unlabeled orders,
//! - `area_name` (or `recipient_area_original`): optional display name.
//!
//! Columns may appear in any order, and unknown columns are ignored.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use zonal::ClusterId;
use zonal::Coordinate;
use zonal::Order;
use zonal::OrderDataset;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Csv(csv::Error),
    /// A row with an empty zone identifier.
    EmptyZone { line: u64 },
    /// A row that parsed, but does not describe a valid order.
    InvalidRecord { line: u64, source: zonal::Error },
    /// The orders are valid one by one, but not as a whole dataset.
    InvalidDataset(zonal::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Error {
        Error::Csv(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "read/write error: {err}"),
            Error::Csv(err) => write!(f, "malformed csv: {err}"),
            Error::EmptyZone { line } => write!(f, "line {line}: empty zone"),
            Error::InvalidRecord { line, source } => write!(f, "line {line}: {source}"),
            Error::InvalidDataset(err) => write!(f, "invalid dataset: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::EmptyZone { .. } => None,
            Error::InvalidRecord { source, .. } => Some(source),
            Error::InvalidDataset(err) => Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Deserialize, Serialize)]
struct Record {
    #[serde(alias = "recipient_zone_original")]
    zone: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    cluster: Option<ClusterId>,
    #[serde(default, alias = "recipient_area_original")]
    area_name: Option<String>,
}

impl Record {
    /// Convert the record found at `line` of the input.
    fn into_order(self, line: u64) -> Result<Order> {
        if self.zone.is_empty() {
            return Err(Error::EmptyZone { line });
        }
        let coordinate = Coordinate::new(self.latitude, self.longitude)
            .map_err(|source| Error::InvalidRecord { line, source })?;
        let mut order = Order::new(self.zone, coordinate);
        order.cluster_id = self.cluster;
        order.area_name = self.area_name.filter(|name| !name.is_empty());
        Ok(order)
    }
}

impl From<&Order> for Record {
    fn from(order: &Order) -> Record {
        Record {
            zone: order.zone.clone(),
            latitude: order.coordinate.latitude,
            longitude: order.coordinate.longitude,
            cluster: order.cluster_id,
            area_name: order.area_name.clone(),
        }
    }
}

/// Read orders from a CSV stream.
///
/// Wrapping `r` in a [`std::io::BufReader`] is not needed, the CSV reader
/// buffers on its own.
pub fn read_orders<R>(r: R) -> Result<Vec<Order>>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(r);
    let headers = reader.headers()?.clone();

    let mut orders = Vec::new();
    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map_or(0, |pos| pos.line());
        let record: Record = row.deserialize(Some(&headers))?;
        orders.push(record.into_order(line)?);
    }

    Ok(orders)
}

/// Read and validate a whole dataset from a CSV stream.
pub fn read<R>(r: R) -> Result<OrderDataset>
where
    R: io::Read,
{
    let orders = read_orders(r)?;
    OrderDataset::new(orders).map_err(Error::InvalidDataset)
}

pub fn from_file(path: impl AsRef<Path>) -> Result<OrderDataset> {
    let file = fs::File::open(path)?;
    read(file)
}

/// Write orders as CSV, header included.
///
/// Wrapping `w` in a [`std::io::BufWriter`] is not needed.
pub fn write<'a, I, W>(w: W, orders: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Order>,
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(w);
    for order in orders {
        writer.serialize(Record::from(order))?;
    }
    writer.flush()?;
    Ok(())
}
