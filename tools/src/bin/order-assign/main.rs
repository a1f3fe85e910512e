use anyhow::Context as _;
use anyhow::Result;
use std::env;
use zonal::Coordinate;
use zonal::Metric;
use zonal::ZoneIndex;

const USAGE: &str = "Usage: order-assign [options] -d dataset.csv";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    zonal_tools::common_options(&mut options);
    options.optopt("z", "zone", "zone of the new order (default: Beirut)", "ZONE");
    options.optopt("", "lat", "latitude of the new order (default: zone mean)", "DEGREES");
    options.optopt("", "lon", "longitude of the new order (default: zone mean)", "DEGREES");
    options.optopt("a", "area", "area name of the new order", "NAME");
    options.optopt("m", "metric", "planar (default) or haversine", "METRIC");
    options.optflag("v", "verbose", "print the clusters of the zone");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }

    let _chrome_trace_guard = zonal_tools::init_tracing(matches.opt_str("t"));

    let dataset = zonal_tools::load_dataset(&matches)?;
    let sampling = zonal_tools::parse_sampling(&matches)?;
    let metric = match matches.opt_str("m") {
        Some(metric) => metric
            .parse::<Metric>()
            .map_err(anyhow::Error::msg)
            .context("invalid option 'metric'")?,
        None => Metric::default(),
    };

    let index = ZoneIndex::build(&dataset, sampling).with_metric(metric);
    let zones: Vec<&str> = index.zones().collect();
    let zone = zonal_tools::select_zone(&matches, &zones).context("dataset has no zone")?;

    let mean = index
        .mean_coordinate(&zone)
        .map_err(zonal_tools::explain)?;
    let latitude: Option<f64> = matches.opt_get("lat").context("invalid option 'lat'")?;
    let longitude: Option<f64> = matches.opt_get("lon").context("invalid option 'lon'")?;
    let (latitude, longitude) = match (latitude, longitude, mean) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (lat, lon, Some(mean)) => (
            lat.unwrap_or(mean.latitude),
            lon.unwrap_or(mean.longitude),
        ),
        _ => anyhow::bail!("zone {zone:?} has no orders, please pass both --lat and --lon"),
    };
    let area = matches
        .opt_str("a")
        .unwrap_or_else(|| format!("New Area, {zone}"));

    if matches.opt_present("v") {
        for cluster in index.clusters(&zone).map_err(zonal_tools::explain)?.values() {
            eprintln!(
                "cluster {}: centroid {}, {} orders",
                cluster.cluster_id, cluster.centroid, cluster.member_count,
            );
        }
    }

    let coordinate = Coordinate::new_unchecked(latitude, longitude);
    let assignment = index
        .assign(&zone, coordinate)
        .map_err(zonal_tools::explain)?;

    let unit = match metric {
        Metric::Planar => "degrees",
        Metric::Haversine => "km",
    };
    println!(
        "{area} {coordinate}: assigned to cluster {} in {} (distance {:.6} {unit})",
        assignment.cluster_id, assignment.zone, assignment.distance,
    );

    Ok(())
}
