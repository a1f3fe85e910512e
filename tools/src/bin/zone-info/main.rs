use anyhow::Context as _;
use anyhow::Result;
use itertools::Itertools as _;
use std::env;
use std::fs;
use std::io;
use zonal::OrderDataset;
use zonal::Sampling;

const USAGE: &str = "Usage: zone-info [options] -d dataset.csv";

fn list_zones(dataset: &OrderDataset) {
    let counts = dataset.orders().iter().counts_by(|order| order.zone.as_str());
    for zone in dataset.zones() {
        println!("{zone}\t{}", counts.get(zone).copied().unwrap_or(0));
    }
}

fn show_zone(
    dataset: &OrderDataset,
    zone: &str,
    sampling: Sampling,
    output: Option<String>,
) -> Result<()> {
    let working_set = zonal::scope_to_zone(dataset, zone).map_err(zonal_tools::explain)?;
    let total = working_set.len();
    let working_set = sampling.apply(working_set);
    let clusters = zonal::compute_centroids(&working_set);

    println!("zone: {zone}");
    println!("orders: {} (of {total})", working_set.len());
    if let Some(mean) = working_set.mean_coordinate() {
        println!("mean coordinate: {mean}");
    }
    println!("clusters: {}", clusters.len());
    for cluster in clusters.values() {
        println!(
            "  {}\t{}\t{}",
            cluster.cluster_id, cluster.centroid, cluster.member_count,
        );
    }

    if let Some(output) = output {
        let file = fs::File::create(&output)
            .with_context(|| format!("failed to create output file {output:?}"))?;
        dataset_io::write(io::BufWriter::new(file), working_set.iter().copied())
            .context("failed to write working set")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    zonal_tools::common_options(&mut options);
    options.optopt("z", "zone", "show the clusters of this zone", "ZONE");
    options.optopt("o", "output", "export the zone's working set as CSV", "FILE");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }

    let _chrome_trace_guard = zonal_tools::init_tracing(matches.opt_str("t"));

    let dataset = zonal_tools::load_dataset(&matches)?;
    let sampling = zonal_tools::parse_sampling(&matches)?;

    match matches.opt_str("z") {
        Some(zone) => show_zone(&dataset, &zone, sampling, matches.opt_str("o"))?,
        None => {
            anyhow::ensure!(
                !matches.opt_present("o"),
                "option 'output' requires option 'zone'"
            );
            list_zones(&dataset);
        }
    }

    Ok(())
}
