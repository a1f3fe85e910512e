use anyhow::Context as _;
use anyhow::Result;
use rand::Rng;
use rand::SeedableRng as _;
use rand_distr::Distribution as _;
use rand_distr::Normal;
use std::env;
use std::io;
use zonal::Coordinate;
use zonal::Order;

const USAGE: &str = "Usage: order-gen [options] >out.csv";

const DEFAULT_ZONES: [&str; 3] = [
    "Beirut,33.8938,35.5018,0.05",
    "Tripoli,34.4367,35.8497,0.04",
    "Sidon,33.5571,35.3729,0.03",
];

#[derive(Debug, Clone, PartialEq)]
struct ZoneDefinition {
    name: String,
    center: Coordinate,
    radius: f64,
}

fn parse_zone(definition: &str) -> Result<ZoneDefinition> {
    let mut args = definition.split(',');
    let name = args.next().filter(|name| !name.is_empty());
    let name = name.context("empty zone name")?.to_string();

    fn f64_arg(arg: Option<&str>) -> Result<f64> {
        let arg = arg.context("not enough arguments")?;
        let f = arg
            .parse::<f64>()
            .with_context(|| format!("arg {:?} is not a valid float", arg))?;
        if !f.is_finite() {
            anyhow::bail!("arg {:?} is not finite", arg);
        }
        Ok(f)
    }

    let latitude = f64_arg(args.next())?;
    let longitude = f64_arg(args.next())?;
    let center = Coordinate::new(latitude, longitude)?;
    let radius = f64_arg(args.next())?;
    if radius <= 0.0 {
        anyhow::bail!("expected radius to be strictly positive");
    }
    if args.next().is_some() {
        anyhow::bail!("too many arguments");
    }

    Ok(ZoneDefinition {
        name,
        center,
        radius,
    })
}

fn gen_zone<R>(
    rng: &mut R,
    zone: &ZoneDefinition,
    order_count: usize,
    cluster_count: usize,
) -> Result<Vec<Order>>
where
    R: Rng,
{
    let centers: Vec<Coordinate> = (0..cluster_count)
        .map(|_| {
            Coordinate::new_unchecked(
                zone.center.latitude + rng.gen_range(-zone.radius..=zone.radius),
                zone.center.longitude + rng.gen_range(-zone.radius..=zone.radius),
            )
        })
        .collect();
    let spread = zone.radius / (2.0 * cluster_count as f64);
    let noise = Normal::new(0.0, spread).context("invalid cluster spread")?;

    let orders = (0..order_count)
        .map(|i| {
            let cluster_id = rng.gen_range(0..cluster_count);
            let center = centers[cluster_id];
            let coordinate = Coordinate::new_unchecked(
                f64::clamp(center.latitude + noise.sample(rng), -90.0, 90.0),
                f64::clamp(center.longitude + noise.sample(rng), -180.0, 180.0),
            );
            Order::new(zone.name.clone(), coordinate)
                .with_cluster(cluster_id as i64)
                .with_area_name(format!("Area {i}, {}", zone.name))
        })
        .collect();
    Ok(orders)
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optmulti(
        "z",
        "zone",
        "zone definition, as NAME,LATITUDE,LONGITUDE,RADIUS (degrees)",
        "DEFINITION",
    );
    options.optopt("c", "count", "number of orders per zone (default: 2000)", "COUNT");
    options.optopt("k", "clusters", "number of clusters per zone (default: 8)", "COUNT");
    options.optopt("s", "seed", "random seed (default: 42)", "SEED");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }
    if !matches.free.is_empty() {
        anyhow::bail!("too many arguments\n\n{}", options.usage(USAGE));
    }

    let mut definitions = matches.opt_strs("z");
    if definitions.is_empty() {
        definitions = DEFAULT_ZONES.iter().map(|s| s.to_string()).collect();
    }
    let zones: Vec<_> = definitions
        .iter()
        .map(|definition| {
            parse_zone(definition).with_context(|| format!("invalid zone {definition:?}"))
        })
        .collect::<Result<_>>()?;

    let order_count = matches.opt_get_default("c", 2000).context("invalid option 'count'")?;
    let cluster_count: usize = matches.opt_get_default("k", 8).context("invalid option 'clusters'")?;
    anyhow::ensure!(cluster_count > 0, "expected at least one cluster per zone");
    let seed = matches
        .opt_get_default("s", zonal::Sampling::DEFAULT_SEED)
        .context("invalid option 'seed'")?;

    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let mut orders = Vec::with_capacity(zones.len() * order_count);
    for zone in &zones {
        orders.extend(gen_zone(&mut rng, zone, order_count, cluster_count)?);
    }

    eprintln!("Writing {} orders to standard output...", orders.len());

    let output = io::stdout();
    let output = output.lock();
    let output = io::BufWriter::new(output);
    dataset_io::write(output, &orders).context("failed to write dataset")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone() {
        let zone = parse_zone("Beirut,33.89,35.50,0.05").unwrap();
        assert_eq!(zone.name, "Beirut");
        assert_eq!(zone.center, Coordinate::new_unchecked(33.89, 35.50));
        assert_eq!(zone.radius, 0.05);

        assert!(parse_zone(",33.89,35.50,0.05").is_err());
        assert!(parse_zone("Beirut,33.89,35.50").is_err());
        assert!(parse_zone("Beirut,95,35.50,0.05").is_err());
        assert!(parse_zone("Beirut,33.89,35.50,-1").is_err());
        assert!(parse_zone("Beirut,33.89,35.50,0.05,1").is_err());
    }

    #[test]
    fn test_gen_zone() {
        let zone = parse_zone(DEFAULT_ZONES[0]).unwrap();
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        let orders = gen_zone(&mut rng, &zone, 500, 4).unwrap();

        assert_eq!(orders.len(), 500);
        assert!(orders.iter().all(|order| order.coordinate.is_valid()));
        assert!(orders
            .iter()
            .all(|order| matches!(order.cluster_id, Some(0..=3))));
        assert!(zonal::OrderDataset::new(orders).is_ok());
    }
}
