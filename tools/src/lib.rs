use anyhow::Context as _;
use anyhow::Result;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;
use zonal::OrderDataset;
use zonal::Sampling;

/// Zone selected when none is given on the command line, if the dataset has
/// it.
pub const DEFAULT_ZONE: &str = "Beirut";

/// Register the options shared by every tool.
pub fn common_options(options: &mut getopts::Options) {
    options.optflag("h", "help", "print this help menu");
    options.optopt("d", "dataset", "dataset file (CSV)", "FILE");
    options.optopt(
        "n",
        "max-orders",
        "maximum number of orders per zone, or \"all\" (default: 1000)",
        "COUNT",
    );
    options.optopt("s", "seed", "sampling seed (default: 42)", "SEED");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
}

/// Install the tracing subscriber, filtered by the `LOG` environment variable.
///
/// The returned guard, if any, must be kept alive until the end of the
/// program so that the chrome trace is flushed.
pub fn init_tracing(trace_file: Option<String>) -> Option<tracing_chrome::FlushGuard> {
    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_thread_ids(true)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    match trace_file {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

pub fn load_dataset(matches: &getopts::Matches) -> Result<OrderDataset> {
    let dataset_file = matches
        .opt_str("d")
        .context("missing required option 'dataset'")?;
    dataset_io::from_file(&dataset_file)
        .with_context(|| format!("failed to read dataset {dataset_file:?}"))
}

/// Parse a maximum working-set size. `all` means no sampling.
pub fn parse_max_size(s: &str) -> Result<Option<usize>> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    let max_size: usize = s
        .parse()
        .with_context(|| format!("expected a positive integer or \"all\", got {s:?}"))?;
    anyhow::ensure!(max_size > 0, "maximum number of orders must be positive");
    Ok(Some(max_size))
}

pub fn parse_sampling(matches: &getopts::Matches) -> Result<Sampling> {
    let mut sampling = Sampling::default();
    if let Some(max_size) = matches.opt_str("n") {
        sampling.max_size = parse_max_size(&max_size).context("invalid option 'max-orders'")?;
    }
    if let Some(seed) = matches.opt_get("s").context("invalid option 'seed'")? {
        sampling.seed = seed;
    }
    Ok(sampling)
}

/// The zone given with `-z`, or [`DEFAULT_ZONE`], or the first zone of the
/// dataset.
pub fn select_zone(matches: &getopts::Matches, zones: &[&str]) -> Option<String> {
    matches.opt_str("z").or_else(|| {
        zones
            .iter()
            .find(|zone| **zone == DEFAULT_ZONE)
            .or_else(|| zones.first())
            .map(|zone| zone.to_string())
    })
}

/// Turn an engine error into a message the user can act upon.
pub fn explain(err: zonal::Error) -> anyhow::Error {
    let hint = match &err {
        zonal::Error::UnknownZone { .. } => "select one of the zones listed by `zone-info`",
        zonal::Error::NoClustersAvailable => {
            "cannot assign, no reference clusters; pick another zone or raise --max-orders"
        }
        zonal::Error::InvalidCoordinate { .. } => "fix the coordinate, the order was not assigned",
        _ => "check the dataset",
    };
    anyhow::Error::new(err).context(hint)
}
