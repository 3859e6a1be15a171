use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use green_scheduler::carbon_aware::{
    Job, JobRequest, RegionCatalog, Scheduler, SchedulingService, StaticCatalog, Urgency,
};
use green_scheduler::config::Config;
use green_scheduler::history::HistoryStore;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Run(RunArgs),
    /// Pick a region for a single job and print the outcome
    Schedule(ScheduleArgs),
    /// Show the region catalog ranked for an urgency level
    Regions(RegionsArgs),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Path to a TOML configuration file
    #[arg(long, env = "GREEN_SCHEDULER_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Address to listen on (overrides server.listen_addr)
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Job name
    #[arg(long)]
    name: String,

    /// Requested CPU cores (1-128)
    #[arg(long, allow_negative_numbers = true)]
    cpu: i64,

    /// Expected runtime in hours
    #[arg(long, allow_negative_numbers = true)]
    runtime: f64,

    /// Urgency: low, medium or high
    #[arg(long, default_value = "medium")]
    urgency: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RegionsArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Urgency the ranking is computed for
    #[arg(long, default_value = "medium")]
    urgency: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("Green Scheduler v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Run(run_args) => run_api(run_args).await,
        Commands::Schedule(schedule_args) => run_schedule(schedule_args).await,
        Commands::Regions(regions_args) => run_regions(regions_args),
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).context("failed to load configuration")
}

fn load_catalog(config: &Config) -> anyhow::Result<RegionCatalog> {
    match &config.catalog.path {
        Some(path) => RegionCatalog::load(path)
            .with_context(|| format!("failed to load region catalog {}", path.display())),
        None => Ok(RegionCatalog::builtin()),
    }
}

fn scheduler_from(config: &Config) -> Scheduler {
    Scheduler::new(config.scoring.clone(), config.impact.clone())
}

#[cfg(feature = "rest-api")]
async fn run_api(args: RunArgs) -> anyhow::Result<()> {
    init_tracing(args.common.log_format);
    info!("Starting Green Scheduler v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.common.config.as_deref())?;
    let catalog = load_catalog(&config)?;
    info!("Serving {} candidate regions", catalog.len());

    let history = match &config.history.path {
        Some(path) => HistoryStore::open(path.clone())
            .await
            .with_context(|| format!("failed to open history file {}", path.display()))?,
        None => HistoryStore::new(),
    };

    let service = Arc::new(SchedulingService::new(
        Arc::new(StaticCatalog::new(catalog)),
        scheduler_from(&config),
        history,
    ));

    let listen_addr = args
        .listen_addr
        .unwrap_or_else(|| config.server.listen_addr.clone());
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {:?}", listen_addr))?;

    green_scheduler::rest_api::run_server(service, addr).await?;
    info!("Green Scheduler stopped");
    Ok(())
}

#[cfg(not(feature = "rest-api"))]
async fn run_api(_args: RunArgs) -> anyhow::Result<()> {
    anyhow::bail!("this binary was built without the rest-api feature")
}

async fn run_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    init_tracing(args.common.log_format);

    let config = load_config(args.common.config.as_deref())?;
    let catalog = load_catalog(&config)?;
    let service = SchedulingService::new(
        Arc::new(StaticCatalog::new(catalog)),
        scheduler_from(&config),
        HistoryStore::new(),
    );

    let job = Job::try_from(JobRequest {
        name: args.name,
        cpu_usage: args.cpu,
        runtime: args.runtime,
        urgency: args.urgency,
    })?;
    let result = service.schedule_job(&job).await?;
    let trees = result.trees_equivalent(config.impact.trees_per_kg_saved);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Job:            {} ({} cores, {} h, {} urgency)",
        job.name, job.cpu_usage, job.runtime, job.urgency
    );
    println!(
        "Region:         {} - {} ({})",
        result.region.id, result.region.name, result.region.location
    );
    println!("Carbon:         {} gCO2/kWh", result.region.carbon_intensity);
    println!("Energy:         {:.2} kWh", result.estimated_energy);
    println!("CO2:            {:.2} kg", result.estimated_co2);
    println!("Cost:           ${:.2}", result.estimated_cost);
    println!("Carbon saved:   {:.2} kg CO2", result.carbon_saved);
    println!("Equivalent to:  {:.1} trees planted", trees);
    Ok(())
}

fn run_regions(args: RegionsArgs) -> anyhow::Result<()> {
    init_tracing(args.common.log_format);

    let config = load_config(args.common.config.as_deref())?;
    let catalog = load_catalog(&config)?;
    let urgency: Urgency = args.urgency.parse()?;
    let scheduler = scheduler_from(&config);

    println!(
        "{:<4} {:<22} {:>8} {:>6} {:>8} {:>8} {:>8}",
        "#", "REGION", "gCO2", "COST", "LATENCY", "UPTIME", "SCORE"
    );
    let ranking = scheduler.rank(urgency, catalog.regions())?;
    for (rank, score) in ranking.iter().enumerate() {
        if let Some(region) = catalog.get(&score.region_id) {
            println!(
                "{:<4} {:<22} {:>8} {:>6.2} {:>8} {:>8.2} {:>8.2}",
                rank + 1,
                region.id,
                region.carbon_intensity,
                region.cost,
                region.latency,
                region.availability,
                score.total
            );
        }
    }

    let overview = catalog.overview(config.scoring.carbon_ceiling);
    println!();
    println!(
        "Average intensity: {} gCO2/kWh, green score: {}",
        overview.average_intensity, overview.green_score
    );
    Ok(())
}
