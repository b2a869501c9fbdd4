use anyhow::{Context, Result};
use bullseye_simulator::{Config, Report, Simulator};
use clap::Parser;
use commonware_runtime::{deterministic, Runner as _};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "bullseye-simulator", about = "Run a seeded betting workload against the engine.")]
struct Args {
    /// YAML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of blocks to run.
    #[arg(long)]
    blocks: Option<u64>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs and print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn init_tracing(level: Level, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path.display()))?;
            serde_yaml::from_str(&contents).context("Could not parse config file")?
        }
        None => Config::default(),
    };
    if let Some(blocks) = args.blocks {
        config.blocks = blocks;
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }
    Ok(config)
}

fn print_report(report: &Report) {
    println!("blocks:            {}", report.blocks);
    println!(
        "bets:              {} committed, {} revealed, {} refunded",
        report.bets_committed, report.bets_revealed, report.bets_refunded
    );
    println!(
        "quick bets:        {} resolved, {} refunded",
        report.quick_bets, report.quick_bets_refunded
    );
    println!(
        "tiers:             {} bullseye, {} ring, {} miss",
        report.tiers.bullseye, report.tiers.ring, report.tiers.miss
    );
    println!("rejections:        {}", report.rejections);
    println!("wagered:           {}", report.total_wagered);
    println!("paid out:          {}", report.total_paid_out);
    println!("house edge:        {:.2}%", report.house_edge * 100.0);
    println!("max reserved:      {}", report.max_reserved);
    println!(
        "house:             total={} available={} reserved={}",
        report.house.total, report.house.available, report.house.reserved
    );
}

fn main() {
    if let Err(err) = main_result() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn main_result() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?
        .validate()
        .context("Invalid config")?;
    init_tracing(config.log_level, args.json);
    info!(
        players = config.players.get(),
        blocks = config.blocks.get(),
        seed = config.seed,
        "starting simulation"
    );

    let executor = deterministic::Runner::default();
    let report = executor.start(|_| async move { Simulator::new(config).run().await })?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}
