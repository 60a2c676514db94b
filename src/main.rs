//! dns-resolver
//!
//! Command line front end: resolves one name and prints one address per
//! line. Exits with status 1 and `;; Not found` when nothing resolves.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use dns_resolver::{RecordType, Resolver, ResolverConfig};

/// Iterative DNS resolver - walks the delegation tree from the root servers
#[derive(Parser, Debug)]
#[command(name = "dns-resolver")]
#[command(version)]
#[command(about = "Resolve A/AAAA records iteratively from the root servers", long_about = None)]
struct Args {
    /// Domain name to resolve
    domain: String,

    /// Record type (A or AAAA)
    #[arg(default_value = "A")]
    record_type: String,

    /// Trace every step of the walk on stderr
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "dns-resolver.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// UDP receive timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of servers queried
    #[arg(long)]
    max_iterations: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for answers
    let default_filter = if args.debug { "debug".to_string() } else { args.log_level.clone() };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let rtype: RecordType = match args.record_type.parse() {
        Ok(rtype) => rtype,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = load_config(&args)?;
    config.validate()?;

    info!("Resolving {} {} from {} root hints", args.domain, rtype, config.root_hints.len());

    let resolver = Resolver::new(config);
    let answers = resolver.resolve(&args.domain, rtype).await;

    if answers.is_empty() {
        if !args.debug {
            println!(";; Not found");
        }
        std::process::exit(1);
    }

    for addr in answers {
        println!("{}", addr);
    }

    Ok(())
}

/// Configuration file (if any) with CLI overrides applied
fn load_config(args: &Args) -> anyhow::Result<ResolverConfig> {
    let mut config = if args.config.exists() {
        ResolverConfig::load(&args.config)?
    } else {
        if args.config != PathBuf::from("dns-resolver.toml") {
            warn!("Config file {:?} not found, using defaults", args.config);
        }
        ResolverConfig::default()
    };

    if let Some(secs) = args.timeout {
        config = config.with_udp_timeout(secs);
    }
    if let Some(max) = args.max_iterations {
        config = config.with_max_iterations(max);
    }

    let trace = config.trace || args.debug;
    Ok(config.with_trace(trace))
}
