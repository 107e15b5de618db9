//! ChaosMeter CLI
//!
//! One aggregation pass per invocation: poll the feeds, compute the
//! chaos index, write the dashboard snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chaos_core::{FactorKey, SourceState};
use chaos_feeds::{build_client, public_endpoints, FeedConfig};
use chaos_runtime::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "chaosmeter")]
#[command(author, version, about = "ChaosMeter: real-data chaos index aggregator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one aggregation pass and write the snapshot
    Run {
        /// Output file for the snapshot
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,

        /// Per-request timeout in seconds
        #[arg(short, long, default_value = "15")]
        timeout: u64,

        /// AbuseIPDB API key (or set ABUSEIPDB_KEY env var)
        #[arg(long, env = "ABUSEIPDB_KEY")]
        abuseipdb_key: Option<String>,

        /// AlienVault OTX API key (or set OTX_KEY env var)
        #[arg(long, env = "OTX_KEY")]
        otx_key: Option<String>,

        /// Seed the attack-map synthesizer for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the upstream feed endpoints
    Sources,

    /// Probe the public endpoints and report reachability
    Check {
        /// Per-request timeout in seconds
        #[arg(short, long, default_value = "15")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Run {
            output,
            timeout,
            abuseipdb_key,
            otx_key,
            seed,
        } => {
            run_once(output, timeout, abuseipdb_key, otx_key, seed).await?;
        }
        Commands::Sources => {
            list_sources();
        }
        Commands::Check { timeout } => {
            check_endpoints(timeout).await?;
        }
    }

    Ok(())
}

async fn run_once(
    output: PathBuf,
    timeout: u64,
    abuseipdb_key: Option<String>,
    otx_key: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    println!("🌍 ChaosMeter - real-data chaos aggregation\n");

    let keyed = [
        abuseipdb_key.is_some().then_some("AbuseIPDB"),
        otx_key.is_some().then_some("OTX"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");
    let keyed_str = if keyed.is_empty() {
        "none".to_string()
    } else {
        keyed
    };

    println!("⏱️  Timeout: {}s per request", timeout);
    println!("🔑 Keyed feeds: {}", keyed_str);
    println!("📄 Output: {}\n", output.display());

    let config = PipelineConfig {
        feeds: FeedConfig {
            timeout_secs: timeout,
            abuseipdb_key,
            otx_key,
        },
        output: output.clone(),
        seed,
    };

    let mut pipeline = Pipeline::new(config)?;
    let snapshot = pipeline.run().await?;

    println!("\n✅ Snapshot saved to: {}", output.display());
    println!("📊 Chaos Index: {}", snapshot.chaos_index);

    println!("\n📈 Stats:");
    let solar_kp = snapshot
        .chaos_factors
        .get(&FactorKey::Solar)
        .map_or(0.0, |f| f.value);
    println!("   - Solar Kp Index: {}", solar_kp);
    println!("   - Critical CVEs: {}", snapshot.stats.critical_cves);
    println!(
        "   - Active Malware URLs: {}",
        snapshot.stats.active_malware_urls
    );
    println!("   - Botnet IPs: {}", snapshot.stats.botnet_ips);
    println!(
        "   - Ransomware Victims: {}",
        snapshot.stats.ransomware_victims
    );
    println!("   - News Headlines: {}", snapshot.headlines.len());
    println!("   - Attack Flows: {}", snapshot.attacks.len());

    let degraded: Vec<&str> = snapshot
        .sources
        .iter()
        .filter(|s| s.status == SourceState::Fallback)
        .map(|s| s.name.as_str())
        .collect();
    if !degraded.is_empty() {
        println!("\n⚠️  Degraded to defaults: {}", degraded.join(", "));
    }

    Ok(())
}

fn list_sources() {
    println!("📡 Upstream feed endpoints:\n");
    for endpoint in chaos_feeds::FEED_ENDPOINTS {
        let key_marker = if endpoint.needs_key { " (API key)" } else { "" };
        println!(
            "   {:16} {:15} {}{}",
            endpoint.name,
            endpoint.kind.as_str(),
            endpoint.url,
            key_marker
        );
    }
}

async fn check_endpoints(timeout: u64) -> Result<()> {
    println!("🔌 Probing public endpoints...\n");

    let config = FeedConfig {
        timeout_secs: timeout,
        abuseipdb_key: None,
        otx_key: None,
    };
    let client = build_client(&config)?;

    let mut unreachable = 0usize;
    for endpoint in public_endpoints() {
        match client.get(endpoint.url).send().await {
            Ok(response) if response.status().is_success() => {
                println!("✅ {}", endpoint.name);
            }
            Ok(response) => {
                println!("⚠️  {} returned {}", endpoint.name, response.status());
            }
            Err(e) => {
                unreachable += 1;
                println!("❌ {} unreachable: {}", endpoint.name, e);
            }
        }
    }

    if unreachable > 0 {
        println!(
            "\n⚠️  {} endpoint(s) unreachable - affected factors will fall back to defaults",
            unreachable
        );
    } else {
        println!("\n✅ All public endpoints reachable");
    }

    Ok(())
}
