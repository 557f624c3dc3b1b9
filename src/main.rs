use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use switchdns::config::{DEFAULT_BIND_ADDR, DEFAULT_TTL};
use switchdns::error::Error::DNSError;
use switchdns::rebind_store::ExpiryPolicy;
use switchdns::{Config, DynRebindStore, InMemoryRebindStore, SharedConfig};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Authoritative DNS server answering from patterns in the queried name
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Load settings from a JSON file instead of flags
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["domain", "ip", "ttl", "addr", "txt", "keep_expired"]
    )]
    config: Option<PathBuf>,

    /// Domain to answer for, e.g. rebind.example.com
    #[arg(long, required_unless_present = "config")]
    domain: Option<String>,

    /// IP to resolve to
    #[arg(long, required_unless_present = "config")]
    ip: Option<String>,

    /// Default TTL
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// Interface and port to bind to
    #[arg(long, value_name = "IP:PORT", default_value = DEFAULT_BIND_ADDR)]
    addr: SocketAddr,

    /// String to include in TXT records
    #[arg(long)]
    txt: Option<String>,

    /// Keep resolving rebind keys after they expire
    #[arg(long)]
    keep_expired: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(Cli::parse())?;
    let rebind_store: DynRebindStore = Arc::new(InMemoryRebindStore::new(config.expiry));

    tracing::info!("DNS listening on UDP {}", &config.bind_addr);
    let dns_server = switchdns::dns::new(config.clone(), rebind_store).await?;
    let dns_handle = tokio::spawn(dns_server.block_until_done());
    tracing::info!(domain = %config.domain, ip = %config.address, "started");

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(dns_res) = dns_handle => {
            if let Err(err) = dns_res {
                return Err(DNSError(err).into())
            }
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchdns=info".into()),
        )
        .init();
}

fn config_init(cli: Cli) -> Result<SharedConfig> {
    let config = match cli.config {
        Some(config_file) => {
            let config = Config::try_from_file(&config_file)?;
            tracing::debug!("loaded config from {}", config_file.display());
            config
        }
        None => Config::new(
            cli.domain.as_deref().unwrap_or_default(),
            cli.ip.as_deref().unwrap_or_default(),
            cli.ttl,
            cli.addr,
            cli.txt,
            if cli.keep_expired {
                ExpiryPolicy::Ignore
            } else {
                ExpiryPolicy::Enforce
            },
        )?,
    };
    Ok(Arc::new(config))
}
