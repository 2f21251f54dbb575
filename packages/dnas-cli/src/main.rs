//! DNA Spaces CLI - query the Cisco DNA Spaces location API from a terminal
//!
//! This binary wraps the dnas-core client:
//! - Access point status and counts
//! - Active client listings, counts and floors
//! - Client location history
//! - Map hierarchy

mod filters;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dnas_core::access_points::AccessPointStatus;
use dnas_core::{Client, config, load_client_config};
use filters::{ClientFilters, TimeRange};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "dnas")]
#[command(version)]
#[command(about = "Query the Cisco DNA Spaces location API")]
#[command(long_about = "
dnas is a command line client for the Cisco DNA Spaces location API.

It needs an API key and a region:
  DNAS_API_KEY  - API key generated in DNA Spaces
  DNAS_REGION   - \"io\" in the USA, \"eu\" elsewhere

Both can also be set in the config file, see: dnas config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Access point status
    #[command(subcommand)]
    AccessPoints(AccessPointCommands),

    /// Currently active clients
    #[command(subcommand)]
    Clients(ClientCommands),

    /// Client location history
    #[command(subcommand)]
    History(HistoryCommands),

    /// Campus, building and floor hierarchy
    #[command(subcommand)]
    Map(MapCommands),

    /// Show configuration paths and settings
    Config,
}

#[derive(Subcommand)]
pub enum AccessPointCommands {
    /// List missing access points
    Missing,

    /// Count access points by status
    Count {
        #[arg(short, long, value_enum, default_value = "missing")]
        status: StatusArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    All,
    Active,
    Inactive,
    Missing,
}

impl From<StatusArg> for AccessPointStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::All => AccessPointStatus::All,
            StatusArg::Active => AccessPointStatus::Active,
            StatusArg::Inactive => AccessPointStatus::Inactive,
            StatusArg::Missing => AccessPointStatus::Missing,
        }
    }
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List active clients
    List(ClientFilters),

    /// Count active clients
    Count(ClientFilters),

    /// Floors with associated clients
    Floors,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Export history records
    List(TimeRange),

    /// Count history records
    Count(TimeRange),

    /// MAC addresses seen in the range
    Clients(TimeRange),

    /// Location history of one device
    Client {
        /// Device identifier, usually its MAC address
        device_id: String,

        #[command(flatten)]
        range: TimeRange,
    },
}

#[derive(Subcommand)]
pub enum MapCommands {
    /// Print the full map hierarchy
    Hierarchy,

    /// Show one map element
    Element {
        /// Map element identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dnas={},dnas_core={}", log_level, log_level).into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Config = cli.command {
        return cmd_config(&cli);
    }

    let client_config = load_client_config();
    tracing::debug!(
        "Using region {} (API key from {})",
        client_config.region,
        client_config.source
    );
    let client = client_config.build_client()?;

    match &cli.command {
        Commands::AccessPoints(cmd) => cmd_access_points(&cli, &client, cmd).await,
        Commands::Clients(cmd) => cmd_clients(&cli, &client, cmd).await,
        Commands::History(cmd) => cmd_history(&cli, &client, cmd).await,
        Commands::Map(cmd) => cmd_map(&cli, &client, cmd).await,
        Commands::Config => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_access_points(cli: &Cli, client: &Client, cmd: &AccessPointCommands) -> Result<()> {
    match cmd {
        AccessPointCommands::Missing => {
            let aps = client.access_points().list_missing().await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{} missing access points", aps.len());
                    for ap in &aps {
                        println!(
                            "  {:17}  count {:>8}  1m {:>6.2}  5m {:>6.2}  15m {:>6.2}",
                            ap.ap_mac, ap.count, ap.m1_rate, ap.m5_rate, ap.m15_rate
                        );
                    }
                }
                OutputFormat::Json => print_json(&aps)?,
            }
        }
        AccessPointCommands::Count { status } => {
            let status = AccessPointStatus::from(*status);
            let count = client.access_points().count(status).await?;
            match cli.format {
                OutputFormat::Text => println!("Access points ({}): {}", status, count.count),
                OutputFormat::Json => print_json(&serde_json::json!({
                    "status": status,
                    "count": count.count,
                }))?,
            }
        }
    }
    Ok(())
}

async fn cmd_clients(cli: &Cli, client: &Client, cmd: &ClientCommands) -> Result<()> {
    match cmd {
        ClientCommands::List(filters) => {
            let clients = client.active_clients().list(&filters.to_parameters()).await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{} clients", clients.results.len());
                    for device in &clients.results {
                        let ip = device.ip_address.first().map(String::as_str).unwrap_or("-");
                        println!("  {:17}  {:15}  {}", device.mac_address, ip, device.hierarchy);
                    }
                }
                OutputFormat::Json => print_json(&clients)?,
            }
        }
        ClientCommands::Count(filters) => {
            let count = client.active_clients().count(&filters.to_parameters()).await?;
            match cli.format {
                OutputFormat::Text => println!("Active clients: {}", count.results.total),
                OutputFormat::Json => print_json(&count)?,
            }
        }
        ClientCommands::Floors => {
            let floors = client.active_clients().floors().await?;
            match cli.format {
                OutputFormat::Text => {
                    for floor in &floors.results {
                        println!("  {:40}  {:>6}", floor.floor_id, floor.count);
                    }
                }
                OutputFormat::Json => print_json(&floors)?,
            }
        }
    }
    Ok(())
}

async fn cmd_history(cli: &Cli, client: &Client, cmd: &HistoryCommands) -> Result<()> {
    let history = client.history();
    match cmd {
        HistoryCommands::List(range) => {
            let records = history.list(&range.to_history_parameters()?).await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("Found {} records", records.results.len());
                    for record in &records.results {
                        println!(
                            "  {:>13}  {:17}  {}  ({}, {})",
                            record.source_timestamp,
                            record.mac_address,
                            record.floor_hierarchy,
                            record.coordinate_x,
                            record.coordinate_y
                        );
                    }
                }
                OutputFormat::Json => print_json(&records)?,
            }
        }
        HistoryCommands::Count(range) => {
            let count = history.count(&range.to_count_parameters()?).await?;
            match cli.format {
                OutputFormat::Text => println!("History records: {}", count.count),
                OutputFormat::Json => print_json(&count)?,
            }
        }
        HistoryCommands::Clients(range) => {
            let clients = history.clients(&range.to_clients_parameters()?).await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{} clients", clients.len());
                    for c in &clients {
                        println!("  {}", c.mac_address);
                    }
                }
                OutputFormat::Json => print_json(&clients)?,
            }
        }
        HistoryCommands::Client { device_id, range } => {
            let locations = history
                .client(device_id, &range.to_clients_parameters()?)
                .await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{} locations for {}", locations.len(), device_id);
                    for location in &locations {
                        let coordinates: Vec<String> =
                            location.coordinates.iter().map(|c| format!("{:.2}", c)).collect();
                        println!(
                            "  {:>13}  {}  ({})  {}",
                            location.source_timestamp,
                            location.floor_id,
                            coordinates.join(", "),
                            if location.associated { "associated" } else { "probing" }
                        );
                    }
                }
                OutputFormat::Json => print_json(&locations)?,
            }
        }
    }
    Ok(())
}

async fn cmd_map(cli: &Cli, client: &Client, cmd: &MapCommands) -> Result<()> {
    match cmd {
        MapCommands::Hierarchy => {
            let hierarchy = client.map().hierarchy().await?;
            match cli.format {
                OutputFormat::Text => {
                    for campus in &hierarchy.map {
                        for item in campus.walk() {
                            let depth = item.relationship_data.ancestor_ids.len();
                            let indent = "  ".repeat(depth);
                            println!("{}{} [{}] {}", indent, item.name, item.level, item.id);
                        }
                    }
                }
                OutputFormat::Json => print_json(&hierarchy)?,
            }
        }
        MapCommands::Element { id } => {
            let element = client.map().element(id).await?;
            match cli.format {
                OutputFormat::Text => {
                    let item = &element.map;
                    println!("Name:    {}", item.name);
                    println!("Level:   {}", item.level);
                    println!("ID:      {}", item.id);
                    if !item.address.is_empty() {
                        println!("Address: {}", item.address);
                    }
                    println!("Children: {}", item.relationship_data.children.len());
                }
                OutputFormat::Json => print_json(&element)?,
            }
        }
    }
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let client_config = load_client_config();
    let config_path = config::get_config_file_path_string();
    let key_status = if client_config.api_key.is_some() { "set" } else { "not set" };

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file: {}", config_path);
            println!("API key:     {} (from {})", key_status, client_config.source);
            println!("Region:      {}", client_config.region);
            println!("Timeout:     {}s", client_config.timeout.as_secs());
            println!();
            println!("Environment variables:");
            println!("  DNAS_API_KEY      - API key");
            println!("  DNAS_REGION       - io or eu");
            println!("  DNAS_TIMEOUT_SECS - request timeout");
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", config::generate_example_config());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "config_file": config_path,
            "api_key": key_status,
            "api_key_source": client_config.source.to_string(),
            "region": client_config.region,
            "timeout_secs": client_config.timeout.as_secs(),
        }))?,
    }

    Ok(())
}
