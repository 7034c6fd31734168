use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::Ctx;

#[derive(Parser)]
#[command(name = "vb")]
#[command(about = "Vinboard cellar CLI", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> local ...)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON export (single item, array, or {schema_version, bottles})
    Import {
        #[arg(long)]
        file: String,

        /// merge | sync | auto (auto: envelopes sync, everything else merges)
        #[arg(long)]
        mode: Option<String>,
    },

    /// List bottle lines, newest first
    List {
        /// Case-insensitive search over producer, wine, region, key ...
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long = "type")]
        wine_type: Option<String>,
        #[arg(long)]
        sweetness: Option<String>,
        #[arg(long)]
        confidence: Option<String>,
        #[arg(long = "window-source")]
        window_source: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Fine status (e.g. ready_after_peak) or open_now
        #[arg(long)]
        status: Option<String>,
    },

    /// Add a bottle line by hand
    Add {
        #[arg(long)]
        key: String,

        /// Bottles on hand (default 1)
        #[arg(long)]
        qty: Option<i64>,

        /// Field value in import-item shape, e.g. --set color=Rouge (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Change fields on a bottle line; unset fields keep their value
    Edit {
        #[arg(long)]
        id: String,

        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Add or remove bottles from a line (e.g. --delta -1)
    Adjust {
        #[arg(long)]
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        delta: i64,
    },

    /// Print one bottle line with its drinking status
    Show {
        #[arg(long)]
        id: String,
    },

    /// Status counters over lines with bottles on hand
    Dashboard,

    /// Open bottles from a line and log the event
    Open {
        #[arg(long)]
        id: String,

        #[arg(long, default_value_t = 1)]
        qty: i64,

        /// 0..=100
        #[arg(long)]
        rating: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Opened-bottle history, most recent first
    History,

    /// Add a rating or tasting notes to an opened record
    Rate {
        /// Opened record id
        #[arg(long)]
        id: String,

        #[arg(long)]
        rating: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a bottle line and its opened history
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Distinct filter values present in the cellar
    Filters,

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    if let Commands::ConfigHash { paths } = &cli.cmd {
        let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        let loaded = vb_config::load_layered_yaml(&path_refs)?;
        println!("config_hash={}", loaded.config_hash);
        println!("{}", loaded.canonical_json);
        return Ok(());
    }

    let ctx = Ctx::load(&cli.config_paths)?;

    match cli.cmd {
        Commands::Import { file, mode } => commands::import::run(&ctx, &file, mode.as_deref()).await,
        Commands::List {
            q,
            color,
            wine_type,
            sweetness,
            confidence,
            window_source,
            location,
            status,
        } => {
            let filter = vb_store::BottleFilter {
                q,
                color,
                wine_type,
                sweetness,
                confidence,
                window_source,
                location,
                status,
            };
            commands::cellar::list(&ctx, filter).await
        }
        Commands::Add { key, qty, set } => commands::cellar::add(&ctx, &key, qty, &set).await,
        Commands::Edit { id, set } => commands::cellar::edit(&ctx, &id, &set).await,
        Commands::Adjust { id, delta } => commands::cellar::adjust(&ctx, &id, delta).await,
        Commands::Show { id } => commands::cellar::show(&ctx, &id).await,
        Commands::Dashboard => commands::cellar::dashboard(&ctx).await,
        Commands::Open {
            id,
            qty,
            rating,
            notes,
        } => commands::cellar::open(&ctx, &id, qty, rating, notes).await,
        Commands::History => commands::cellar::history(&ctx).await,
        Commands::Rate { id, rating, notes } => {
            commands::cellar::rate(&ctx, &id, rating, notes).await
        }
        Commands::Delete { id } => commands::cellar::delete(&ctx, &id).await,
        Commands::Filters => commands::cellar::filters(&ctx).await,
        Commands::ConfigHash { .. } => Ok(()),
    }
}

/// Logs go to stderr; stdout carries key=value results only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
