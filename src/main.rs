use anyhow::Context;
use clap::Parser;
use relata_api::{AppState, RestApi};
use relata_core::{Error, ExtensionConfig, Options, RecordId};
use relata_similarity::{RelatedContent, RelatedResponse};
use relata_storage::ContentStore;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Related-content lookups over a CMS dataset
#[derive(Parser, Debug)]
#[command(name = "relata")]
#[command(about = "Find related content for CMS records", long_about = None)]
struct Args {
    /// Dataset file (schema plus records) in JSON
    #[arg(short, long)]
    dataset: PathBuf,

    /// Extension configuration file in JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print related content for one record (`contenttype/id`) and exit
    #[arg(short, long)]
    record: Option<String>,

    /// Override the configured limit for `--record`
    #[arg(long)]
    limit: Option<u64>,

    /// Include origin and weight breakdown in `--record` output
    #[arg(long)]
    explain: bool,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Lookup<'a, T: Serialize> {
    record: &'a RecordId,
    #[serde(flatten)]
    body: T,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `--record` output stays clean JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Relata v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", args.dataset);

    let store = ContentStore::from_path(&args.dataset)
        .with_context(|| format!("loading dataset {:?}", args.dataset))?;
    info!("Loaded {} records", store.count());

    let config = match &args.config {
        Some(path) => ExtensionConfig::from_path(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => ExtensionConfig::new(),
    };

    if let Some(key) = &args.record {
        return print_related(&store, &config, key, args.limit, args.explain);
    }

    let state = AppState::new(Arc::new(store), Arc::new(config));
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("Relata started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn print_related(
    store: &ContentStore,
    config: &ExtensionConfig,
    key: &str,
    limit: Option<u64>,
    explain: bool,
) -> anyhow::Result<()> {
    let id: RecordId = key.parse()?;
    let record = store
        .get(&id)
        .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

    let mut options = Options::new();
    if let Some(limit) = limit {
        options.insert("limit".to_string(), limit.into());
    }

    let entries = RelatedContent::new(store, config, store.schema()).related_explained(&record, &options);

    let output = if explain {
        serde_json::to_string_pretty(&Lookup { record: &id, body: RelatedResponse::new(entries) })?
    } else {
        let result: Vec<_> = entries.into_iter().map(|e| e.record).collect();
        serde_json::to_string_pretty(&Lookup {
            record: &id,
            body: serde_json::json!({ "result": result }),
        })?
    };
    println!("{}", output);
    Ok(())
}
