use clap::Parser;
use daorag_core::config;
use daorag_core::embedding::HashingEncoder;
use daorag_core::rank::Ranker;
use daorag_core::store::DocumentStore;
use daorag_server::api::create_router;
use daorag_server::api::handlers::AppState;
use daorag_server::api::metrics;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daorag", about = "DAO-scoped document retrieval service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "DAORAG_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "DAORAG_HOST", default_value = config::DEFAULT_HOST)]
    host: String,

    /// Data directory for the snapshot
    #[arg(short, long, env = "DAORAG_DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    data_dir: String,

    /// Run without an encoder: add_doc and embed return 503, search ranks lexically
    #[arg(long, default_value_t = false)]
    no_embeddings: bool,

    /// Fingerprint dimension for the hashing encoder
    #[arg(long, env = "DAORAG_EMBEDDING_DIM", default_value_t = config::DEFAULT_DIMENSION)]
    embedding_dim: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(
                    "daorag_server=info"
                        .parse()
                        .expect("valid directive literal"),
                )
                .add_directive(
                    "daorag_core=info"
                        .parse()
                        .expect("valid directive literal"),
                ),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.embedding_dim == 0 || args.embedding_dim > config::MAX_DIMENSION {
        eprintln!(
            "Error: embedding-dim must be 1-{}",
            config::MAX_DIMENSION
        );
        std::process::exit(1);
    }
    let data_path = std::path::Path::new(&args.data_dir);
    if data_path.exists() && !data_path.is_dir() {
        eprintln!(
            "Error: data_dir '{}' exists but is not a directory",
            args.data_dir
        );
        std::process::exit(1);
    }

    // A malformed snapshot is a startup fault: refuse to serve rather than
    // shadow the data on disk with an empty store.
    let snapshot_path = PathBuf::from(&args.data_dir).join(config::SNAPSHOT_FILE);
    let store = DocumentStore::open(&snapshot_path)?;

    // The ranking mode is fixed for the lifetime of the process.
    let ranker = if args.no_embeddings {
        tracing::info!("Embeddings disabled, serving lexical ranking only");
        Arc::new(Ranker::lexical())
    } else {
        Arc::new(Ranker::semantic(Arc::new(HashingEncoder::new(
            args.embedding_dim,
        ))))
    };

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        store: store.clone(),
        ranker: ranker.clone(),
        prometheus_handle,
        start_time: Instant::now(),
    };

    // Seed gauges from whatever the snapshot restored.
    metrics::update_store_metrics(&store);

    let app = create_router(state);
    let addr = format!("{}:{}", args.host, args.port);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        data_dir = %args.data_dir,
        mode = ranker.mode_name(),
        model = %ranker.model_id(),
        documents = store.len(),
        "daorag ready"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    // Every upsert already persisted its snapshot synchronously, so there is
    // nothing to flush here.
    tracing::info!("All requests drained, shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn env_feeds_settings_and_flags_take_precedence() {
        std::env::set_var("DAORAG_PORT", "9100");
        let from_env = Args::try_parse_from(["daorag"]).unwrap();
        assert_eq!(from_env.port, 9100);

        let from_flag = Args::try_parse_from(["daorag", "--port", "9200"]).unwrap();
        assert_eq!(from_flag.port, 9200);
        std::env::remove_var("DAORAG_PORT");
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
