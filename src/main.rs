use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lingdb::error::{LingdbError, Result};
use lingdb::interface::QueryInterface;
use lingdb::{load, server};

#[derive(serde::Deserialize)]
struct Settings {
    listen: String,
    dataset_dir: String,
    active_semester: Option<String>,
    quorum_share: f64,
}

fn settings() -> Result<Settings> {
    config::Config::builder()
        .set_default("listen", "127.0.0.1:8080")
        .and_then(|b| b.set_default("dataset_dir", "data"))
        .and_then(|b| b.set_default("quorum_share", 0.5))
        .map_err(|e| LingdbError::Config(e.to_string()))?
        .add_source(config::File::with_name("lingdb").required(false))
        .add_source(config::Environment::with_prefix("LINGDB"))
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| LingdbError::Config(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = settings()?;
    let interface = Arc::new(QueryInterface::with_quorum_share(settings.quorum_share));

    let entries = std::fs::read_dir(&settings.dataset_dir)
        .map_err(|e| LingdbError::Dataset(format!("cannot read {}: {e}", settings.dataset_dir)))?;
    for entry in entries {
        let path = entry
            .map_err(|e| LingdbError::Dataset(e.to_string()))?
            .path();
        if !path.extension().is_some_and(|extension| extension == "json") {
            continue;
        }
        match load::from_path(&path) {
            Ok(dataset) => {
                let (kept, replaced) = interface.keep_dataset(dataset);
                info!(
                    semester = kept.semester(),
                    languages = kept.len(),
                    replaced,
                    "dataset kept"
                );
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping dataset"),
        }
    }
    if let Some(semester) = &settings.active_semester {
        interface.activate(semester)?;
    }

    let addr: SocketAddr = settings
        .listen
        .parse()
        .map_err(|e| LingdbError::Config(format!("invalid listen address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LingdbError::Execution(e.to_string()))?;
    info!(%addr, "listening");
    axum::serve(listener, server::router(interface))
        .await
        .map_err(|e| LingdbError::Execution(e.to_string()))?;
    Ok(())
}
