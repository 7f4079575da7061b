//! TaskDB HTTP server binary.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store on the default address 0.0.0.0:3000
//! taskdb-server
//!
//! # Persistent store on a custom address
//! taskdb-server --bind 127.0.0.1:8080 --data ./tasks.tdb
//!
//! # Or via environment variables
//! TASKDB_ADDR=127.0.0.1:8080 TASKDB_DATA=./tasks.tdb taskdb-server
//! ```

use clap::Parser;
use taskdb_server::config::{Cli, ServerConfig};
use taskdb_server::{router, AppState};
use taskdb_store::Store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from(Cli::parse());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Open the store before binding the listener: a server that cannot
    // reach its data must not accept requests.
    let store = match &config.data_path {
        Some(path) => match Store::open(path) {
            Ok(store) => {
                tracing::info!(path = %path.display(), "opened snapshot store");
                store
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to open store");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("no data path configured, using in-memory store");
            Store::in_memory()
        }
    };

    let app = router(AppState::new(&store));

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => tracing::info!(addr = %addr, "taskdb server listening"),
        Err(_) => tracing::info!(addr = %config.bind_addr, "taskdb server listening"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
