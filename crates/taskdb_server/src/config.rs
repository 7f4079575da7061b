//! Server configuration.
//!
//! Resolution priority (highest first): CLI arguments, environment
//! variables (via clap's `env` attribute), compiled defaults.

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the TaskDB server.
#[derive(Debug, Parser)]
#[command(name = "taskdb-server", version, about = "TaskDB HTTP server")]
pub struct Cli {
    /// Address to bind the server to.
    #[arg(short, long, env = "TASKDB_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Path to the snapshot file; omit for an in-memory store.
    #[arg(short, long, env = "TASKDB_DATA")]
    pub data: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "TASKDB_LOG", default_value = "info")]
    pub log_level: String,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:3000`).
    pub bind_addr: String,
    /// Snapshot path; `None` means in-memory.
    pub data_path: Option<PathBuf>,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            bind_addr: cli.bind,
            data_path: cli.data,
            log_level: cli.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.data_path.is_none());
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::parse_from([
            "taskdb-server",
            "--bind",
            "127.0.0.1:8080",
            "--data",
            "/tmp/data.tdb",
        ]);
        let config = ServerConfig::from(cli);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.data_path, Some(PathBuf::from("/tmp/data.tdb")));
        assert_eq!(config.log_level, "info");
    }
}
