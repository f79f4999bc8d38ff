use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Nodulewatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP server.
const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Get the application data directory.
/// `~/Nodulewatch/` by default (user-visible), overridable with
/// `NODULEWATCH_DATA_DIR` for tests and non-standard deployments.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NODULEWATCH_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("patients.db")
}

/// Directory holding the append-only CSV export files.
pub fn export_dir() -> PathBuf {
    app_data_dir()
}

/// Bind address for the HTTP server (`NODULEWATCH_ADDR` override).
pub fn bind_addr() -> SocketAddr {
    std::env::var("NODULEWATCH_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("Invalid NODULEWATCH_ADDR")
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "info,nodulewatch=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_data_dir() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("patients.db"));
    }

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
