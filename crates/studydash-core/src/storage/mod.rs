mod config;
pub mod database;

pub use config::{Config, NotificationsConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the studydash data directory, creating it if needed.
///
/// `STUDYDASH_DATA_DIR` overrides the location outright. Otherwise the
/// directory is `~/.config/studydash[-dev]/` based on `STUDYDASH_ENV`
/// (set `STUDYDASH_ENV=dev` to use the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("STUDYDASH_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYDASH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studydash-dev")
            } else {
                base_dir.join("studydash")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
