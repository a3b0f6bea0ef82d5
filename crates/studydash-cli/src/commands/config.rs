use clap::Subcommand;
use studydash_core::storage::Database;
use studydash_core::Config;

use super::timer::{load_engine, save_engine};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.work_minutes", "notifications.volume")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

/// Push the saved timer settings into the persisted engine.
/// `load_engine` applies them when they differ from the stored engine's.
fn apply_to_engine(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let engine = load_engine(&db, config)?;
    save_engine(&db, &engine)?;
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            if key.starts_with("timer.") {
                apply_to_engine(&config)?;
            }
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            apply_to_engine(&config)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
