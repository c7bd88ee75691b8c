//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;

use tracing::{info, warn};

use crate::synth::users::{DEFAULT_USER_COUNT, DEFAULT_USER_SEED};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

/// Load .env exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Common bootstrap for CLI binaries: env first, then logging.
pub fn bootstrap_cli(bin_name: &str) {
    init_env();
    if let Err(e) = crate::tracing::init_tracing(DEFAULT_LOG_FILTER) {
        eprintln!("[{bin_name}] {e}");
    }
    info!(target = "bootstrap", bin = bin_name, "starting");
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Get parsed value with default fallback. Unparseable values are logged.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env_opt(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(target = "env", key, value = %raw, "unparseable; using default");
            default
        }),
        None => default,
    }
}

/// Optional parsed value.
pub fn env_parse_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env_opt(key).and_then(|s| s.trim().parse().ok())
}

/// Boolean flag; accepts 1/true/on/yes (case-insensitive) as true.
pub fn env_flag(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(raw) => parse_flag(&raw),
        None => default,
    }
}

fn parse_flag(raw: &str) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "on" | "yes")
}

/// Where source JSON lives and generated CSVs go (`SEED_DATA_DIR`, default `data`).
pub fn data_dir() -> PathBuf {
    env_opt("SEED_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Seed for catalog generation (`SEED_RNG_SEED`); `None` means fresh entropy.
pub fn catalog_seed() -> Option<u64> {
    env_parse_opt("SEED_RNG_SEED")
}

pub fn user_seed() -> u64 {
    env_parse("SEED_USER_SEED", DEFAULT_USER_SEED)
}

pub fn user_count() -> usize {
    env_parse("SEED_USER_COUNT", DEFAULT_USER_COUNT)
}

/// `AUTO_MIGRATE=1` applies the bundled schema before importing.
pub fn auto_migrate() -> bool {
    env_flag("AUTO_MIGRATE", false)
}
