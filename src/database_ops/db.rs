use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use tracing::{info, instrument};

/// Directory scanned for numbered `NNNN_name.sql` files.
pub const MIGRATIONS_DIR: &str = "./migrations";

/// Connection settings as given on the importer command line.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user)
            .password(&self.password)
    }
}

#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    /// Open a small pool; imports run one row at a time.
    #[instrument(skip(cfg), fields(host = %cfg.host, dbname = %cfg.dbname))]
    pub async fn connect(cfg: &DbConfig) -> Result<Self> {
        Self::connect_with(cfg.connect_options()).await
    }

    pub async fn connect_with(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .context("connecting to PostgreSQL")?;
        info!("connected to db");
        Ok(Self { pool })
    }

    /// Apply pending files from [`MIGRATIONS_DIR`].
    pub async fn migrate(&self) -> Result<usize> {
        run_migrations(&self.pool, Path::new(MIGRATIONS_DIR)).await
    }
}

/// `NNNN_description.sql` files in version order. Anything else is ignored.
fn migration_files(dir: &Path) -> Result<Vec<(i64, String, PathBuf)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(fname) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(stem) = fname.strip_suffix(".sql") else {
            continue;
        };
        let Some((num, desc)) = stem.split_once('_') else {
            continue;
        };
        if let Ok(version) = num.parse::<i64>() {
            found.push((version, desc.to_string(), path));
        }
    }
    found.sort_by_key(|(v, _, _)| *v);
    Ok(found)
}

/// Apply each numbered SQL file once, tracked in `_seed_migrations`.
/// Returns how many files were applied.
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<usize> {
    if !dir.exists() {
        info!(dir = %dir.display(), "no migrations directory; skipping");
        return Ok(0);
    }

    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS _seed_migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            installed_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
    )
    .execute(pool)
    .await?;

    let mut applied: HashSet<i64> = HashSet::new();
    for row in sqlx::query("SELECT version FROM _seed_migrations")
        .fetch_all(pool)
        .await?
    {
        applied.insert(row.try_get::<i64, _>(0)?);
    }

    let mut count = 0;
    for (version, desc, path) in migration_files(dir)? {
        if !applied.insert(version) {
            continue;
        }
        let sql = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        info!(version, file = %path.display(), "applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(&sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {version} ({desc}) failed"))?;
        sqlx::query("INSERT INTO _seed_migrations (version, description) VALUES ($1, $2)")
            .bind(version)
            .bind(&desc)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        count += 1;
    }

    info!(applied = count, "migrations up-to-date");
    Ok(count)
}
