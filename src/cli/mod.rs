//! Command implementations behind the binaries in `src/bin`.

use clap::Args;

use crate::database_ops::DbConfig;

pub mod generate_products;
pub mod generate_users;
pub mod import_products;
pub mod import_users;

/// Connection flags shared by the importers.
#[derive(Debug, Clone, Args)]
pub struct DbArgs {
    /// Database host
    #[arg(long, default_value = "localhost")]
    pub host: String,
    /// Database port
    #[arg(long, default_value_t = 5432)]
    pub port: u16,
    /// Database name
    #[arg(long, default_value = "aims")]
    pub dbname: String,
    /// Database user
    #[arg(long, default_value = "postgres")]
    pub user: String,
    /// Database password
    #[arg(long)]
    pub password: String,
    /// Apply the bundled schema before importing (also AUTO_MIGRATE=1)
    #[arg(long)]
    pub migrate: bool,
}

impl DbArgs {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.host.clone(),
            port: self.port,
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
