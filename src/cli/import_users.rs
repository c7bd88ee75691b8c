use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use uuid::Uuid;

use super::DbArgs;
use crate::database_ops::{import_users, Db, ImportSummary, PgUserRegistry};
use crate::util::env as env_util;

#[derive(Parser, Debug, Clone)]
#[command(name = "import_users", about = "Register users from a generated CSV")]
pub struct ImportUsersArgs {
    #[command(flatten)]
    pub db: DbArgs,
    /// Users CSV written by generate_users
    #[arg(long, default_value = "data/aims_users.csv")]
    pub csv: PathBuf,
}

pub async fn run(args: ImportUsersArgs) -> Result<ImportSummary<Uuid>> {
    let db = Db::connect(&args.db.db_config()).await?;
    if args.db.migrate || env_util::auto_migrate() {
        db.migrate().await?;
    }

    let mut registry = PgUserRegistry::new(db.pool.clone());
    let summary = import_users(&mut registry, &args.csv).await?;

    println!("Import completed: {} successful, {} failed", summary.successful(), summary.failed());
    for (line, username, error) in summary.failures() {
        println!("  line {line} ({username}): {error}");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_defaults_to_generated_file() {
        let args = ImportUsersArgs::try_parse_from(["import_users", "--password", "pw"]).unwrap();
        assert_eq!(args.csv, PathBuf::from("data/aims_users.csv"));
        assert_eq!(args.db.port, 5432);
    }

    #[test]
    fn flags_override_defaults() {
        let args = ImportUsersArgs::try_parse_from([
            "import_users",
            "--password",
            "pw",
            "--host",
            "db.internal",
            "--port",
            "6543",
            "--csv",
            "/tmp/users.csv",
        ])
        .unwrap();
        assert_eq!(args.db.host, "db.internal");
        assert_eq!(args.db.port, 6543);
        assert_eq!(args.csv, PathBuf::from("/tmp/users.csv"));
    }
}
