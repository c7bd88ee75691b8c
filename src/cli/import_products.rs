use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use super::DbArgs;
use crate::database_ops::{import_catalog, Db, ImportSummary, MediaSelection, PgCatalogStore};
use crate::util::env as env_util;

#[derive(Parser, Debug, Clone)]
#[command(name = "import_products", about = "Import generated product CSVs into PostgreSQL")]
pub struct ImportProductsArgs {
    #[command(flatten)]
    pub db: DbArgs,
    /// Directory holding `<type>_products.csv` and `<type>_details.csv`
    #[arg(long, default_value = "data")]
    pub csv_dir: PathBuf,
    /// Which media type to import
    #[arg(long, value_enum, default_value_t = MediaSelection::All)]
    pub media_type: MediaSelection,
}

fn report(summaries: &[ImportSummary<i64>]) {
    for summary in summaries {
        println!("{summary}");
        for (line, label, error) in summary.failures() {
            println!("  line {line} ({label}): {error}");
        }
    }
}

/// Connection problems and a missing single-type file pair are errors;
/// individual rows that fail are only reported.
pub async fn run(args: ImportProductsArgs) -> Result<Vec<ImportSummary<i64>>> {
    let db = Db::connect(&args.db.db_config()).await?;
    if args.db.migrate || env_util::auto_migrate() {
        db.migrate().await?;
    }

    let mut store = PgCatalogStore::new(db.pool.clone());
    let summaries = import_catalog(&mut store, &args.csv_dir, args.media_type).await?;

    let (ok, failed) = summaries
        .iter()
        .fold((0, 0), |(o, f), s| (o + s.successful(), f + s.failed()));
    info!(successful = ok, failed, "product import complete");
    report(&summaries);
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_setup() {
        let args = ImportProductsArgs::try_parse_from(["import_products", "--password", "pw"]).unwrap();
        assert_eq!(args.db.host, "localhost");
        assert_eq!(args.db.port, 5432);
        assert_eq!(args.db.dbname, "aims");
        assert_eq!(args.db.user, "postgres");
        assert_eq!(args.csv_dir, PathBuf::from("data"));
        assert_eq!(args.media_type, MediaSelection::All);
        assert!(!args.db.migrate);
    }

    #[test]
    fn password_is_required() {
        assert!(ImportProductsArgs::try_parse_from(["import_products"]).is_err());
    }

    #[test]
    fn media_type_choices() {
        let args = ImportProductsArgs::try_parse_from([
            "import_products",
            "--password",
            "pw",
            "--media-type",
            "lps",
            "--migrate",
        ])
        .unwrap();
        assert_eq!(args.media_type, MediaSelection::Lps);
        assert!(args.db.migrate);

        assert!(ImportProductsArgs::try_parse_from([
            "import_products",
            "--password",
            "pw",
            "--media-type",
            "vhs",
        ])
        .is_err());
    }
}
