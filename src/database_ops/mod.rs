//! PostgreSQL side of the toolkit: connection, schema and the two importers.

pub mod catalog;
pub mod db;
pub mod outcome;
pub mod users;

pub use catalog::{import_catalog, CatalogStore, MediaSelection, PgCatalogStore};
pub use db::{Db, DbConfig};
pub use outcome::{ImportSummary, RowError, RowOutcome};
pub use users::{import_users, PgUserRegistry, UserRegistry};

// Needs a disposable database: TEST_DATABASE_URL=postgres://... cargo test
#[cfg(test)]
mod pg_tests {
    use chrono::Local;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use sqlx::postgres::PgConnectOptions;

    use super::*;
    use crate::catalog::MediaType;
    use crate::export::{write_batch, write_users};
    use crate::sources::{build_batch, musicbrainz, open_library};
    use crate::synth::synthesize_users;

    async fn test_db() -> Option<Db> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let options: PgConnectOptions = url.parse().expect("TEST_DATABASE_URL");
        let db = Db::connect_with(options).await.expect("connect");
        db.migrate().await.expect("migrate");
        Some(db)
    }

    #[tokio::test]
    async fn books_land_with_one_history_row_each() {
        let Some(db) = test_db().await else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<_> = (0..3)
            .map(|i| json!({ "title": format!("pg book {i}"), "author_name": ["A, B"] }))
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let batch = build_batch(
            MediaType::Book,
            &items,
            &mut rng,
            Local::now().date_naive(),
            open_library::to_rows,
        );
        write_batch(dir.path(), &batch).unwrap();

        let mut store = PgCatalogStore::new(db.pool.clone());
        let summaries = import_catalog(&mut store, dir.path(), MediaSelection::Books)
            .await
            .unwrap();
        assert_eq!(summaries[0].successful(), 3);

        let ids: Vec<i64> = summaries[0]
            .outcomes
            .iter()
            .filter_map(|o| match o {
                RowOutcome::Imported { key, .. } => Some(*key),
                RowOutcome::Failed { .. } => None,
            })
            .collect();
        let history: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM product_edit_history WHERE product_id = ANY($1) AND operation_type = 'ADD'",
        )
        .bind(&ids)
        .fetch_one(&db.pool)
        .await
        .unwrap();
        assert_eq!(history, 3);
    }

    async fn count_titled(db: &Db, table: &str, prefix: &str) -> i64 {
        let sql = format!(
            "SELECT count(*) FROM {table} t JOIN products p ON p.id = t.{col} WHERE p.title LIKE $1",
            col = if table == "products" { "id" } else { "product_id" }
        );
        sqlx::query_scalar(&sql)
            .bind(format!("{prefix}%"))
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn enum_violation_in_details_rolls_back_the_product() {
        let Some(db) = test_db().await else {
            return;
        };
        let prefix = format!("rollback {} ", std::process::id());
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<_> = (0..3)
            .map(|i| json!({ "title": format!("{prefix}{i}") }))
            .collect();
        let mut rng = StdRng::seed_from_u64(9);
        let mut batch = build_batch(
            MediaType::Book,
            &items,
            &mut rng,
            Local::now().date_naive(),
            open_library::to_rows,
        );
        // Parses fine, but the cover_type enum has no such value.
        batch.details[1].cover_type = "SOFTCOVER".into();
        write_batch(dir.path(), &batch).unwrap();

        let mut store = PgCatalogStore::new(db.pool.clone());
        let summaries = import_catalog(&mut store, dir.path(), MediaSelection::Books)
            .await
            .unwrap();
        assert_eq!(summaries[0].successful(), 2);
        assert_eq!(summaries[0].failed(), 1);
        let (_, label, error) = summaries[0].failures().next().unwrap();
        assert_eq!(label, format!("{prefix}1"));
        assert!(matches!(error, RowError::Database(_)));

        assert_eq!(count_titled(&db, "products", &prefix).await, 2);
        assert_eq!(count_titled(&db, "books", &prefix).await, 2);
        assert_eq!(count_titled(&db, "product_edit_history", &prefix).await, 2);
    }

    #[tokio::test]
    async fn lp_details_land_in_lp_records() {
        let Some(db) = test_db().await else {
            return;
        };
        let prefix = format!("vinyl {} ", std::process::id());
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<_> = (0..2)
            .map(|i| json!({ "title": format!("{prefix}{i}") }))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);
        let batch = build_batch(
            MediaType::LpRecord,
            &items,
            &mut rng,
            Local::now().date_naive(),
            |item, ctx| musicbrainz::to_rows(MediaType::LpRecord, item, ctx),
        );
        write_batch(dir.path(), &batch).unwrap();

        let mut store = PgCatalogStore::new(db.pool.clone());
        let summaries = import_catalog(&mut store, dir.path(), MediaSelection::Lps)
            .await
            .unwrap();
        assert_eq!(summaries[0].successful(), 2);
        assert_eq!(count_titled(&db, "lp_records", &prefix).await, 2);
    }

    #[tokio::test]
    async fn second_registration_of_a_user_fails() {
        let Some(db) = test_db().await else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let seed = std::process::id() as u64;
        let users = synthesize_users(&mut StdRng::seed_from_u64(seed), 2);
        let path = write_users(dir.path(), &users).unwrap();

        let mut registry = PgUserRegistry::new(db.pool.clone());
        let first = import_users(&mut registry, &path).await.unwrap();
        let second = import_users(&mut registry, &path).await.unwrap();
        assert_eq!(first.successful(), 2);
        assert_eq!(second.failed(), 2);
    }
}
