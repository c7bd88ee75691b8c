//! Loads `aims_users.csv` through the `register_user` routine.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::outcome::{ImportSummary, RowError, RowOutcome};
use crate::synth::UserRow;

/// Creates accounts. Implementations apply their own default role.
#[async_trait::async_trait]
pub trait UserRegistry: Send {
    async fn register(&mut self, user: &UserRow) -> Result<Uuid, RowError>;
}

pub struct PgUserRegistry {
    pool: PgPool,
}

impl PgUserRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRegistry for PgUserRegistry {
    async fn register(&mut self, user: &UserRow) -> Result<Uuid, RowError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_scalar::<_, Uuid>("SELECT register_user($1, $2, $3, $4, $5)")
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .fetch_one(&mut *tx)
            .await;

        match result {
            Ok(id) => {
                tx.commit().await?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

/// Register every row of `path`. Failed rows are counted and skipped.
#[instrument(skip(registry))]
pub async fn import_users<R>(registry: &mut R, path: &Path) -> Result<ImportSummary<Uuid>>
where
    R: UserRegistry + ?Sized,
{
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut summary = ImportSummary::new("users");
    for (i, row) in rdr.deserialize::<UserRow>().enumerate() {
        let line = i + 1;
        let user = match row {
            Ok(user) => user,
            Err(e) => {
                warn!(line, error = %e, "unreadable user row");
                summary.record(RowOutcome::Failed {
                    line,
                    label: format!("line {line}"),
                    error: e.into(),
                });
                continue;
            }
        };

        match registry.register(&user).await {
            Ok(id) => {
                info!(line, username = %user.username, %id, "created user");
                summary.record(RowOutcome::Imported {
                    line,
                    label: user.username,
                    key: id,
                });
            }
            Err(error) => {
                warn!(line, username = %user.username, error = %error, "failed to create user");
                summary.record(RowOutcome::Failed {
                    line,
                    label: user.username,
                    error,
                });
            }
        }
    }

    info!(
        successful = summary.successful(),
        failed = summary.failed(),
        "user import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::export::write_users;
    use crate::synth::synthesize_users;
    use crate::synth::users::CUSTOMER_ROLE;

    /// Mirrors the unique constraints of the users table.
    #[derive(Default)]
    struct MemoryRegistry {
        by_username: HashMap<String, (Uuid, String)>,
    }

    #[async_trait::async_trait]
    impl UserRegistry for MemoryRegistry {
        async fn register(&mut self, user: &UserRow) -> Result<Uuid, RowError> {
            let email_taken = self.by_username.values().any(|(_, e)| *e == user.email);
            if self.by_username.contains_key(&user.username) || email_taken {
                return Err(sqlx::Error::Protocol(format!("{} already exists", user.username)).into());
            }
            let id = Uuid::new_v4();
            self.by_username
                .insert(user.username.clone(), (id, user.email.clone()));
            Ok(id)
        }
    }

    #[tokio::test]
    async fn generated_users_all_register() {
        let dir = tempfile::tempdir().unwrap();
        let users = synthesize_users(&mut StdRng::seed_from_u64(42), 30);
        let path = write_users(dir.path(), &users).unwrap();

        let mut registry = MemoryRegistry::default();
        let summary = import_users(&mut registry, &path).await.unwrap();

        assert_eq!(summary.successful(), 30);
        assert_eq!(summary.failed(), 0);
        assert!(users.iter().all(|u| u.role == CUSTOMER_ROLE));
    }

    #[tokio::test]
    async fn duplicates_and_bad_rows_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aims_users.csv");
        fs::write(
            &path,
            "username,password,email,first_name,last_name,role,phone,address\n\
             jdoeuser,Admin123!,john.doe@example.com,John,Doe,CUSTOMER,555-0100,\"1 Main St, Town\"\n\
             jdoeuser,Admin123!,john.doe1@example.com,John,Doe,CUSTOMER,555-0101,\"2 Main St, Town\"\n\
             broken,row\n\
             asmithxx,Admin123!,ann.smith@example.com,Ann,Smith,CUSTOMER,555-0102,\"3 Main St, Town\"\n",
        )
        .unwrap();

        let mut registry = MemoryRegistry::default();
        let summary = import_users(&mut registry, &path).await.unwrap();

        assert_eq!(summary.successful(), 2);
        assert_eq!(summary.failed(), 2);
        let failed_lines: Vec<_> = summary.failures().map(|(line, _, _)| line).collect();
        assert_eq!(failed_lines, vec![2, 3]);
        assert!(registry.by_username.contains_key("asmithxx"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = MemoryRegistry::default();
        assert!(import_users(&mut registry, &dir.path().join("nope.csv"))
            .await
            .is_err());
    }
}
