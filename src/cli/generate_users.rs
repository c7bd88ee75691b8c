use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::export::write_users;
use crate::synth::synthesize_users;
use crate::util::env as env_util;

#[derive(Debug, Clone)]
pub struct GenerateUsersConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub count: usize,
}

impl GenerateUsersConfig {
    pub fn from_env() -> Self {
        Self {
            out_dir: env_util::data_dir(),
            seed: env_util::user_seed(),
            count: env_util::user_count(),
        }
    }
}

pub fn run(cfg: GenerateUsersConfig) -> Result<PathBuf> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let users = synthesize_users(&mut rng, cfg.count);
    let path = write_users(&cfg.out_dir, &users)?;

    info!(count = users.len(), seed = cfg.seed, path = %path.display(), "wrote users");
    println!("Generated {} users to {}", users.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::USERS_FILE;

    #[test]
    fn writes_requested_number_of_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = run(GenerateUsersConfig {
            out_dir: dir.path().join("data"),
            seed: 42,
            count: 30,
        })
        .unwrap();

        assert!(path.ends_with(USERS_FILE));
        let rows = csv::Reader::from_path(&path).unwrap().records().count();
        assert_eq!(rows, 30);
    }
}
