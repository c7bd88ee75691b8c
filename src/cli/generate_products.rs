use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use crate::catalog::{CsvPair, MediaType};
use crate::export::write_batch;
use crate::normalization::genre::GenreMapper;
use crate::sources::{build_batch, load_items, musicbrainz, open_library, tmdb};
use crate::util::env as env_util;

#[derive(Debug, Clone)]
pub struct GenerateProductsConfig {
    /// Holds `Books.json` etc. and receives the CSVs.
    pub data_dir: PathBuf,
    /// `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub today: NaiveDate,
}

impl GenerateProductsConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: env_util::data_dir(),
            seed: env_util::catalog_seed(),
            today: Local::now().date_naive(),
        }
    }
}

fn generate_one(
    media: MediaType,
    cfg: &GenerateProductsConfig,
    rng: &mut StdRng,
    genres: &GenreMapper,
) -> Result<(CsvPair, usize)> {
    let items = load_items(&cfg.data_dir.join(media.source_file()), media.source_key())?;
    let dir = cfg.data_dir.as_path();
    let today = cfg.today;

    let pair = match media {
        MediaType::Book => write_batch(
            dir,
            &build_batch(media, &items, rng, today, open_library::to_rows),
        )?,
        MediaType::Cd | MediaType::LpRecord => write_batch(
            dir,
            &build_batch(media, &items, rng, today, |item, ctx| {
                musicbrainz::to_rows(media, item, ctx)
            }),
        )?,
        MediaType::Dvd => write_batch(
            dir,
            &build_batch(media, &items, rng, today, |item, ctx| {
                tmdb::to_rows(genres, item, ctx)
            }),
        )?,
    };
    Ok((pair, items.len()))
}

/// Turn every source file into a products/details pair. A media type whose
/// source is missing or unparseable is logged and skipped.
pub fn run(cfg: GenerateProductsConfig) -> Result<Vec<(MediaType, usize)>> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let genres = GenreMapper::with_defaults();

    let mut written = Vec::new();
    for media in MediaType::ALL {
        match generate_one(media, &cfg, &mut rng, &genres) {
            Ok((pair, count)) => {
                info!(%media, count, products = %pair.products.display(), "wrote CSV files");
                println!("Extracted {count} {}s to CSV files", media.label());
                written.push((media, count));
            }
            Err(e) => {
                error!(%media, error = ?e, "generation failed");
            }
        }
    }

    println!("All data extracted to {}", cfg.data_dir.display());
    Ok(written)
}
