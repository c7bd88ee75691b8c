//! CSV writers for generated catalog and user files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;

use crate::catalog::CsvPair;
use crate::sources::Batch;
use crate::synth::UserRow;

pub const USERS_FILE: &str = "aims_users.csv";

/// Write `rows` to `path` with a header line and every field quoted.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

/// Write `<stem>_products.csv` and `<stem>_details.csv` under `dir`.
pub fn write_batch<D: Serialize>(dir: &Path, batch: &Batch<D>) -> Result<CsvPair> {
    ensure_dir(dir)?;
    let paths = batch.media.csv_paths(dir);
    write_rows(&paths.products, &batch.products)?;
    write_rows(&paths.details, &batch.details)?;
    Ok(paths)
}

pub fn write_users(dir: &Path, users: &[UserRow]) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(USERS_FILE);
    write_rows(&path, users)?;
    Ok(path)
}
