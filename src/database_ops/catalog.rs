//! Loads `<type>_products.csv` / `<type>_details.csv` pairs into the catalog
//! tables, one transaction per product.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use csv::StringRecord;
use serde_json::{json, Value};
use sqlx::{PgConnection, PgPool, Postgres};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::outcome::{ImportSummary, RowError, RowOutcome};
use crate::catalog::details::{parse_date, BookDetails, DvdDetails, MusicDetails};
use crate::catalog::{
    BookDetailsRow, CsvPair, DvdDetailsRow, MediaDetails, MediaType, MusicDetailsRow, ProductRow,
};

pub const HISTORY_OPERATION: &str = "ADD";
pub const HISTORY_SOURCE: &str = "data_import";

/// `changed_by` on history rows written by the importer.
pub fn import_actor() -> Uuid {
    Uuid::nil()
}

/// `operation_details` payload of the audit row.
pub fn history_details(media: MediaType) -> Value {
    json!({ "source": HISTORY_SOURCE, "media_type": media.as_db_str() })
}

/// A product row with its fields parsed for insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub barcode: String,
    pub base_value: f64,
    pub current_price: f64,
    pub stock: i32,
    pub media_type: MediaType,
    pub product_description: String,
    pub dimensions: String,
    pub weight: f64,
    pub warehouse_entry_date: NaiveDate,
}

impl NewProduct {
    /// The media type always comes from the file being imported.
    pub fn from_row(row: ProductRow, media: MediaType) -> Result<Self, RowError> {
        let warehouse_entry_date = parse_date("warehouse_entry_date", &row.warehouse_entry_date)?;
        if row.media_type != media {
            warn!(expected = %media, found = %row.media_type, title = %row.title, "media_type column disagrees with file; using file type");
        }
        Ok(Self {
            title: row.title,
            barcode: row.barcode,
            base_value: row.base_value,
            current_price: row.current_price,
            stock: row.stock,
            media_type: media,
            product_description: row.product_description,
            dimensions: row.dimensions,
            weight: row.weight,
            warehouse_entry_date,
        })
    }
}

/// Where imported products go.
#[async_trait::async_trait]
pub trait CatalogStore: Send {
    /// Insert the product, its details and an audit row atomically.
    /// Returns the new product id; on error nothing is kept.
    async fn add_product(
        &mut self,
        product: &NewProduct,
        details: &MediaDetails,
    ) -> Result<i64, RowError>;
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_PRODUCT: &str = "INSERT INTO products (title, barcode, base_value, current_price, stock, media_type, product_description, dimensions, weight, warehouse_entry_date)
     VALUES ($1, $2, $3::numeric, $4::numeric, $5, $6::media_type, $7, $8, $9::numeric, $10)
     RETURNING id";
const BOOK_COLUMNS: &str = "(product_id, authors, cover_type, publisher, publication_date, pages, language, genre)
     VALUES ($1, $2, $3::cover_type, $4, $5, $6, $7, $8)";
const MUSIC_COLUMNS: &str = "(product_id, artists, record_label, tracklist, genre, release_date)
     VALUES ($1, $2, $3, $4, $5, $6)";
const DVD_COLUMNS: &str = "(product_id, disc_type, director, runtime, studio, language, subtitles, release_date, genre)
     VALUES ($1, $2::disc_type, $3, $4, $5, $6, $7, $8, $9)";
const INSERT_HISTORY: &str = "INSERT INTO product_edit_history (product_id, operation_type, changed_by, operation_details)
     VALUES ($1, $2, $3, $4)";

/// `INSERT` for the details table of `media`.
fn details_insert(media: MediaType) -> String {
    let columns = match media {
        MediaType::Book => BOOK_COLUMNS,
        MediaType::Cd | MediaType::LpRecord => MUSIC_COLUMNS,
        MediaType::Dvd => DVD_COLUMNS,
    };
    format!("INSERT INTO {} {columns}", media.details_table())
}

async fn insert_details(
    conn: &mut PgConnection,
    product_id: i64,
    details: &MediaDetails,
) -> Result<(), sqlx::Error> {
    let sql = details_insert(details.media_type());
    let query = sqlx::query::<Postgres>(&sql).bind(product_id);
    let query = match details {
        MediaDetails::Book(b) => query
            .bind(b.authors.as_slice())
            .bind(&b.cover_type)
            .bind(&b.publisher)
            .bind(b.publication_date)
            .bind(b.pages)
            .bind(&b.language)
            .bind(&b.genre),
        MediaDetails::Cd(m) | MediaDetails::Lp(m) => query
            .bind(m.artists.as_slice())
            .bind(&m.record_label)
            .bind(m.tracklist.as_slice())
            .bind(&m.genre)
            .bind(m.release_date),
        MediaDetails::Dvd(d) => query
            .bind(&d.disc_type)
            .bind(&d.director)
            .bind(d.runtime)
            .bind(&d.studio)
            .bind(&d.language)
            .bind(d.subtitles.as_slice())
            .bind(d.release_date)
            .bind(&d.genre),
    };
    query.execute(&mut *conn).await?;
    Ok(())
}

async fn insert_all(
    conn: &mut PgConnection,
    product: &NewProduct,
    details: &MediaDetails,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(INSERT_PRODUCT)
        .bind(&product.title)
        .bind(&product.barcode)
        .bind(product.base_value)
        .bind(product.current_price)
        .bind(product.stock)
        .bind(product.media_type.as_db_str())
        .bind(&product.product_description)
        .bind(&product.dimensions)
        .bind(product.weight)
        .bind(product.warehouse_entry_date)
        .fetch_one(&mut *conn)
        .await?;

    insert_details(conn, id, details).await?;

    sqlx::query(INSERT_HISTORY)
        .bind(id)
        .bind(HISTORY_OPERATION)
        .bind(import_actor())
        .bind(history_details(product.media_type))
        .execute(&mut *conn)
        .await?;

    Ok(id)
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn add_product(
        &mut self,
        product: &NewProduct,
        details: &MediaDetails,
    ) -> Result<i64, RowError> {
        let mut tx = self.pool.begin().await?;
        match insert_all(&mut *tx, product, details).await {
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

/// How product rows find their details row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinMode {
    /// `row_index` on the product equals `product_id` on the details row.
    RowIndex,
    /// Files written before `row_index` existed: the next details id is the
    /// number of products imported so far plus one. A failed row shifts every
    /// later match.
    Ordinal,
}

impl JoinMode {
    fn detect(headers: &StringRecord) -> Self {
        if headers.iter().any(|h| h.trim() == "row_index") {
            JoinMode::RowIndex
        } else {
            JoinMode::Ordinal
        }
    }
}

/// All readable rows of a details file keyed by `product_id`.
struct DetailsIndex {
    media: MediaType,
    headers: StringRecord,
    rows: HashMap<u32, StringRecord>,
}

impl DetailsIndex {
    fn load(path: &Path, media: MediaType) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let headers = rdr.headers()?.clone();
        let id_col = headers
            .iter()
            .position(|h| h.trim() == "product_id")
            .ok_or_else(|| anyhow!("{} has no product_id column", path.display()))?;

        let mut rows = HashMap::new();
        for (i, record) in rdr.records().enumerate() {
            let line = i + 1;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(%media, line, error = %e, "skipping unreadable details row");
                    continue;
                }
            };
            let raw = record.get(id_col).unwrap_or_default();
            let Ok(id) = raw.trim().parse::<u32>() else {
                warn!(%media, line, product_id = raw, "skipping details row with bad product_id");
                continue;
            };
            if rows.contains_key(&id) {
                warn!(%media, line, product_id = id, "duplicate product_id; keeping the first");
                continue;
            }
            rows.insert(id, record);
        }

        Ok(Self {
            media,
            headers,
            rows,
        })
    }

    fn resolve(&self, product_id: u32) -> Result<MediaDetails, RowError> {
        let record = self
            .rows
            .get(&product_id)
            .ok_or(RowError::MissingDetails(product_id))?;
        let bad = |source| RowError::BadDetails { product_id, source };
        let headers = Some(&self.headers);

        Ok(match self.media {
            MediaType::Book => {
                let row: BookDetailsRow = record.deserialize(headers).map_err(bad)?;
                MediaDetails::Book(BookDetails::try_from(row)?)
            }
            MediaType::Cd => {
                let row: MusicDetailsRow = record.deserialize(headers).map_err(bad)?;
                MediaDetails::Cd(MusicDetails::try_from(row)?)
            }
            MediaType::LpRecord => {
                let row: MusicDetailsRow = record.deserialize(headers).map_err(bad)?;
                MediaDetails::Lp(MusicDetails::try_from(row)?)
            }
            MediaType::Dvd => {
                let row: DvdDetailsRow = record.deserialize(headers).map_err(bad)?;
                MediaDetails::Dvd(DvdDetails::try_from(row)?)
            }
        })
    }
}

async fn import_row<S>(
    store: &mut S,
    details: &DetailsIndex,
    media: MediaType,
    product_id: Option<u32>,
    row: ProductRow,
) -> Result<i64, RowError>
where
    S: CatalogStore + ?Sized,
{
    let product_id = product_id.ok_or(RowError::MissingRowIndex)?;
    let resolved = details.resolve(product_id)?;
    let product = NewProduct::from_row(row, media)?;
    store.add_product(&product, &resolved).await
}

/// Import one media type's file pair. Row failures are recorded and skipped;
/// only unreadable files are an error.
#[instrument(skip(store, pair), fields(media = %media))]
pub async fn import_media<S>(store: &mut S, media: MediaType, pair: &CsvPair) -> Result<ImportSummary<i64>>
where
    S: CatalogStore + ?Sized,
{
    let details = DetailsIndex::load(&pair.details, media)?;

    let mut rdr = csv::Reader::from_path(&pair.products)
        .with_context(|| format!("opening {}", pair.products.display()))?;
    let join = JoinMode::detect(rdr.headers()?);
    if join == JoinMode::Ordinal {
        warn!(file = %pair.products.display(), "no row_index column; matching details by import order");
    }

    let mut summary = ImportSummary::new(media.file_stem());
    for (i, row) in rdr.deserialize::<ProductRow>().enumerate() {
        let line = i + 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "unreadable product row");
                summary.record(RowOutcome::Failed {
                    line,
                    label: format!("line {line}"),
                    error: e.into(),
                });
                continue;
            }
        };

        let label = row.title.clone();
        let product_id = match join {
            JoinMode::RowIndex => row.row_index,
            JoinMode::Ordinal => Some(summary.successful() as u32 + 1),
        };
        match import_row(store, &details, media, product_id, row).await {
            Ok(id) => {
                info!(line, id, title = %label, "imported {}", media.label());
                summary.record(RowOutcome::Imported { line, label, key: id });
            }
            Err(error) => {
                warn!(line, title = %label, error = %error, "failed to import {}", media.label());
                summary.record(RowOutcome::Failed { line, label, error });
            }
        }
    }

    info!(
        successful = summary.successful(),
        failed = summary.failed(),
        "{} import finished",
        media.label()
    );
    Ok(summary)
}

/// `--media-type` choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MediaSelection {
    #[default]
    All,
    Books,
    Cds,
    Lps,
    Dvds,
}

impl MediaSelection {
    pub fn single(self) -> Option<MediaType> {
        match self {
            MediaSelection::All => None,
            MediaSelection::Books => Some(MediaType::Book),
            MediaSelection::Cds => Some(MediaType::Cd),
            MediaSelection::Lps => Some(MediaType::LpRecord),
            MediaSelection::Dvds => Some(MediaType::Dvd),
        }
    }
}

/// Import the selected media types from `csv_dir`.
///
/// With [`MediaSelection::All`] a missing or unreadable pair is logged and
/// skipped; a single selected type must have its files.
pub async fn import_catalog<S>(
    store: &mut S,
    csv_dir: &Path,
    selection: MediaSelection,
) -> Result<Vec<ImportSummary<i64>>>
where
    S: CatalogStore + ?Sized,
{
    if let Some(media) = selection.single() {
        let pair = media.csv_paths(csv_dir);
        if !pair.exists() {
            bail!(
                "missing {} or {}",
                pair.products.display(),
                pair.details.display()
            );
        }
        return Ok(vec![import_media(store, media, &pair).await?]);
    }

    let mut summaries = Vec::new();
    for media in MediaType::ALL {
        let pair = media.csv_paths(csv_dir);
        if !pair.exists() {
            warn!(%media, dir = %csv_dir.display(), "CSV files not found; skipping");
            continue;
        }
        match import_media(store, media, &pair).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => error!(%media, error = %e, "import aborted for media type"),
        }
    }
    Ok(summaries)
}
