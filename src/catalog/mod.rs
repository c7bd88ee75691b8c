//! Catalog row types shared by the CSV writers and the importer.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod details;

pub use details::{BookDetailsRow, DvdDetailsRow, MediaDetails, MusicDetailsRow};

/// Maximum number of source items turned into products per media type.
pub const MAX_ITEMS_PER_TYPE: usize = 15;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "BOOK")]
    Book,
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "LP_RECORD")]
    LpRecord,
    #[serde(rename = "DVD")]
    Dvd,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Book,
        MediaType::Cd,
        MediaType::LpRecord,
        MediaType::Dvd,
    ];

    /// Value stored in `products.media_type`.
    pub fn as_db_str(self) -> &'static str {
        match self {
            MediaType::Book => "BOOK",
            MediaType::Cd => "CD",
            MediaType::LpRecord => "LP_RECORD",
            MediaType::Dvd => "DVD",
        }
    }

    /// Prefix of the generated CSV file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            MediaType::Book => "books",
            MediaType::Cd => "cds",
            MediaType::LpRecord => "lps",
            MediaType::Dvd => "dvds",
        }
    }

    /// Source JSON file expected in the data directory.
    pub fn source_file(self) -> &'static str {
        match self {
            MediaType::Book => "Books.json",
            MediaType::Cd => "CDs.json",
            MediaType::LpRecord => "LPs.json",
            MediaType::Dvd => "DVDs.json",
        }
    }

    /// Top-level array holding the items in the source document.
    pub fn source_key(self) -> &'static str {
        match self {
            MediaType::Book => "docs",
            MediaType::Cd | MediaType::LpRecord => "releases",
            MediaType::Dvd => "results",
        }
    }

    pub fn product_description(self) -> &'static str {
        match self {
            MediaType::Book => "New condition, direct from publisher",
            MediaType::Cd => "New sealed CD",
            MediaType::LpRecord => "Vinyl record in excellent condition",
            MediaType::Dvd => "New sealed DVD, region free",
        }
    }

    /// Details table in the database. LPs live in `lp_records`, not under
    /// their file stem.
    pub fn details_table(self) -> &'static str {
        match self {
            MediaType::Book => "books",
            MediaType::Cd => "cds",
            MediaType::LpRecord => "lp_records",
            MediaType::Dvd => "dvds",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Book => "book",
            MediaType::Cd => "CD",
            MediaType::LpRecord => "LP",
            MediaType::Dvd => "DVD",
        }
    }

    pub fn csv_paths(self, dir: &Path) -> CsvPair {
        CsvPair {
            products: dir.join(format!("{}_products.csv", self.file_stem())),
            details: dir.join(format!("{}_details.csv", self.file_stem())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Location of a products file and its companion details file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvPair {
    pub products: PathBuf,
    pub details: PathBuf,
}

impl CsvPair {
    pub fn exists(&self) -> bool {
        self.products.is_file() && self.details.is_file()
    }
}

/// One line of a `<type>_products.csv` file.
///
/// `row_index` is 1-based and matches `product_id` on the details row.
/// Older files without the column are still accepted by the importer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(default)]
    pub row_index: Option<u32>,
    pub title: String,
    pub barcode: String,
    pub base_value: f64,
    pub current_price: f64,
    pub stock: i32,
    pub media_type: MediaType,
    pub product_description: String,
    pub dimensions: String,
    pub weight: f64,
    pub warehouse_entry_date: String,
}
