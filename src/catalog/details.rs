//! Media-specific details rows and their typed, insert-ready form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MediaType;
use crate::normalization::array_literal;

/// `books_details.csv`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookDetailsRow {
    pub product_id: u32,
    pub authors: String,
    pub cover_type: String,
    pub publisher: String,
    pub publication_date: String,
    pub pages: i32,
    pub language: String,
    pub genre: String,
}

/// `cds_details.csv` and `lps_details.csv` share one layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MusicDetailsRow {
    pub product_id: u32,
    pub artists: String,
    pub record_label: String,
    pub tracklist: String,
    pub genre: String,
    pub release_date: String,
}

/// `dvds_details.csv`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DvdDetailsRow {
    pub product_id: u32,
    pub disc_type: String,
    pub director: String,
    pub runtime: i32,
    pub studio: String,
    pub language: String,
    pub subtitles: String,
    pub release_date: String,
    pub genre: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BookDetails {
    pub authors: Vec<String>,
    pub cover_type: String,
    pub publisher: String,
    pub publication_date: NaiveDate,
    pub pages: i32,
    pub language: String,
    pub genre: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MusicDetails {
    pub artists: Vec<String>,
    pub record_label: String,
    pub tracklist: Vec<String>,
    pub genre: String,
    pub release_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DvdDetails {
    pub disc_type: String,
    pub director: String,
    pub runtime: i32,
    pub studio: String,
    pub language: String,
    pub subtitles: Vec<String>,
    pub release_date: NaiveDate,
    pub genre: String,
}

/// Details ready to be written to the media type's table.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaDetails {
    Book(BookDetails),
    Cd(MusicDetails),
    Lp(MusicDetails),
    Dvd(DvdDetails),
}

impl MediaDetails {
    pub fn media_type(&self) -> MediaType {
        match self {
            MediaDetails::Book(_) => MediaType::Book,
            MediaDetails::Cd(_) => MediaType::Cd,
            MediaDetails::Lp(_) => MediaType::LpRecord,
            MediaDetails::Dvd(_) => MediaType::Dvd,
        }
    }
}

pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, DetailsError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| DetailsError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DetailsError {
    #[error("{field} is not a valid YYYY-MM-DD date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

impl TryFrom<BookDetailsRow> for BookDetails {
    type Error = DetailsError;

    fn try_from(row: BookDetailsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            authors: array_literal::decode(&row.authors),
            publication_date: parse_date("publication_date", &row.publication_date)?,
            cover_type: row.cover_type,
            publisher: row.publisher,
            pages: row.pages,
            language: row.language,
            genre: row.genre,
        })
    }
}

impl TryFrom<MusicDetailsRow> for MusicDetails {
    type Error = DetailsError;

    fn try_from(row: MusicDetailsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            artists: array_literal::decode(&row.artists),
            tracklist: array_literal::decode(&row.tracklist),
            release_date: parse_date("release_date", &row.release_date)?,
            record_label: row.record_label,
            genre: row.genre,
        })
    }
}

impl TryFrom<DvdDetailsRow> for DvdDetails {
    type Error = DetailsError;

    fn try_from(row: DvdDetailsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            subtitles: array_literal::decode(&row.subtitles),
            release_date: parse_date("release_date", &row.release_date)?,
            disc_type: row.disc_type,
            director: row.director,
            runtime: row.runtime,
            studio: row.studio,
            language: row.language,
            genre: row.genre,
        })
    }
}
