//! Open Library search results (`Books.json`, array `docs`).

use rand::Rng;
use serde_json::Value;

use super::{first_str, product_row, str_or, ItemContext};
use crate::catalog::{BookDetailsRow, MediaType, ProductRow};
use crate::normalization::{array_literal, date};
use crate::synth::{commerce, CommerceFields};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_LANGUAGE: &str = "eng";
pub const PUBLISHER: &str = "Open Library Press";
pub const GENRE: &str = "Fiction";

pub fn to_rows<R: Rng + ?Sized>(
    item: &Value,
    ctx: &mut ItemContext<'_, R>,
) -> (ProductRow, BookDetailsRow) {
    let title = str_or(item, "title", UNKNOWN_TITLE).to_string();
    let author = first_str(item, "author_name").unwrap_or(UNKNOWN_AUTHOR);
    let language = first_str(item, "language").unwrap_or(DEFAULT_LANGUAGE);
    let year = item.get("first_publish_year").and_then(|v| v.as_i64());

    let fields = CommerceFields::draw(ctx.rng, ctx.today, None);
    let details = BookDetailsRow {
        product_id: ctx.row_index,
        authors: array_literal::encode(&[author]),
        cover_type: commerce::cover_type(ctx.rng).to_string(),
        publisher: PUBLISHER.to_string(),
        publication_date: date::normalize_year(year),
        pages: commerce::page_count(ctx.rng),
        language: language.to_string(),
        genre: GENRE.to_string(),
    };

    (
        product_row(MediaType::Book, ctx.row_index, title, fields),
        details,
    )
}
