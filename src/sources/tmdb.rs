//! TMDB movie discovery results (`DVDs.json`, array `results`).

use rand::Rng;
use serde_json::Value;

use super::{product_row, str_or, ItemContext};
use crate::catalog::{DvdDetailsRow, MediaType, ProductRow};
use crate::normalization::genre::GenreMapper;
use crate::normalization::{array_literal, date};
use crate::sources::open_library::{DEFAULT_LANGUAGE, UNKNOWN_TITLE};
use crate::synth::{commerce, CommerceFields};

pub const DIRECTOR: &str = "Various Directors";
pub const STUDIO: &str = "TMDB Studios";
pub const SUBTITLES: [&str; 3] = ["eng", "fra", "spa"];

fn genre_ids(item: &Value) -> Vec<i64> {
    item.get("genre_ids")
        .and_then(|v| v.as_array())
        .map(|ids| ids.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default()
}

pub fn to_rows<R: Rng + ?Sized>(
    genres: &GenreMapper,
    item: &Value,
    ctx: &mut ItemContext<'_, R>,
) -> (ProductRow, DvdDetailsRow) {
    let title = str_or(item, "title", UNKNOWN_TITLE).to_string();
    let release_date = item.get("release_date").and_then(|v| v.as_str());

    let fields = CommerceFields::draw(ctx.rng, ctx.today, None);
    let details = DvdDetailsRow {
        product_id: ctx.row_index,
        disc_type: commerce::disc_type(ctx.rng).to_string(),
        director: DIRECTOR.to_string(),
        runtime: commerce::runtime(ctx.rng),
        studio: STUDIO.to_string(),
        language: str_or(item, "original_language", DEFAULT_LANGUAGE).to_string(),
        subtitles: array_literal::encode(&SUBTITLES),
        release_date: date::normalize_partial_date(release_date),
        genre: genres.primary(&genre_ids(item)),
    };

    (
        product_row(MediaType::Dvd, ctx.row_index, title, fields),
        details,
    )
}
