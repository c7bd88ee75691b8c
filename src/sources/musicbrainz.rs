//! MusicBrainz release searches (`CDs.json` and `LPs.json`, array `releases`).

use rand::Rng;
use serde_json::Value;

use super::{product_row, str_or, ItemContext};
use crate::catalog::{MediaType, MusicDetailsRow, ProductRow};
use crate::normalization::{array_literal, date};
use crate::sources::open_library::UNKNOWN_TITLE;
use crate::synth::CommerceFields;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_LABEL: &str = "Unknown Label";
pub const DEFAULT_TRACK_COUNT: u64 = 10;
pub const GENRE: &str = "Rock";

fn artist(item: &Value) -> &str {
    item.get("artist-credit")
        .and_then(|v| v.as_array())
        .and_then(|credits| credits.first())
        .and_then(|c| c.get("name"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_ARTIST)
}

fn label(item: &Value) -> &str {
    item.get("label-info")
        .and_then(|v| v.as_array())
        .and_then(|infos| infos.first())
        .and_then(|info| info.get("label"))
        .and_then(|l| l.get("name"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_LABEL)
}

/// Placeholder track names, "Track 1" through "Track N".
fn tracklist(item: &Value) -> Vec<String> {
    let count = item
        .get("track-count")
        .and_then(|v| v.as_u64())
        .unwrap_or(DEFAULT_TRACK_COUNT);
    (1..=count).map(|n| format!("Track {n}")).collect()
}

/// `media` is [`MediaType::Cd`] or [`MediaType::LpRecord`]; both share the layout.
pub fn to_rows<R: Rng + ?Sized>(
    media: MediaType,
    item: &Value,
    ctx: &mut ItemContext<'_, R>,
) -> (ProductRow, MusicDetailsRow) {
    let title = str_or(item, "title", UNKNOWN_TITLE).to_string();
    let source_barcode = item.get("barcode").and_then(|v| v.as_str());
    let release_date = item.get("date").and_then(|v| v.as_str());

    let fields = CommerceFields::draw(ctx.rng, ctx.today, source_barcode);
    let details = MusicDetailsRow {
        product_id: ctx.row_index,
        artists: array_literal::encode(&[artist(item)]),
        record_label: label(item).to_string(),
        tracklist: array_literal::encode(&tracklist(item)),
        genre: GENRE.to_string(),
        release_date: date::normalize_partial_date(release_date),
    };

    (product_row(media, ctx.row_index, title, fields), details)
}
