//! Readers for the external catalog dumps.
//!
//! Each provider module maps one raw JSON item into a product row plus its
//! details row. Field access is lenient: anything missing or of the wrong type
//! falls back to a default and never fails the item.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde_json::Value;

use crate::catalog::{MediaType, ProductRow, MAX_ITEMS_PER_TYPE};
use crate::synth::CommerceFields;

pub mod musicbrainz;
pub mod open_library;
pub mod tmdb;

/// Read `path` and return at most [`MAX_ITEMS_PER_TYPE`] items of the array
/// stored under `key`.
pub fn load_items(path: &Path, key: &str) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    items_under(&doc, key).with_context(|| format!("in {}", path.display()))
}

fn items_under(doc: &Value, key: &str) -> Result<Vec<Value>> {
    let items = doc
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("missing array `{key}`"))?;
    Ok(items.iter().take(MAX_ITEMS_PER_TYPE).cloned().collect())
}

/// Products and their details for one media type, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<D> {
    pub media: MediaType,
    pub products: Vec<ProductRow>,
    pub details: Vec<D>,
}

/// Everything a provider mapper needs besides the item itself.
pub struct ItemContext<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub today: NaiveDate,
    /// 1-based position, shared by the product and its details row.
    pub row_index: u32,
}

/// Map every item with `to_rows`, numbering rows from 1.
pub fn build_batch<D, R, F>(
    media: MediaType,
    items: &[Value],
    rng: &mut R,
    today: NaiveDate,
    mut to_rows: F,
) -> Batch<D>
where
    R: Rng + ?Sized,
    F: FnMut(&Value, &mut ItemContext<'_, R>) -> (ProductRow, D),
{
    let mut products = Vec::with_capacity(items.len());
    let mut details = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let mut ctx = ItemContext {
            rng: &mut *rng,
            today,
            row_index: i as u32 + 1,
        };
        let (product, detail) = to_rows(item, &mut ctx);
        products.push(product);
        details.push(detail);
    }
    Batch {
        media,
        products,
        details,
    }
}

pub(crate) fn product_row(
    media: MediaType,
    row_index: u32,
    title: String,
    commerce: CommerceFields,
) -> ProductRow {
    ProductRow {
        row_index: Some(row_index),
        title,
        barcode: commerce.barcode,
        base_value: commerce.base_value,
        current_price: commerce.current_price,
        stock: commerce.stock,
        media_type: media,
        product_description: media.product_description().to_string(),
        dimensions: commerce.dimensions,
        weight: commerce.weight,
        warehouse_entry_date: commerce.warehouse_entry_date.format("%Y-%m-%d").to_string(),
    }
}

/// Non-empty string at `key`, or `default`.
pub(crate) fn str_or<'a>(item: &'a Value, key: &str, default: &'a str) -> &'a str {
    item.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
}

/// First element of the array at `key`, when it is a non-empty string.
pub(crate) fn first_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}
