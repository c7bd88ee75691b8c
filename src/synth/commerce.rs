//! Random commerce fields the sources never carry.
//!
//! Every draw takes the random source explicitly so a seeded `StdRng` gives
//! reproducible files.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

pub const BARCODE_LEN: usize = 13;
pub const BASE_VALUE_RANGE: std::ops::Range<f64> = 10_000.0..500_000.0;
pub const PRICE_FACTOR_MIN: f64 = 0.3;
pub const PRICE_FACTOR_MAX: f64 = 1.5;
/// Current prices are rounded to this many currency units (VND).
pub const PRICE_STEP: f64 = 10_000.0;

const COVER_TYPES: [&str; 2] = ["PAPERBACK", "HARDCOVER"];
const DISC_TYPES: [&str; 3] = ["BLU_RAY", "HD_DVD", "STANDARD"];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn barcode<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..BARCODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Reuse a source barcode unless it is missing or blank.
pub fn barcode_or_generate<R: Rng + ?Sized>(rng: &mut R, source: Option<&str>) -> String {
    match source.map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => barcode(rng),
    }
}

pub fn base_value<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round2(rng.gen_range(BASE_VALUE_RANGE))
}

pub fn price_factor<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(PRICE_FACTOR_MIN..=PRICE_FACTOR_MAX)
}

/// `base * factor` rounded to the nearest [`PRICE_STEP`].
///
/// Low base values can round down to 0; that is accepted as-is.
pub fn current_price(base_value: f64, factor: f64) -> f64 {
    (base_value * factor / PRICE_STEP).round() * PRICE_STEP
}

pub fn stock<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(5..=500)
}

pub fn dimensions<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}x{}x{} cm",
        rng.gen_range(10..=30),
        rng.gen_range(10..=20),
        rng.gen_range(1..=5)
    )
}

pub fn weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round2(rng.gen_range(0.2..2.0))
}

/// A day within the year before `today`.
pub fn warehouse_entry_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    today - Duration::days(rng.gen_range(1..=365))
}

pub fn cover_type<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    COVER_TYPES.choose(rng).copied().unwrap_or(COVER_TYPES[0])
}

pub fn page_count<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(100..=600)
}

pub fn disc_type<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DISC_TYPES.choose(rng).copied().unwrap_or(DISC_TYPES[2])
}

/// Runtime in minutes.
pub fn runtime<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(90..=180)
}

/// The full set of synthesized fields for one product.
#[derive(Clone, Debug, PartialEq)]
pub struct CommerceFields {
    pub barcode: String,
    pub base_value: f64,
    pub current_price: f64,
    pub stock: i32,
    pub dimensions: String,
    pub weight: f64,
    pub warehouse_entry_date: NaiveDate,
}

impl CommerceFields {
    pub fn draw<R: Rng + ?Sized>(
        rng: &mut R,
        today: NaiveDate,
        source_barcode: Option<&str>,
    ) -> Self {
        let base_value = base_value(rng);
        let factor = price_factor(rng);
        Self {
            barcode: barcode_or_generate(rng, source_barcode),
            base_value,
            current_price: current_price(base_value, factor),
            stock: stock(rng),
            dimensions: dimensions(rng),
            weight: weight(rng),
            warehouse_entry_date: warehouse_entry_date(rng, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn barcode_is_thirteen_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = barcode(&mut rng);
            assert_eq!(code.len(), BARCODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn source_barcode_is_reused_unless_blank() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            barcode_or_generate(&mut rng, Some("0602527347451")),
            "0602527347451"
        );
        assert_eq!(barcode_or_generate(&mut rng, Some("   ")).len(), BARCODE_LEN);
        assert_eq!(barcode_or_generate(&mut rng, None).len(), BARCODE_LEN);
    }

    #[test]
    fn current_price_is_a_rounded_multiple_within_factor_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let base = base_value(&mut rng);
            let factor = price_factor(&mut rng);
            let unrounded = base * factor;
            assert!(unrounded >= PRICE_FACTOR_MIN * base && unrounded <= PRICE_FACTOR_MAX * base);

            let price = current_price(base, factor);
            assert!(price >= 0.0);
            assert_eq!(price % PRICE_STEP, 0.0);
            assert!((price - unrounded).abs() <= PRICE_STEP / 2.0);
        }
    }

    #[test]
    fn low_base_values_may_round_to_zero() {
        assert_eq!(current_price(10_000.0, 0.3), 0.0);
        assert_eq!(current_price(200_000.0, 1.0), 200_000.0);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let fields = CommerceFields::draw(&mut rng, today(), None);
            assert!(BASE_VALUE_RANGE.contains(&fields.base_value) || fields.base_value == 500_000.0);
            assert!((5..=500).contains(&fields.stock));
            assert!((0.2..=2.0).contains(&fields.weight));
            assert!(fields.dimensions.ends_with(" cm"));

            let age = today() - fields.warehouse_entry_date;
            assert!((1..=365).contains(&age.num_days()));
        }
    }

    #[test]
    fn same_seed_same_fields() {
        let a = CommerceFields::draw(&mut StdRng::seed_from_u64(99), today(), None);
        let b = CommerceFields::draw(&mut StdRng::seed_from_u64(99), today(), None);
        assert_eq!(a, b);
    }
}
