//! Deterministic synthetic datasets in the product/outlet layout.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::{Key, Record};

const PRODUCT_TYPES: [&str; 8] = [
    "Dairy",
    "Soft Drinks",
    "Meat",
    "Fruits and Vegetables",
    "Household",
    "Baking Goods",
    "Snack Foods",
    "Frozen Foods",
];
const FAT_CONTENT: [&str; 2] = ["Low Fat", "Regular"];
const OUTLETS: [(&str, i32, Option<&str>, &str, &str); 4] = [
    ("OUT049", 1999, Some("Medium"), "Tier 1", "Supermarket Type1"),
    ("OUT018", 2009, Some("Medium"), "Tier 3", "Supermarket Type2"),
    ("OUT010", 1998, None, "Tier 3", "Grocery Store"),
    ("OUT013", 1987, Some("High"), "Tier 3", "Supermarket Type1"),
];

/// Shape of the identifiers a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStyle {
    /// `1, 2, 3, ...`
    Numeric,
    /// `FDA00001`-style product codes.
    Code,
}

/// Seeded record generator; the same seed always yields the same rows.
pub struct DataGenerator {
    rng: ChaCha8Rng,
    ids: IdStyle,
}

impl DataGenerator {
    /// Creates a generator for the given seed and identifier style.
    pub fn new(seed: u64, ids: IdStyle) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids,
        }
    }

    /// Produces `count` records with unique identifiers in shuffled order.
    pub fn generate(&mut self, count: usize) -> Vec<Record> {
        let mut ordinals: Vec<usize> = (1..=count).collect();
        ordinals.shuffle(&mut self.rng);
        ordinals
            .into_iter()
            .map(|ordinal| self.record(ordinal))
            .collect()
    }

    fn record(&mut self, ordinal: usize) -> Record {
        let key = match self.ids {
            IdStyle::Numeric => Key::Int(ordinal as i64),
            IdStyle::Code => {
                let letter = (b'A' + (ordinal % 26) as u8) as char;
                Key::Text(format!("FD{letter}{ordinal:05}"))
            }
        };
        let product_type = PRODUCT_TYPES[self.rng.gen_range(0..PRODUCT_TYPES.len())];
        let (outlet, year, size, tier, outlet_type) =
            OUTLETS[self.rng.gen_range(0..OUTLETS.len())];
        let mrp = (self.rng.gen_range(31.0..267.0_f64) * 10_000.0).round() / 10_000.0;
        let weight = self
            .rng
            .gen_bool(0.85)
            .then(|| (self.rng.gen_range(4.5..21.5_f64) * 100.0).round() / 100.0);
        Record::new(key, product_type, mrp)
            .with_weight(weight)
            .with_fat_content(FAT_CONTENT[self.rng.gen_range(0..FAT_CONTENT.len())])
            .with_visibility((self.rng.gen_range(0.0..0.33_f64) * 1e6).round() / 1e6)
            .with_outlet_id(outlet)
            .with_establishment_year(year)
            .with_outlet_size(size.map(str::to_string))
            .with_location_type(tier)
            .with_outlet_type(outlet_type)
    }
}
