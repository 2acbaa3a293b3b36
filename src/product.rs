//! Canonical product catalog: records, normalization, and manufacturer-keyed
//! storage with structural-duplicate rejection.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::listing::ListingId;
use crate::matching::matched;
use crate::normalize::{self, SEPARATOR_CHARS, TokenSet};
use crate::price::PriceBand;

/// Stable index into a [`ProductTable`]. Used instead of an owning
/// reference so products and listings can cross-reference each other
/// without a reference cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub u32);

/// One line of the products input file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub model: String,
    #[serde(rename = "announced-date")]
    pub announced_date: String,
    pub product_name: String,
    pub manufacturer: String,
    #[serde(default)]
    pub family: String,
}

/// A canonical catalog entry, normalized for matching but retaining its
/// original fields for emission.
#[derive(Debug, Clone)]
pub struct Product {
    pub manufacturer_key: String,
    pub model: String,
    pub family: String,
    pub name: String,
    pub announced_date: String,
    pub tokens: TokenSet,
    pub assigned_listings: Vec<ListingId>,
    pub price_band: Option<PriceBand>,

    pub orig_name: String,
    pub orig_model: String,
    pub orig_family: String,
    pub orig_manufacturer: String,
    pub orig_announced_date: String,
}

impl Product {
    fn from_record(record: ProductRecord) -> Self {
        let name_norm = normalize::normalize(&record.product_name);
        let model = normalize::normalize(&record.model);
        let announced_date = normalize::normalize(&record.announced_date);
        let family = normalize::normalize(&record.family);

        let manufacturer_norm = normalize::normalize(&record.manufacturer);
        let mut name = name_norm.replace(&manufacturer_norm, "");

        // The bucket/manufacturer key is the *separator-stripped*
        // (concatenated) manufacturer, not the plain normalized string —
        // intentional, and relied on elsewhere as the bucketing key.
        let manufacturer_key = normalize::strip_separators(&manufacturer_norm);
        for word in manufacturer_key.split_whitespace() {
            name = name.replace(word, "");
        }
        let name = name.trim_matches(|c| SEPARATOR_CHARS.contains(c)).to_string();

        let tokens = normalize::tokenize([name.as_str(), model.as_str(), family.as_str()]);

        Self {
            manufacturer_key,
            model,
            family,
            name,
            announced_date,
            tokens,
            assigned_listings: Vec::new(),
            price_band: None,
            orig_name: record.product_name,
            orig_model: record.model,
            orig_family: record.family,
            orig_manufacturer: record.manufacturer,
            orig_announced_date: record.announced_date,
        }
    }
}

/// Products indexed by manufacturer key, with structural-duplicate
/// rejection on ingest.
#[derive(Debug, Default)]
pub struct ProductTable {
    products: Vec<Product>,
    by_manufacturer: FxHashMap<String, Vec<ProductId>>,
}

impl ProductTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a product from a record and insert it, unless an existing
    /// product in the same manufacturer bucket is a structural duplicate:
    /// same `name`, or same `announced_date` with bidirectional `matched`.
    ///
    /// Returns `true` if inserted, `false` if dropped as a duplicate.
    pub fn ingest(&mut self, record: ProductRecord) -> bool {
        let candidate = Product::from_record(record);
        let bucket = self
            .by_manufacturer
            .get(&candidate.manufacturer_key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let is_duplicate = bucket.iter().any(|&id| {
            let existing = &self.products[id.0 as usize];
            existing.name == candidate.name
                || (existing.announced_date == candidate.announced_date
                    && matched(&candidate.tokens, &existing.tokens)
                    && matched(&existing.tokens, &candidate.tokens))
        });

        if is_duplicate {
            tracing::debug!(
                name = %candidate.orig_name,
                manufacturer = %candidate.manufacturer_key,
                "dropping duplicate product"
            );
            return false;
        }

        let id = ProductId(self.products.len() as u32);
        self.by_manufacturer
            .entry(candidate.manufacturer_key.clone())
            .or_default()
            .push(id);
        self.products.push(candidate);
        true
    }

    pub fn get(&self, id: ProductId) -> &Product {
        &self.products[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ProductId) -> &mut Product {
        &mut self.products[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Manufacturer keys with at least one product — the set candidate
    /// generation and listing ingestion probe against.
    pub fn manufacturer_keys(&self) -> impl Iterator<Item = &str> {
        self.by_manufacturer.keys().map(String::as_str)
    }

    pub fn ids_for_manufacturer(&self, key: &str) -> &[ProductId] {
        self.by_manufacturer
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = ProductId> {
        (0..self.products.len() as u32).map(ProductId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, model: &str, manufacturer: &str, date: &str, family: &str) -> ProductRecord {
        ProductRecord {
            model: model.to_string(),
            announced_date: date.to_string(),
            product_name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            family: family.to_string(),
        }
    }

    #[test]
    fn strips_manufacturer_from_name() {
        let mut table = ProductTable::new();
        table.ingest(record(
            "Canon_EOS_Rebel_T3i",
            "T3i",
            "Canon",
            "2011-01-01",
            "EOS",
        ));
        let p = table.get(ProductId(0));
        assert!(!p.name.contains("canon"));
    }

    #[test]
    fn same_name_is_duplicate_regardless_of_date() {
        let mut table = ProductTable::new();
        assert!(table.ingest(record("EOS T3i", "T3i", "Canon", "2011-01-01", "EOS")));
        assert!(!table.ingest(record("EOS T3i", "T3i", "Canon", "2012-06-01", "EOS")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_manufacturer_buckets_do_not_dedup_across() {
        let mut table = ProductTable::new();
        assert!(table.ingest(record("Model X", "X", "Canon", "2011-01-01", "")));
        assert!(table.ingest(record("Model X", "X", "Nikon", "2011-01-01", "")));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn same_date_and_mutual_match_is_duplicate() {
        let mut table = ProductTable::new();
        assert!(table.ingest(record("Alpha Beta", "Alpha Beta", "Sony", "2013-05-01", "")));
        assert!(!table.ingest(record("Beta Alpha", "Beta Alpha", "Sony", "2013-05-01", "")));
        assert_eq!(table.len(), 1);
    }
}
