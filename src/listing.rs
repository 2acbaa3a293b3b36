//! Retailer listing ingestion: currency conversion, title normalization,
//! and manufacturer gating against the product catalog.

use serde::{Deserialize, Serialize};

use crate::currency::CurrencyTable;
use crate::normalize::{self, SEPARATOR_CHARS, TokenSet};
use crate::product::ProductId;

/// Stable index into a [`ListingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(pub u32);

/// One line of the listings input file. `price` may arrive as a JSON number
/// or a numeric string; both deserialize into [`PriceValue`].
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub manufacturer: String,
    pub currency: String,
    pub price: PriceValue,
}

/// A listing price as it appeared in the input record, before currency
/// conversion — a JSON number or a numeric string, parsed as a real either
/// way. Round-trips to emission as whichever JSON type it was read as,
/// rather than being coerced into a single fixed representation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    fn as_f64(&self) -> Result<f64, std::num::ParseFloatError> {
        match self {
            PriceValue::Number(n) => Ok(*n),
            PriceValue::Text(s) => s.trim().parse(),
        }
    }
}

/// A retailer listing, normalized for matching but retaining its original
/// fields (and converted price) for emission.
#[derive(Debug, Clone)]
pub struct Listing {
    pub manufacturer_raw: String,
    pub title: String,
    pub currency: String,
    pub price: f64,
    pub tokens: TokenSet,
    pub candidate_products: Vec<ProductId>,

    pub orig_title: String,
    pub orig_manufacturer: String,
    pub orig_currency: String,
    pub orig_price: PriceValue,
}

impl Listing {
    /// Separator-stripped, concatenated manufacturer field — the probe used
    /// to test whether a catalog manufacturer key occurs as a substring
    /// (both at ingestion gating and in Pass A candidate generation). Run
    /// through the same `normalize` + `strip_separators` pipeline as the
    /// catalog's manufacturer keys, so a multi-word manufacturer like
    /// "Hewlett-Packard" or "LG Electronics" compares in the same folded
    /// form on both sides instead of failing to match at all.
    pub fn manufacturer_probe(&self) -> String {
        normalize::strip_separators(&normalize::normalize(&self.manufacturer_raw))
    }
}

/// Why a listing record was rejected during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    UnknownCurrency,
    NoManufacturerMatch,
}

impl Listing {
    fn from_record(
        record: ListingRecord,
        currencies: &CurrencyTable,
    ) -> Result<Self, RejectReason> {
        let currency = normalize::normalize(&record.currency);
        let rate = currencies.rate(&currency).ok_or(RejectReason::UnknownCurrency)?;
        let raw_price = record
            .price
            .as_f64()
            .map_err(|_| RejectReason::UnknownCurrency)?;
        let price = rate * raw_price;

        let title_norm = normalize::normalize(&record.title);
        let manufacturer_norm = normalize::normalize(&record.manufacturer);
        let mut title = title_norm.replace(&manufacturer_norm, "");

        let manufacturer_key_ish = normalize::strip_separators(&manufacturer_norm);
        for word in manufacturer_key_ish.split_whitespace() {
            title = title.replace(word, "");
        }
        // Listing trims trailing whitespace too, unlike Product::name.
        let title = title
            .trim_matches(|c: char| SEPARATOR_CHARS.contains(c) || c == ' ')
            .to_string();
        let title = normalize::synonym_rewrite(&title);

        let title_no_dashes = title.replace('-', "");
        let tokens = normalize::tokenize([title.as_str(), title_no_dashes.as_str()]);

        Ok(Self {
            manufacturer_raw: record.manufacturer.clone(),
            title,
            currency,
            price,
            tokens,
            candidate_products: Vec::new(),
            orig_title: record.title,
            orig_manufacturer: record.manufacturer,
            orig_currency: record.currency,
            orig_price: record.price,
        })
    }
}

/// Listings, gated on having at least one known catalog manufacturer as a
/// substring of their raw manufacturer field.
#[derive(Debug, Default)]
pub struct ListingTable {
    listings: Vec<Listing>,
}

impl ListingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a record: convert currency, normalize the title, and retain it
    /// only if some catalog manufacturer key is a substring of the raw
    /// manufacturer field.
    pub fn ingest(
        &mut self,
        record: ListingRecord,
        currencies: &CurrencyTable,
        known_manufacturers: impl Iterator<Item = impl AsRef<str>>,
    ) -> Result<ListingId, RejectReason> {
        let listing = Listing::from_record(record, currencies)?;

        // Folded the same way the catalog's manufacturer keys are, so e.g.
        // "Hewlett-Packard" and "LG Electronics" compare against "hewlett
        // packard" / "lg electronics" in their concatenated form rather
        // than failing to match because of a leftover space or hyphen.
        let manufacturer_folded = listing.manufacturer_probe();
        let has_known_manufacturer = known_manufacturers
            .into_iter()
            .any(|m| manufacturer_folded.contains(m.as_ref()));

        if !has_known_manufacturer {
            return Err(RejectReason::NoManufacturerMatch);
        }

        let id = ListingId(self.listings.len() as u32);
        self.listings.push(listing);
        Ok(id)
    }

    pub fn get(&self, id: ListingId) -> &Listing {
        &self.listings[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ListingId) -> &mut Listing {
        &mut self.listings[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ListingId> {
        (0..self.listings.len() as u32).map(ListingId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, manufacturer: &str, currency: &str, price: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_string(),
            manufacturer: manufacturer.to_string(),
            currency: currency.to_string(),
            price: PriceValue::Text(price.to_string()),
        }
    }

    #[test]
    fn converts_price_by_currency_rate() {
        let currencies = CurrencyTable::default();
        let mut table = ListingTable::new();
        let id = table
            .ingest(
                record("Canon EOS Rebel T3i 18 MP", "Canon Canada", "cad", "599.00"),
                &currencies,
                ["canon"].into_iter(),
            )
            .unwrap();
        let listing = table.get(id);
        assert!((listing.price - 1.00209 * 599.00).abs() < 1e-6);
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let currencies = CurrencyTable::default();
        let mut table = ListingTable::new();
        let err = table
            .ingest(
                record("Canon EOS", "Canon", "btc", "599.00"),
                &currencies,
                ["canon"].into_iter(),
            )
            .unwrap_err();
        assert_eq!(err, RejectReason::UnknownCurrency);
    }

    #[test]
    fn unmatched_manufacturer_is_rejected() {
        let currencies = CurrencyTable::default();
        let mut table = ListingTable::new();
        let err = table
            .ingest(
                record("Some Gadget", "Acme Corp", "usd", "10.00"),
                &currencies,
                ["canon", "nikon"].into_iter(),
            )
            .unwrap_err();
        assert_eq!(err, RejectReason::NoManufacturerMatch);
    }

    #[test]
    fn multi_word_manufacturer_is_gated_in_its_concatenated_form() {
        let currencies = CurrencyTable::default();
        let mut table = ListingTable::new();
        // The catalog key for "LG Electronics" is the concatenated
        // "lgelectronics"; the probe must fold the same way or this
        // listing would be rejected despite being a genuine LG product.
        let id = table
            .ingest(
                record("27-inch 4K Monitor", "LG Electronics", "usd", "400"),
                &currencies,
                ["lgelectronics"].into_iter(),
            )
            .unwrap();
        assert!(table.get(id).manufacturer_raw == "LG Electronics");
    }

    #[test]
    fn strips_manufacturer_words_from_title() {
        let currencies = CurrencyTable::default();
        let mut table = ListingTable::new();
        let id = table
            .ingest(
                record("Canon EOS Rebel T3i", "Canon", "usd", "500"),
                &currencies,
                ["canon"].into_iter(),
            )
            .unwrap();
        assert!(!table.get(id).title.contains("canon"));
    }
}
