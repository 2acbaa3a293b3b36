//! Entity-resolution pipeline matching third-party retailer listings to a
//! canonical product catalog.
//!
//! Each listing is normalized, tokenized, and matched against catalog
//! products sharing a manufacturer bucket; ambiguous candidates are
//! disambiguated and outliers pruned using a statistical price model.
//!
//! # Pipeline
//!
//! ```text
//! Products/Listings (JSONL) → normalize + tokenize → Pass A (unique match)
//!   → Pass B (price-coherent disambiguation) → Pass C (outlier pruning)
//!   → emit
//! ```

pub mod config;
pub mod currency;
pub mod diagnostics;
pub mod emit;
pub mod io;
pub mod listing;
pub mod matching;
pub mod normalize;
pub mod price;
pub mod product;
pub mod resolver;

use std::path::Path;

use diagnostics::MatchError;
use emit::EmittedMatch;
use listing::ListingTable;
use product::ProductTable;
use resolver::MatchContext;

/// Crate version, as reported by `listing-matcher --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the full pipeline against a products file and a listings file,
/// returning the emitted matches.
///
/// Individually malformed or rejected records are logged and skipped; only
/// I/O failure opening or reading either file is fatal.
pub fn resolve(
    products_path: &Path,
    listings_path: &Path,
    config: &config::ResolvedConfig,
) -> Result<Vec<EmittedMatch>, MatchError> {
    resolve_with_trace(products_path, listings_path, config).map(|(matches, _)| matches)
}

/// Run the full pipeline and return both the emitted matches and the
/// resolver's per-listing decision trace, for `--debug` output.
pub fn resolve_with_trace(
    products_path: &Path,
    listings_path: &Path,
    config: &config::ResolvedConfig,
) -> Result<(Vec<EmittedMatch>, Vec<resolver::DecisionLog>), MatchError> {
    let mut products = ProductTable::new();
    io::load_products(products_path, &mut products)?;

    let known_manufacturers: Vec<String> =
        products.manufacturer_keys().map(str::to_string).collect();

    let mut listings = ListingTable::new();
    io::load_listings(
        listings_path,
        &mut listings,
        &config.currencies,
        &known_manufacturers,
    )?;

    let mut ctx = MatchContext {
        products: &mut products,
        listings: &mut listings,
    };
    let trace = resolver::resolve(&mut ctx, config.resolver);

    Ok((emit::build(&products, &listings), trace))
}
