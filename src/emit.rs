//! Final output: group retained listings under their matched product and
//! serialize one record per product with at least one assignment.

use serde::Serialize;

use crate::listing::{ListingTable, PriceValue};
use crate::product::ProductTable;

/// One listing as it appears nested under its matched product in the
/// output stream, using original (unnormalized) fields throughout. `price`
/// serializes as whichever JSON type the input record used — a bare number
/// stays a number, a numeric string stays a string.
#[derive(Debug, Clone, Serialize)]
pub struct EmittedListing {
    pub title: String,
    pub manufacturer: String,
    pub currency: String,
    pub price: PriceValue,
}

/// One output record: a product and the listings resolved to it.
#[derive(Debug, Clone, Serialize)]
pub struct EmittedMatch {
    pub product_name: String,
    pub listings: Vec<EmittedListing>,
}

/// Build the output records: one per product with at least one assigned
/// listing, products ordered by `(manufacturer_key, name)`, listings within
/// a product ordered by their original title.
pub fn build(products: &ProductTable, listings: &ListingTable) -> Vec<EmittedMatch> {
    let mut product_ids: Vec<_> = products
        .ids()
        .filter(|&id| !products.get(id).assigned_listings.is_empty())
        .collect();

    product_ids.sort_by(|&a, &b| {
        let pa = products.get(a);
        let pb = products.get(b);
        pa.manufacturer_key
            .cmp(&pb.manufacturer_key)
            .then_with(|| pa.name.cmp(&pb.name))
    });

    product_ids
        .into_iter()
        .map(|pid| {
            let product = products.get(pid);
            let mut emitted_listings: Vec<EmittedListing> = product
                .assigned_listings
                .iter()
                .map(|&lid| {
                    let listing = listings.get(lid);
                    EmittedListing {
                        title: listing.orig_title.clone(),
                        manufacturer: listing.orig_manufacturer.clone(),
                        currency: listing.orig_currency.clone(),
                        price: listing.orig_price.clone(),
                    }
                })
                .collect();
            emitted_listings.sort_by(|a, b| a.title.cmp(&b.title));

            EmittedMatch {
                product_name: product.orig_name.clone(),
                listings: emitted_listings,
            }
        })
        .collect()
}
