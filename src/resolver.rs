//! The three resolver passes: unique-candidate assignment, price-coherent
//! disambiguation, and outlier pruning.
//!
//! Runs single-threaded and sequential: Pass B's per-listing price band
//! genuinely depends on the order earlier listings in the same pass were
//! assigned, so parallelizing it would change which listings end up
//! attached to which product.

use crate::listing::{ListingId, ListingTable};
use crate::matching::matched;
use crate::price;
use crate::product::{ProductId, ProductTable};

/// Width factors for Pass B (disambiguation) and Pass C (pruning).
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub disambiguate_k: f64,
    pub prune_k: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            disambiguate_k: 1.5,
            prune_k: 7.0,
        }
    }
}

/// Per-listing outcome, for the debug-mode decision trace.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    NoCandidates,
    AssignedUnique(ProductId),
    AssignedPriceCoherent(ProductId),
    AssignedTieBreak(ProductId),
    AmbiguousDropped { candidates: usize },
    PrunedAsOutlier,
    RetainedAsSimilarOutlier,
}

/// One listing's final decision, for `--debug` logging.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    pub listing: ListingId,
    pub decision: Decision,
}

/// The tables mutated in place by the resolver passes, and the running
/// decision log.
pub struct MatchContext<'a> {
    pub products: &'a mut ProductTable,
    pub listings: &'a mut ListingTable,
}

/// Run all three passes, returning a decision log (populated regardless of
/// debug mode — the caller decides whether to print it).
pub fn resolve(ctx: &mut MatchContext<'_>, config: ResolverConfig) -> Vec<DecisionLog> {
    let mut log = Vec::new();
    pass_a_unique_candidates(ctx, config.disambiguate_k, &mut log);
    pass_b_price_coherent(ctx, config.disambiguate_k, &mut log);
    pass_c_prune_outliers(ctx, config.prune_k, &mut log);
    log
}

/// Pass A: for each listing, enumerate candidate products sharing a
/// manufacturer key (probed as a substring of the listing's manufacturer
/// field) and lexically matched via [`matched`]. Attach immediately when
/// exactly one candidate survives.
fn pass_a_unique_candidates(ctx: &mut MatchContext<'_>, k: f64, log: &mut Vec<DecisionLog>) {
    for listing_id in ctx.listings.ids() {
        let probe = ctx.listings.get(listing_id).manufacturer_probe();

        let mut candidates: Vec<ProductId> = Vec::new();
        for key in ctx.products.manufacturer_keys() {
            if !probe.contains(key) {
                continue;
            }
            for &pid in ctx.products.ids_for_manufacturer(key) {
                let product = ctx.products.get(pid);
                if matched(&product.tokens, &ctx.listings.get(listing_id).tokens) {
                    candidates.push(pid);
                }
            }
        }

        let decision = if candidates.len() == 1 {
            let pid = candidates[0];
            attach(ctx, pid, listing_id, k);
            Decision::AssignedUnique(pid)
        } else if candidates.is_empty() {
            Decision::NoCandidates
        } else {
            Decision::AmbiguousDropped {
                candidates: candidates.len(),
            }
        };

        ctx.listings.get_mut(listing_id).candidate_products = candidates;
        log.push(DecisionLog {
            listing: listing_id,
            decision,
        });
    }
}

/// Pass B: for each listing that still has more than one candidate, filter
/// to those whose price is coherent with the candidate's *currently
/// assigned* listings — recomputed live, so earlier attachments within this
/// same pass affect later ones.
fn pass_b_price_coherent(ctx: &mut MatchContext<'_>, k: f64, log: &mut Vec<DecisionLog>) {
    let ambiguous: Vec<ListingId> = ctx
        .listings
        .ids()
        .filter(|&id| ctx.listings.get(id).candidate_products.len() > 1)
        .collect();

    for listing_id in ambiguous {
        let price = ctx.listings.get(listing_id).price;
        let candidates = ctx.listings.get(listing_id).candidate_products.clone();

        let coherent: Vec<ProductId> = candidates
            .iter()
            .copied()
            .filter(|&pid| {
                let product = ctx.products.get(pid);
                let prices: Vec<f64> = product
                    .assigned_listings
                    .iter()
                    .map(|&lid| ctx.listings.get(lid).price)
                    .collect();
                price::matches_price(&prices, price, k)
            })
            .collect();

        let decision = match coherent.len() {
            0 => Decision::AmbiguousDropped {
                candidates: candidates.len(),
            },
            1 => {
                let pid = coherent[0];
                attach(ctx, pid, listing_id, k);
                Decision::AssignedPriceCoherent(pid)
            }
            _ => match tie_break(ctx.products, &coherent) {
                Some(pid) => {
                    attach(ctx, pid, listing_id, k);
                    Decision::AssignedTieBreak(pid)
                }
                None => Decision::AmbiguousDropped {
                    candidates: coherent.len(),
                },
            },
        };

        log.push(DecisionLog {
            listing: listing_id,
            decision,
        });
    }
}

/// Tie-break among price-coherent candidates: maximize token-set size, then
/// within that, maximize total concatenated-token character length. Returns
/// `None` if more than one candidate remains after both cuts.
fn tie_break(products: &ProductTable, candidates: &[ProductId]) -> Option<ProductId> {
    let max_tokens = candidates
        .iter()
        .map(|&pid| products.get(pid).tokens.len())
        .max()?;
    let round1: Vec<ProductId> = candidates
        .iter()
        .copied()
        .filter(|&pid| products.get(pid).tokens.len() == max_tokens)
        .collect();

    let max_chars = round1
        .iter()
        .map(|&pid| products.get(pid).tokens.total_chars())
        .max()?;
    let round2: Vec<ProductId> = round1
        .into_iter()
        .filter(|&pid| products.get(pid).tokens.total_chars() == max_chars)
        .collect();

    if round2.len() == 1 {
        Some(round2[0])
    } else {
        None
    }
}

/// Pass C: snapshot each product's currently assigned listings, split them
/// into matched/outlier by price coherence at `k`, then retain outliers
/// that are lexically similar to a retained listing. Mutates
/// `assigned_listings` once at the end of each product's snapshot, rather
/// than replaying the original's per-listing mutate/restore dance.
fn pass_c_prune_outliers(ctx: &mut MatchContext<'_>, k: f64, log: &mut Vec<DecisionLog>) {
    for pid in ctx.products.ids() {
        let assigned = ctx.products.get(pid).assigned_listings.clone();
        let prices: Vec<f64> = assigned
            .iter()
            .map(|&lid| ctx.listings.get(lid).price)
            .collect();

        let (matched_listings, outliers): (Vec<ListingId>, Vec<ListingId>) = assigned
            .iter()
            .copied()
            .partition(|&lid| price::matches_price(&prices, ctx.listings.get(lid).price, k));

        let mut retained = matched_listings.clone();
        for &outlier in &outliers {
            let outlier_tokens = &ctx.listings.get(outlier).tokens;
            let similar = matched_listings
                .iter()
                .any(|&keep| matched(outlier_tokens, &ctx.listings.get(keep).tokens));

            if similar {
                retained.push(outlier);
                log.push(DecisionLog {
                    listing: outlier,
                    decision: Decision::RetainedAsSimilarOutlier,
                });
            } else {
                log.push(DecisionLog {
                    listing: outlier,
                    decision: Decision::PrunedAsOutlier,
                });
            }
        }

        let band = {
            let prices: Vec<f64> = retained
                .iter()
                .map(|&lid| ctx.listings.get(lid).price)
                .collect();
            price::compute_band(&prices, k)
        };
        let product = ctx.products.get_mut(pid);
        product.assigned_listings = retained;
        product.price_band = band;
    }
}

/// Attach a listing to a product and refresh the product's diagnostic
/// price band (at `k`) against its now-grown set of assigned listings.
fn attach(ctx: &mut MatchContext<'_>, pid: ProductId, listing_id: ListingId, k: f64) {
    ctx.products.get_mut(pid).assigned_listings.push(listing_id);

    let prices: Vec<f64> = ctx
        .products
        .get(pid)
        .assigned_listings
        .iter()
        .map(|&lid| ctx.listings.get(lid).price)
        .collect();
    ctx.products.get_mut(pid).price_band = price::compute_band(&prices, k);
}
