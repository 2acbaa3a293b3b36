//! Matching predicates over ordered pairs of token sets.
//!
//! The resolver uses [`matched`] exclusively. The other three are reserved
//! for diagnostics and tie-breaking extensions and are exercised here so
//! future callers can rely on them.

use crate::normalize::TokenSet;

/// `true` if every token of `a` is either present in `b`, or is one half of
/// a compound token in `b` formed by concatenating it with another token of
/// `a` on either side.
///
/// The compound-word relaxation lets a product token `"7100"` match a
/// listing token `"dmcfx7100"` when the listing also carries `"dmcfx"`.
pub fn matched(a: &TokenSet, b: &TokenSet) -> bool {
    a.iter().all(|w| {
        if b.contains(w) {
            return true;
        }
        b.iter().any(|z| {
            (z.starts_with(w.as_str()) && a.iter().any(|u| format!("{w}{u}") == *z))
                || (z.ends_with(w.as_str()) && a.iter().any(|u| format!("{u}{w}") == *z))
        })
    })
}

/// Plain containment: every token of `a` is present in `b`.
pub fn matched_strongly(a: &TokenSet, b: &TokenSet) -> bool {
    a.iter().all(|w| b.contains(w))
}

/// Every token of `a` is a prefix or suffix of some token in `b`.
pub fn matched_start_or_end(a: &TokenSet, b: &TokenSet) -> bool {
    a.iter()
        .all(|w| b.iter().any(|z| z.starts_with(w.as_str()) || z.ends_with(w.as_str())))
}

/// Every token of `a` is a substring of some token in `b`.
pub fn matched_substr(a: &TokenSet, b: &TokenSet) -> bool {
    a.iter().all(|w| b.iter().any(|z| z.contains(w.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tokenize;

    #[test]
    fn matched_is_reflexive() {
        let a = tokenize(["canon eos rebel t3i"]);
        assert!(matched(&a, &a));
    }

    #[test]
    fn strong_implies_relaxed() {
        let a = tokenize(["canon eos"]);
        let b = tokenize(["canon eos rebel t3i 18 mpix"]);
        assert!(matched_strongly(&a, &b));
        assert!(matched(&a, &b));
    }

    #[test]
    fn compound_word_relaxation_joins_two_product_tokens() {
        let product = tokenize(["dmcfx 7100"]);
        let listing = tokenize(["panasonic dmcfx7100 camera"]);
        assert!(matched(&product, &listing));
    }

    #[test]
    fn compound_word_relaxation_requires_both_halves_present() {
        // "7100" alone, without "dmcfx" in the product's own tokens, can't
        // form the compound and must fail plain containment too.
        let product = tokenize(["7100"]);
        let listing = tokenize(["panasonic dmcfx7100 camera"]);
        assert!(!matched(&product, &listing));
    }

    #[test]
    fn matched_fails_when_token_entirely_absent() {
        let a = tokenize(["nikon"]);
        let b = tokenize(["canon eos rebel"]);
        assert!(!matched(&a, &b));
    }

    #[test]
    fn matched_start_or_end_accepts_prefix_or_suffix() {
        let a = tokenize(["eos"]);
        let b = tokenize(["eosmark2"]);
        assert!(matched_start_or_end(&a, &b));
    }

    #[test]
    fn matched_substr_accepts_any_embedding() {
        let a = tokenize(["os"]);
        let b = tokenize(["eosmark2"]);
        assert!(matched_substr(&a, &b));
        assert!(!matched_start_or_end(&a, &b));
    }
}
