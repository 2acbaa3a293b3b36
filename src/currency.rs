//! Static currency exchange table.
//!
//! A fixed mapping from lowercase three-letter code to conversion factor
//! into the canonical unit (USD). Absent codes cause the listing that
//! references them to be rejected.

use rustc_hash::FxHashMap;

/// The built-in table, representative of a real retail feed.
const BUILTIN: &[(&str, f64)] = &[
    ("usd", 1.0),
    ("eur", 1.30781),
    ("gbp", 1.58827),
    ("cad", 1.00209),
    ("aud", 1.03697),
    ("jpy", 0.0123550),
    ("chf", 1.08817),
    ("nzd", 0.826091),
];

/// Lowercase three-letter currency code → conversion factor into the
/// canonical unit.
#[derive(Debug, Clone)]
pub struct CurrencyTable(FxHashMap<String, f64>);

impl Default for CurrencyTable {
    fn default() -> Self {
        Self(BUILTIN.iter().map(|(c, r)| (c.to_string(), *r)).collect())
    }
}

impl CurrencyTable {
    /// Merge in (or override) additional codes, e.g. from a config file.
    pub fn extend(&mut self, overrides: impl IntoIterator<Item = (String, f64)>) {
        self.0.extend(overrides);
    }

    /// Look up the conversion rate for a lowercase three-letter code.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_is_identity() {
        assert_eq!(CurrencyTable::default().rate("usd"), Some(1.0));
    }

    #[test]
    fn unknown_code_is_absent() {
        assert_eq!(CurrencyTable::default().rate("xxx"), None);
    }

    #[test]
    fn extend_overrides_builtin() {
        let mut table = CurrencyTable::default();
        table.extend([("usd".to_string(), 0.5)]);
        assert_eq!(table.rate("usd"), Some(0.5));
    }
}
