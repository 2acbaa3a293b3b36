//! Text normalization and tokenization.
//!
//! Turns noisy free text (product names, listing titles) into a comparable,
//! deterministic [`TokenSet`]. Every other component — candidate generation,
//! matching predicates, the price model's input set — operates on the
//! output of this module, never on raw strings.

use std::fmt;

/// Characters that separate words inside a manufacturer/title string.
pub const SEPARATOR_CHARS: &str = ",._-:/\\|";

/// Characters `tokenize` further splits whitespace-delimited pieces on.
const TOKEN_SPLIT_CHARS: &str = "-:_|()";

const STOPWORDS: &[&str] = &["", "-", ":", "_", "|", "(", ")", "with", "and", "&"];

/// Ordered, literal substring replacements applied left-to-right.
///
/// Later rules see the output of earlier ones. Preserved verbatim from the
/// original program, including the two near-duplicate entries: `" mpix"`
/// has a leading space and replaces to an identical-content string (a
/// vestige with near-null effect), and `"mpix"`/`"Mpix"` swap back and
/// forth — harmless since this table runs on already-lowercased text.
const SYNONYMS: &[(&str, &str)] = &[
    ("mega pixels", "mpix"),
    ("mega-pixels", "mpix"),
    ("megapixels", "mpix"),
    ("mega pixel", "mpix"),
    ("mega-pixel", "mpix"),
    ("megapixel", "mpix"),
    ("mega pix", "mpix"),
    ("mega-pix", "mpix"),
    ("megapix", "mpix"),
    ("Mpixels", "mpix"),
    ("mpix", "Mpix"),
    ("mp", "mpix"),
    ("Mpix", "mpix"),
    (" mpix", "mpix"),
    ("w/", "with "),
];

/// A non-empty, lowercase, whitespace-free, separator-free string.
///
/// Tokens are immutable once produced; the only way to get one is through
/// [`tokenize`].
pub type Token = String;

/// The sorted, deduplicated token set of a text (or tuple of texts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(Vec<Token>);

impl TokenSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.binary_search_by(|t| t.as_str().cmp(token)).is_ok()
    }

    /// Total character length of the concatenated tokens — used by the
    /// resolver's Pass B tie-break.
    pub fn total_chars(&self) -> usize {
        self.0.iter().map(|t| t.chars().count()).sum()
    }

    fn from_unsorted(mut tokens: Vec<Token>) -> Self {
        tokens.sort_unstable();
        tokens.dedup();
        Self(tokens)
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Lowercase, then trim leading/trailing whitespace. No other change.
pub fn normalize(s: &str) -> String {
    s.to_lowercase().trim().to_string()
}

/// Replace each character of [`SEPARATOR_CHARS`] with a space, then remove
/// *all* whitespace — producing a concatenation of the separator-split
/// pieces, not a space-joined one. This is the source of the manufacturer
/// bucket-key quirk: `"canon, inc."` and `"canon inc"` fold to the same
/// key, but so does the unrelated `"can on"`.
pub fn strip_separators(s: &str) -> String {
    let spaced: String = s
        .chars()
        .map(|c| if SEPARATOR_CHARS.contains(c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().concat()
}

/// Apply the fixed synonym table, in order, as literal substring
/// replacements.
pub fn synonym_rewrite(s: &str) -> String {
    let mut out = s.to_string();
    for (from, to) in SYNONYMS {
        out = out.replace(from, to);
    }
    out
}

/// Tokenize a set of text fields into a sorted, deduplicated [`TokenSet`].
///
/// Each field is synonym-rewritten, split on whitespace, then every
/// resulting piece is repeatedly split on each character of
/// [`TOKEN_SPLIT_CHARS`] in turn (a fold over the separator alphabet, not a
/// single split-on-any-of, matching the original's nested loop). Empties and
/// stopwords are dropped before dedup/sort.
pub fn tokenize<I, S>(fields: I) -> TokenSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pieces: Vec<String> = Vec::new();
    for field in fields {
        let rewritten = synonym_rewrite(field.as_ref());
        pieces.extend(rewritten.split_whitespace().map(str::to_string));
    }

    for sep in TOKEN_SPLIT_CHARS.chars() {
        let mut next = Vec::with_capacity(pieces.len());
        for piece in pieces {
            next.extend(piece.split(sep).map(str::to_string));
        }
        pieces = next;
    }

    let tokens = pieces
        .into_iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect();

    TokenSet::from_unsorted(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Canon EOS  "), "canon eos");
    }

    #[test]
    fn strip_separators_concatenates_split_pieces() {
        assert_eq!(strip_separators("hewlett-packard"), "hewlettpackard");
        assert_eq!(strip_separators("canon"), "canon");
        assert_eq!(strip_separators("a,b.c_d:e/f\\g|h"), "abcdefgh");
    }

    #[test]
    fn synonym_rewrite_folds_megapixel_variants() {
        for input in [
            "14.1 megapixel",
            "14.1mega-pixel",
            "14.1 mega pixels",
            "14.1mp",
        ] {
            let rewritten = synonym_rewrite(input);
            assert!(rewritten.contains("mpix"), "{input} -> {rewritten}");
        }
    }

    #[test]
    fn tokenize_sorts_dedups_and_drops_stopwords() {
        let set = tokenize(["Canon EOS Rebel T3i 18 MP", "with and &"]);
        assert!(!set.contains("with"));
        assert!(!set.contains("and"));
        assert!(!set.contains("&"));
        let tokens: Vec<_> = set.iter().cloned().collect();
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(tokens, sorted);
    }

    #[test]
    fn tokenize_splits_on_compound_separators() {
        let set = tokenize(["dmc-fx7100"]);
        assert!(set.contains("dmc"));
        assert!(set.contains("fx7100"));
    }

    #[test]
    fn tokenize_is_idempotent() {
        let set = tokenize(["14.1 Megapixel Canon-EOS(Rebel)T3i w/ kit"]);
        let joined: Vec<String> = set.iter().cloned().collect();
        let reapplied = tokenize(joined);
        assert_eq!(set, reapplied);
    }

    #[test]
    fn token_purity_no_empties_no_token_split_chars_no_stopwords() {
        let set = tokenize(["a-b:c_d|e(f)g  with and &"]);
        for t in set.iter() {
            assert!(!t.is_empty());
            assert!(!t.chars().any(|c| TOKEN_SPLIT_CHARS.contains(c)));
            assert!(!STOPWORDS.contains(&t.as_str()));
        }
    }

    #[test]
    fn tokenize_keeps_dots_inside_a_token() {
        // Dots/commas are not in the tokenize split alphabet (only -:_|()
        // are); a decimal like "14.1" must survive as a single token.
        let set = tokenize(["14.1 megapixel"]);
        assert!(set.contains("14.1"));
    }
}
