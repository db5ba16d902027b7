//! Case-insensitive name comparisons shared by every name-keyed lookup.
//!
//! Map names and path endpoints are compared ordinally after Unicode case
//! folding, so "Paris" and "paris" always address the same entity.

/// Returns `true` when `a` and `b` are equal ignoring case.
pub fn equals(a: &str, b: &str) -> bool {
    fold_chars(a).eq(fold_chars(b))
}

/// Returns `true` when `haystack` contains `needle` ignoring case. An empty
/// needle is contained in every haystack.
pub fn contains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fold(haystack).contains(&fold(needle))
}

/// Lower-cased form of `name`, used as the hashing key so `Hash` agrees with
/// [`equals`]. Lowers one char at a time; `str::to_lowercase` would apply the
/// final-sigma rule and disagree with `equals`.
pub fn fold(name: &str) -> String {
    fold_chars(name).collect()
}

fn fold_chars(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_case() {
        assert!(equals("Paris", "paris"));
        assert!(equals("GATE a", "gate A"));
        assert!(!equals("Paris", "Pari"));
        assert!(equals("", ""));
    }

    #[test]
    fn containment_is_unanchored() {
        assert!(contains("Gate A", "ate"));
        assert!(contains("Rome", "RO"));
        assert!(!contains("Rome", "paris"));
        assert!(contains("anything", ""));
    }

    #[test]
    fn folding_agrees_with_equality() {
        assert_eq!(fold("Città"), fold("CITTÀ"));
        assert!(equals("Città", "CITTÀ"));
    }

    #[test]
    fn final_sigma_folds_like_any_other_sigma() {
        assert!(equals("ΟΔΟΣ", "οδοσ"));
        assert_eq!(fold("ΟΔΟΣ"), fold("οδοσ"));
        assert!(contains("ΟΔΟΣ", "οσ"));
        assert!(contains("οδοσ", "ΔΟΣ"));
    }
}
