//! Search-box helpers built on top of the name filters of [`crate::Map`] and
//! [`crate::MapRegistry`].

use serde::Serialize;

use crate::names;

/// Result of a type-ahead search over names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Distinct matching names in catalogue order, capped by the caller's
    /// limit.
    pub entries: Vec<String>,
    /// `true` when the typed text is non-empty and does not name an existing
    /// entry, so the UI should offer to create it.
    pub offer_create: bool,
}

/// What the indications panel should offer once both endpoints are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteAction {
    ShowIndications,
    CreatePath,
}

/// Builds [`Suggestions`] from names that already passed a containment
/// filter. Duplicates are dropped case-insensitively, keeping the first
/// spelling seen.
pub(crate) fn suggest<'a, I>(candidates: I, typed: &str, limit: usize) -> Suggestions
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<&str> = Vec::new();
    for candidate in candidates {
        if !distinct.iter().any(|seen| names::equals(seen, candidate)) {
            distinct.push(candidate);
        }
    }

    let offer_create =
        !typed.is_empty() && !distinct.iter().any(|name| names::equals(name, typed));

    Suggestions {
        entries: distinct
            .into_iter()
            .take(limit)
            .map(str::to_string)
            .collect(),
        offer_create,
    }
}
