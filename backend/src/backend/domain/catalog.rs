//! Medication and vaccination catalogs, plus name normalization.
//!
//! Records carry `{name, slug}` pairs. The structured entry form selects
//! identifiers from a fixed catalog; the legacy form accepts comma-separated
//! free text, normalized here. Catalogs are read-only and loaded once per
//! process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::domain::models::record::NamedItem;

/// One selectable option: a stable identifier plus the display name shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub identifier: String,
    pub display_name: String,
}

impl CatalogEntry {
    pub fn new(identifier: &str, display_name: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Normalize free text into an identifier-safe slug: lowercase, surrounding
/// whitespace trimmed, every internal run of whitespace collapsed to a
/// single hyphen. Non-whitespace punctuation is preserved.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalize legacy comma-separated free text into `{name, slug}` pairs.
///
/// Parts are trimmed and empty parts discarded, so trailing commas produce
/// no entries. Order is preserved and duplicates are kept; deduplication is
/// the caller's responsibility if it needs uniqueness.
pub fn normalize_free_text(input: &str) -> Vec<NamedItem> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| NamedItem {
            name: part.to_string(),
            slug: slugify(part),
        })
        .collect()
}

/// An ordered, read-only list of selectable options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    label: &'static str,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(label: &'static str, entries: Vec<CatalogEntry>) -> Self {
        Self { label, entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Resolve selected identifiers to `{name, slug}` pairs, in selection
    /// order. An identifier with no catalog match is dropped silently; the
    /// miss is logged but never fails the submission.
    pub fn resolve(&self, identifiers: &[String]) -> Vec<NamedItem> {
        identifiers
            .iter()
            .filter_map(|identifier| {
                match self.entries.iter().find(|e| &e.identifier == identifier) {
                    Some(entry) => Some(NamedItem {
                        name: entry.display_name.clone(),
                        slug: entry.identifier.clone(),
                    }),
                    None => {
                        warn!(
                            "Unknown {} identifier '{}' dropped from selection",
                            self.label, identifier
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// The two catalogs the record forms select from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    pub medications: Catalog,
    pub vaccinations: Catalog,
}

impl Catalogs {
    pub fn new(medications: Vec<CatalogEntry>, vaccinations: Vec<CatalogEntry>) -> Self {
        Self {
            medications: Catalog::new("medication", medications),
            vaccinations: Catalog::new("vaccination", vaccinations),
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::new(DEFAULT_MEDICATIONS.clone(), DEFAULT_VACCINATIONS.clone())
    }
}

static DEFAULT_MEDICATIONS: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    vec![
        CatalogEntry::new("puretubig", "PureTubig"),
        CatalogEntry::new("moremeta-multivitamins", "MoreMeta Multivitamins"),
    ]
});

static DEFAULT_VACCINATIONS: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    vec![
        CatalogEntry::new("ma5clone30", "Ma5+clone30"),
        CatalogEntry::new("gumboro-228e", "Gumboro 228E"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("MoreMeta Multivitamins"), "moremeta-multivitamins");
        assert_eq!(slugify("  PureTubig  "), "puretubig");
        assert_eq!(slugify("a  b\t c"), "a-b-c");
    }

    #[test]
    fn test_slugify_preserves_punctuation() {
        assert_eq!(slugify("Ma5+clone30"), "ma5+clone30");
        assert_eq!(slugify("Gumboro 228E"), "gumboro-228e");
    }

    #[test]
    fn test_normalize_free_text_trims_and_drops_empties() {
        let items = normalize_free_text("PureTubig, VitaBoost ");
        assert_eq!(
            items,
            vec![
                NamedItem {
                    name: "PureTubig".to_string(),
                    slug: "puretubig".to_string(),
                },
                NamedItem {
                    name: "VitaBoost".to_string(),
                    slug: "vitaboost".to_string(),
                },
            ]
        );

        assert!(normalize_free_text("").is_empty());
        assert!(normalize_free_text(" , ,").is_empty());
    }

    #[test]
    fn test_normalize_free_text_single_item_with_punctuation() {
        let items = normalize_free_text("Ma5+clone30");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ma5+clone30");
        assert_eq!(items[0].slug, "ma5+clone30");
    }

    #[test]
    fn test_normalize_free_text_keeps_order_and_duplicates() {
        let items = normalize_free_text("B, A, B");
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_catalog_resolve_in_selection_order() {
        let catalogs = Catalogs::default();
        let items = catalogs.medications.resolve(&[
            "moremeta-multivitamins".to_string(),
            "puretubig".to_string(),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "MoreMeta Multivitamins");
        assert_eq!(items[1].slug, "puretubig");
    }

    #[test]
    fn test_catalog_resolve_drops_unknown_identifiers() {
        let catalogs = Catalogs::default();
        let items = catalogs
            .vaccinations
            .resolve(&["ma5clone30".to_string(), "no-such-vaccine".to_string()]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ma5+clone30");
    }
}
