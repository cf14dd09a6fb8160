//! Landmark catalog
//!
//! Immutable mapping from display name to the identifier the verification
//! service knows the landmark by. Built once at startup and shared read-only.

use crate::error::BotError;
use crate::Result;
use serde::Serialize;
use std::collections::HashSet;

/// Built-in landmarks: (display name, identifier)
const DEFAULT_LANDMARKS: &[(&str, &str)] = &[
    ("Simferopol Cinema", "kinoteatr_simf"),
    ("Monument to Catherine II", "ekaterina_2"),
    ("Monument to Amet-khan Sultan", "pamatnik_amet_han_sultan"),
    ("Trenev Square", "scver_trenev"),
    ("Alexander Nevsky Cathedral", "sobor_alex_nevs"),
    ("Dolgorukov Obelisk", "dolgoruk_obelisk"),
    ("Vorontsov House", "dom_voronsova"),
    ("Simferopol Kenassa", "kenassa_simf"),
    ("Kebir-Jami Mosque", "mechet_kebir_dzhami"),
];

/// One selectable landmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, keeping insertion order for display.
    pub fn new<I, N, D>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .map(|(name, id)| CatalogEntry {
                name: name.into(),
                id: id.into(),
            })
            .collect();

        if entries.is_empty() {
            return Err(BotError::Catalog("catalog has no entries".to_string()));
        }

        let mut names = HashSet::with_capacity(entries.len());
        let mut ids = HashSet::with_capacity(entries.len());

        for entry in &entries {
            if !names.insert(entry.name.as_str()) {
                return Err(BotError::Catalog(format!(
                    "duplicate display name: {}",
                    entry.name
                )));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(BotError::Catalog(format!(
                    "duplicate identifier: {}",
                    entry.id
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Exact, case-sensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Display names in presentation order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The built-in landmark set, validated like any other catalog
    pub fn landmarks() -> Result<Self> {
        Self::new(DEFAULT_LANDMARKS.iter().copied())
    }
}
