//! Marketplace table and per-product link records.
//!
//! The set of marketplaces is configuration: it decides which slots every
//! [`PlatformLinks`] record carries and which spreadsheet headers feed which
//! slot during a bulk import.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::types::{PlatformKey, PlatformLabel, SiteHost, TypeConstraintError};

/// Name of the 13-slot marketplace table.
pub const EXTENDED_PRESET: &str = "extended";
/// Name of the 7-slot marketplace table.
pub const STANDARD_PRESET: &str = "standard";

/// Lower-cases `value` and keeps only letters and digits.
///
/// `"Lowe's"` becomes `"lowes"` and `"HD 1"` becomes `"hd1"`.
pub fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One outbound sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub key: PlatformKey,
    pub label: PlatformLabel,
    pub site: SiteHost,
    /// Extra header fragments accepted for this slot, lower-cased.
    pub aliases: Vec<String>,
    #[serde(skip)]
    terms: Vec<String>,
}

impl Platform {
    pub fn new<I, S>(
        key: PlatformKey,
        label: PlatformLabel,
        site: SiteHost,
        aliases: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let aliases = aliases
            .into_iter()
            .map(|alias| alias.as_ref().trim().to_lowercase())
            .filter(|alias| !alias.is_empty())
            .collect::<Vec<_>>();

        let mut terms = vec![key.as_str().to_string(), compact(label.as_str())];
        terms.extend(aliases.iter().cloned());
        terms.retain(|term| !term.is_empty());
        terms.dedup();

        Self {
            key,
            label,
            site,
            aliases,
            terms,
        }
    }

    fn builtin(
        key: &'static str,
        label: &'static str,
        site: &'static str,
        aliases: &[&'static str],
    ) -> Self {
        Self::new(
            PlatformKey::from_static(key),
            PlatformLabel::from_static(label),
            SiteHost::from_static(site),
            aliases,
        )
    }

    /// Example URL used in the download template and as form placeholder.
    pub fn sample_url(&self) -> String {
        format!("https://{}/...", self.site)
    }

    /// Whether a spreadsheet header names this marketplace.
    ///
    /// The header is compared as written (trimmed, lower-cased) and compacted;
    /// it matches when either form contains the key, the compacted label or
    /// one of the aliases.
    pub fn matches_header(&self, header: &str) -> bool {
        let written = header.trim().to_lowercase();
        let compacted = compact(&written);
        self.terms
            .iter()
            .any(|term| written.contains(term.as_str()) || compacted.contains(term.as_str()))
    }
}

/// Ordered, duplicate-free set of marketplaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformSet {
    platforms: Vec<Platform>,
}

impl PlatformSet {
    pub fn new(platforms: Vec<Platform>) -> Result<Self, TypeConstraintError> {
        if platforms.is_empty() {
            return Err(TypeConstraintError::EmptyPlatformSet);
        }

        let mut seen = HashSet::new();
        for platform in &platforms {
            if !seen.insert(platform.key.as_str()) {
                return Err(TypeConstraintError::DuplicateKey(
                    platform.key.as_str().to_string(),
                ));
            }
        }

        Ok(Self { platforms })
    }

    /// Two Amazon, Wayfair, Overstock and Home Depot storefronts plus five
    /// single-store retailers.
    pub fn extended() -> Self {
        Self {
            platforms: vec![
                Platform::builtin("amazon1", "Amazon 1", "amazon.com", &[]),
                Platform::builtin("amazon2", "Amazon 2", "amazon.com", &[]),
                Platform::builtin("wf1", "WF 1", "wayfair.com", &["wayfair1", "wayfair 1"]),
                Platform::builtin("wf2", "WF 2", "wayfair.com", &["wayfair2", "wayfair 2"]),
                Platform::builtin(
                    "os1",
                    "OS 1",
                    "overstock.com",
                    &["overstock1", "overstock 1"],
                ),
                Platform::builtin(
                    "os2",
                    "OS 2",
                    "overstock.com",
                    &["overstock2", "overstock 2"],
                ),
                Platform::builtin(
                    "hd1",
                    "HD 1",
                    "homedepot.com",
                    &["homedepot1", "home depot 1"],
                ),
                Platform::builtin(
                    "hd2",
                    "HD 2",
                    "homedepot.com",
                    &["homedepot2", "home depot 2"],
                ),
                Platform::builtin("lowes", "Lowe's", "lowes.com", &[]),
                Platform::builtin("target", "Target", "target.com", &[]),
                Platform::builtin("walmart", "Walmart", "walmart.com", &[]),
                Platform::builtin("ebay", "Ebay", "ebay.com", &[]),
                Platform::builtin("kohls", "Kohl's", "kohls.com", &[]),
            ],
        }
    }

    /// One slot per retailer.
    pub fn standard() -> Self {
        Self {
            platforms: vec![
                Platform::builtin("amazon", "Amazon", "amazon.com", &[]),
                Platform::builtin("wayfair", "Wayfair", "wayfair.com", &[]),
                Platform::builtin("overstock", "Overstock", "overstock.com", &[]),
                Platform::builtin("homedepot", "Home Depot", "homedepot.com", &[]),
                Platform::builtin("lowes", "Lowe's", "lowes.com", &[]),
                Platform::builtin("target", "Target", "target.com", &[]),
                Platform::builtin("walmart", "Walmart", "walmart.com", &[]),
            ],
        }
    }

    /// Looks up a shipped table by name.
    pub fn preset(name: &str) -> Result<Self, TypeConstraintError> {
        match name.trim().to_ascii_lowercase().as_str() {
            EXTENDED_PRESET => Ok(Self::extended()),
            STANDARD_PRESET => Ok(Self::standard()),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown marketplace preset: {other}"
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.key.as_str() == key)
    }

    /// A record with every configured slot present and empty.
    pub fn empty_links(&self) -> PlatformLinks {
        PlatformLinks(
            self.platforms
                .iter()
                .map(|p| (p.key.clone(), String::new()))
                .collect(),
        )
    }

    /// Projects an arbitrary key/URL mapping onto the configured slots.
    ///
    /// Missing slots stay empty and keys outside the set are dropped, so the
    /// result always carries exactly the configured keys.
    pub fn normalize<I, K, V>(&self, raw: I) -> PlatformLinks
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut links = self.empty_links();
        for (key, url) in raw {
            links.set(key.as_ref(), url);
        }
        links
    }

    /// Header row of the bulk upload template.
    pub fn template_headers(&self) -> Vec<String> {
        std::iter::once("SKU".to_string())
            .chain(self.platforms.iter().map(|p| p.label.to_string()))
            .collect()
    }

    /// Example data row of the bulk upload template.
    pub fn template_example_row(&self) -> Vec<String> {
        std::iter::once("ABC123".to_string())
            .chain(self.platforms.iter().map(Platform::sample_url))
            .collect()
    }
}

/// Marketplace key to URL mapping for one product.
///
/// Build records through [`PlatformSet::empty_links`] or
/// [`PlatformSet::normalize`]; [`PlatformLinks::set`] never adds a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformLinks(BTreeMap<PlatformKey, String>);

impl PlatformLinks {
    /// URL stored for `key`, `None` when the slot does not exist.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Stores a trimmed URL into an existing slot. Returns `false` for keys
    /// outside the record.
    pub fn set(&mut self, key: &str, url: impl Into<String>) -> bool {
        match self.0.get_mut(key) {
            Some(slot) => {
                *slot = url.into().trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &PlatformKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlatformKey, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of slots holding a URL.
    pub fn filled_count(&self) -> usize {
        self.0.values().filter(|url| !url.trim().is_empty()).count()
    }
}
