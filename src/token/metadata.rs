// MetadataStore - Per-edition URIs with a shared base fallback

use crate::types::EditionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edition metadata URIs. An edition without its own URI falls back to
/// the base URI configured at initialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetadataStore {
    base_uri: String,
    overrides: HashMap<EditionId, String>,
}

impl MetadataStore {
    /// Create a store with a base URI
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            overrides: HashMap::new(),
        }
    }

    /// Get the base URI
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get the URI for an edition, falling back to the base URI
    pub fn uri(&self, edition_id: EditionId) -> &str {
        self.overrides
            .get(&edition_id)
            .map(String::as_str)
            .unwrap_or(&self.base_uri)
    }

    /// Set an edition-specific URI (recorded on voucher mint)
    pub(crate) fn set_uri(&mut self, edition_id: EditionId, uri: impl Into<String>) {
        self.overrides.insert(edition_id, uri.into());
    }
}
