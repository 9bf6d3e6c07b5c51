//! Two-letter state code to display name lookup

use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::DataError;

#[derive(Debug, Deserialize)]
struct LookupEntry {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "State")]
    state: String,
}

/// Lookup table built from the `[{ "Code": .., "State": .. }]` resource
#[derive(Debug, Clone, Default)]
pub struct StateCodeLookup {
    names: AHashMap<String, String>,
}

impl StateCodeLookup {
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let entries: Vec<LookupEntry> =
            serde_json::from_str(text).map_err(|e| DataError::json("state code lookup", e))?;

        if entries.is_empty() {
            return Err(DataError::Lookup("lookup table is empty".to_string()));
        }

        let mut names = AHashMap::with_capacity(entries.len());
        for entry in entries {
            let code = entry.code.trim().to_ascii_uppercase();
            if let Some(previous) = names.insert(code.clone(), entry.state) {
                warn!(%code, %previous, "Duplicate state code in lookup, keeping the last entry");
            }
        }

        Ok(Self { names })
    }

    pub async fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = crate::read_resource(path).await?;
        let lookup = Self::from_json(&text)?;
        debug!(path = %path.display(), entries = lookup.len(), "Loaded state code lookup");
        Ok(lookup)
    }

    /// Display name for a code, case-insensitive
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names
            .get(&code.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for StateCodeLookup {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(code, name)| (code.into().to_ascii_uppercase(), name.into()))
                .collect(),
        }
    }
}
