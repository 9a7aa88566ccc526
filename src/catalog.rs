//! In-memory reference tables for identification types and economic activities.
//!
//! Loaded from a JSON file shaped like:
//!
//! ```json
//! {
//!   "identification_types": {"01": 1, "02": 2},
//!   "economic_activities": {"620100": 41, "477100": 87}
//! }
//! ```

use crate::reconciler::{ReferenceLookup, ReferenceResolvers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Exact-match code -> id table.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, i64>,
}

impl StaticCatalog {
    pub fn new(entries: HashMap<String, i64>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceLookup for StaticCatalog {
    fn resolve(&self, code: &str) -> Option<i64> {
        self.entries.get(code.trim()).copied()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub identification_types: Option<HashMap<String, i64>>,
    #[serde(default)]
    pub economic_activities: Option<HashMap<String, i64>>,
}

impl ReferenceCatalog {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read reference catalog {}: {}", path.display(), e)
        })?;
        let catalog: Self = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Invalid reference catalog {}: {}", path.display(), e)
        })?;

        tracing::info!(
            "Reference catalog loaded: {} identification types, {} economic activities",
            catalog.identification_types.as_ref().map_or(0, |m| m.len()),
            catalog.economic_activities.as_ref().map_or(0, |m| m.len())
        );

        Ok(catalog)
    }

    /// A table absent from the file becomes an absent capability.
    pub fn into_resolvers(self) -> ReferenceResolvers {
        let mut resolvers = ReferenceResolvers::none();
        if let Some(entries) = self.identification_types {
            resolvers = resolvers.with_identification_types(Arc::new(StaticCatalog::new(entries)));
        }
        if let Some(entries) = self.economic_activities {
            resolvers = resolvers.with_economic_activities(Arc::new(StaticCatalog::new(entries)));
        }
        resolvers
    }
}
