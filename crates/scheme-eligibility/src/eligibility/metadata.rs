use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::SchemeId;

/// Static per-scheme transparency metadata. Every field is optional; consumers fall back to
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemeMetadata {
    #[serde(default)]
    pub scheme_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub benefit_amount: Option<BenefitAmount>,
    #[serde(default)]
    pub fairness_policy: Option<FairnessPolicyMetadata>,
    #[serde(default)]
    pub ethical_disclaimer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenefitAmount {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FairnessPolicyMetadata {
    #[serde(default)]
    pub allowed_bias_threshold: Option<f64>,
    #[serde(default)]
    pub sensitive_attributes: Vec<String>,
}

impl SchemeMetadata {
    pub fn benefit_value(&self) -> Option<f64> {
        self.benefit_amount.as_ref().and_then(|amount| amount.value)
    }

    pub fn allowed_bias_threshold(&self) -> Option<f64> {
        self.fairness_policy
            .as_ref()
            .and_then(|policy| policy.allowed_bias_threshold)
    }
}

/// Read-only lookup of scheme metadata. Lookups never fail; absent metadata is empty.
pub trait MetadataStore: Send + Sync {
    fn metadata(&self, scheme: SchemeId) -> SchemeMetadata;
}

/// Reads `<root>/<scheme_id>/metadata.json`.
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    root: PathBuf,
}

impl FileMetadataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, scheme: SchemeId) -> PathBuf {
        self.root.join(scheme.as_str()).join("metadata.json")
    }
}

fn read_metadata(path: &Path) -> Result<Option<SchemeMetadata>, String> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| err.to_string()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.to_string()),
    }
}

impl MetadataStore for FileMetadataStore {
    fn metadata(&self, scheme: SchemeId) -> SchemeMetadata {
        let path = self.path_for(scheme);
        match read_metadata(&path) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => SchemeMetadata::default(),
            Err(detail) => {
                warn!(
                    scheme = scheme.as_str(),
                    path = %path.display(),
                    %detail,
                    "scheme metadata unreadable; using defaults"
                );
                SchemeMetadata::default()
            }
        }
    }
}

/// In-memory metadata, mainly for tests and embedded deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataStore {
    entries: BTreeMap<SchemeId, SchemeMetadata>,
}

impl StaticMetadataStore {
    pub fn with(mut self, scheme: SchemeId, metadata: SchemeMetadata) -> Self {
        self.entries.insert(scheme, metadata);
        self
    }
}

impl MetadataStore for StaticMetadataStore {
    fn metadata(&self, scheme: SchemeId) -> SchemeMetadata {
        self.entries.get(&scheme).cloned().unwrap_or_default()
    }
}
