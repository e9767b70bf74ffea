use serde::Serialize;

use super::domain::SchemeId;
use super::fairness::DEFAULT_ALLOWED_DIFF;
use super::metadata::MetadataStore;

/// Immutable description of a scheme, resolved once from metadata at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeDefinition {
    pub id: SchemeId,
    pub display_name: String,
    pub benefit_amount: f64,
    pub fairness_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethical_disclaimer: Option<String>,
}

impl SchemeDefinition {
    pub fn resolve(id: SchemeId, store: &impl MetadataStore) -> Self {
        let metadata = store.metadata(id);

        let benefit_amount = metadata
            .benefit_value()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or_else(|| default_benefit(id));
        let fairness_threshold = metadata
            .allowed_bias_threshold()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_ALLOWED_DIFF);

        Self {
            id,
            display_name: metadata
                .scheme_name
                .unwrap_or_else(|| default_display_name(id).to_string()),
            benefit_amount,
            fairness_threshold,
            ethical_disclaimer: metadata.ethical_disclaimer,
        }
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        self.id.feature_names()
    }
}

fn default_display_name(id: SchemeId) -> &'static str {
    match id {
        SchemeId::PmKisan => "PM-KISAN",
        SchemeId::Pmay => "PMAY",
        SchemeId::Nsp => "NSP",
        SchemeId::Ayushman => "Ayushman Bharat",
    }
}

fn default_benefit(id: SchemeId) -> f64 {
    match id {
        SchemeId::PmKisan => 6_000.0,
        SchemeId::Pmay => 250_000.0,
        SchemeId::Nsp => 50_000.0,
        SchemeId::Ayushman => 500_000.0,
    }
}

/// Catalogue of every known scheme plus the ordered subset the orchestrator fans out over.
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    catalogue: [SchemeDefinition; SchemeId::COUNT],
    registered: Vec<SchemeId>,
}

impl SchemeRegistry {
    /// Registers every catalogued scheme in catalogue order.
    pub fn standard(store: &impl MetadataStore) -> Self {
        Self::with_schemes(store, &SchemeId::ALL)
    }

    /// Registers `schemes` in the given order; duplicates are ignored.
    pub fn with_schemes(store: &impl MetadataStore, schemes: &[SchemeId]) -> Self {
        let catalogue = SchemeId::ALL.map(|id| SchemeDefinition::resolve(id, store));

        let mut registered = Vec::with_capacity(schemes.len());
        for scheme in schemes {
            if !registered.contains(scheme) {
                registered.push(*scheme);
            }
        }

        Self {
            catalogue,
            registered,
        }
    }

    /// Definition for any catalogued scheme, registered or not.
    pub fn definition(&self, id: SchemeId) -> &SchemeDefinition {
        &self.catalogue[id.index()]
    }

    pub fn is_registered(&self, id: SchemeId) -> bool {
        self.registered.contains(&id)
    }

    /// Registered schemes in fan-out order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemeDefinition> + '_ {
        self.registered.iter().map(|id| self.definition(*id))
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
