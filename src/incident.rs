//! incident.rs — The triage record shared by the gateway, normalizer and scorer.
//!
//! `AnalysisResult` mirrors the JSON shape the classifier model is instructed
//! to emit. All four fields are serde-defaulted so a partially filled reply
//! still deserializes; vocabulary literals live in [`vocab`] because both the
//! normalizer and the scorer compare them byte-for-byte.

use serde::{Deserialize, Serialize};

/// Vocabulary literals used by the override rules and the scorer.
///
/// Note the casing: the prompt asks the model for lowercase snake_case
/// categories (`food_water`), while these rule-side literals are the
/// capitalized forms inherited from the triage policy document. The mismatch
/// is known and intentionally left in place until the policy owner settles on
/// one vocabulary; the test suite documents the consequence.
pub mod vocab {
    pub const CRITICAL: &str = "Critical";
    pub const HIGH: &str = "High";
    pub const MEDIUM: &str = "Medium";
    pub const LOW: &str = "Low";

    pub const FOOD_WATER: &str = "Food/Water";
    pub const INFRASTRUCTURE: &str = "Infrastructure";
    pub const RESCUE: &str = "Rescue";
    pub const MEDICAL: &str = "Medical";
    pub const FIRE: &str = "Fire";
    pub const OTHER: &str = "Other";
}

/// One analyzed incident, as produced by the classifier gateway and adjusted
/// by the normalizer. No persistence: the record lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Expected vocabulary: {Critical, High, Medium, Low}. Kept as a free
    /// string because the collaborator's casing is not trusted and the
    /// override rules compare exact literals.
    #[serde(default)]
    pub urgency: String,
    /// Expected vocabulary: {Food/Water, Infrastructure, Rescue, Medical,
    /// Fire, Other} plus whatever else the model decides to emit.
    #[serde(default)]
    pub category: String,
    /// Short free text, ideally five words or fewer.
    #[serde(default)]
    pub summary: String,
    /// Suggested resource names; may be empty.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl AnalysisResult {
    /// Fixed record returned when the collaborator call fails or its reply
    /// cannot be parsed. Confidence is NOT part of this record: the scorer
    /// computes it fresh, same as for any other record.
    pub fn fallback() -> Self {
        Self {
            urgency: vocab::MEDIUM.to_string(),
            category: vocab::OTHER.to_string(),
            summary: "Manual review required".to_string(),
            resources: Vec::new(),
        }
    }
}
