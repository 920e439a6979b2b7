//! normalize.rs — Fixed severity-override rules applied after classification.
//!
//! Organizational risk policy, applied regardless of the model's own judgment.
//! The rules run in order; each compares exact literals from
//! [`crate::incident::vocab`]. Only `urgency` may change.

use crate::incident::{vocab, AnalysisResult};

/// Apply the severity-override policy to a candidate record.
///
/// Rules, in order:
/// 1. Food/Water + Critical  -> High   (shortages are rarely immediately life-threatening)
/// 2. Infrastructure + Critical|High -> Medium  (downgraded relative to direct threats to life)
/// 3. Rescue|Medical|Fire + Medium -> High  (never treated as merely medium)
///
/// A second pass is a no-op: no rule's consequent re-satisfies its own
/// antecedent (rule 1 requires Critical but writes High; rule 3 requires
/// Medium but writes High). This is covered by tests, not guaranteed by
/// construction.
pub fn normalize_severity(mut result: AnalysisResult) -> AnalysisResult {
    if result.category == vocab::FOOD_WATER && result.urgency == vocab::CRITICAL {
        result.urgency = vocab::HIGH.to_string();
    }

    if result.category == vocab::INFRASTRUCTURE
        && (result.urgency == vocab::CRITICAL || result.urgency == vocab::HIGH)
    {
        result.urgency = vocab::MEDIUM.to_string();
    }

    if matches!(
        result.category.as_str(),
        vocab::RESCUE | vocab::MEDICAL | vocab::FIRE
    ) && result.urgency == vocab::MEDIUM
    {
        result.urgency = vocab::HIGH.to_string();
    }

    result
}
