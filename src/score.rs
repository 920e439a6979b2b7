//! score.rs — Heuristic confidence derivation for a normalized record.
//!
//! Confidence is a 0..=1 float (the API never reports an integer percentage).
//! The computation deliberately includes a small uniform random term so
//! repeated identical inputs do not produce a suspiciously repeatable number;
//! the randomness sits behind [`VarianceSource`] so tests can pin it.

use crate::incident::{vocab, AnalysisResult};
use rand::Rng;

/// Half-width of the uniform random term added to every score.
pub const VARIANCE_SPAN: f64 = 0.05;

/// Source of the bounded random term. One method, injectable, so the scorer
/// stays testable without becoming a pure function in production.
pub trait VarianceSource: Send + Sync {
    /// Next sample in `[-VARIANCE_SPAN, VARIANCE_SPAN]`.
    fn next(&self) -> f64;
}

/// Production source: thread-local RNG, uniform over the full span.
pub struct ThreadRngVariance;

impl VarianceSource for ThreadRngVariance {
    fn next(&self) -> f64 {
        rand::rng().random_range(-VARIANCE_SPAN..=VARIANCE_SPAN)
    }
}

/// Fixed source for tests (use `FixedVariance(0.0)` to assert exact bounds).
pub struct FixedVariance(pub f64);

impl VarianceSource for FixedVariance {
    fn next(&self) -> f64 {
        self.0
    }
}

/// Derive the confidence score for a normalized record.
///
/// Base 0.6, plus/minus fixed heuristic terms, plus the variance sample,
/// clamped to [0, 1]. The Other-category and empty-resources signals each
/// contribute BOTH a missed bonus and an explicit penalty in the same
/// evaluation; the pairs are independent additive terms, not branches of an
/// if/else, and must stay that way.
pub fn calculate_confidence(result: &AnalysisResult, variance: &dyn VarianceSource) -> f64 {
    let mut confidence = 0.6;

    if result.urgency == vocab::CRITICAL {
        confidence += 0.15;
    }
    if result.category != vocab::OTHER {
        confidence += 0.10;
    }
    if !result.resources.is_empty() {
        confidence += 0.10;
    }
    if !result.summary.is_empty() && result.summary.split_whitespace().count() <= 5 {
        confidence += 0.05;
    }

    if result.category == vocab::OTHER {
        confidence -= 0.20;
    }
    if result.resources.is_empty() {
        confidence -= 0.10;
    }

    confidence += variance.next();
    confidence.clamp(0.0, 1.0)
}
