// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod gateway;
pub mod incident;
pub mod metrics;
pub mod normalize;
pub mod score;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::gateway::{DynModelClient, GeminiClient, ModelClient};
pub use crate::incident::AnalysisResult;
pub use crate::normalize::normalize_severity;
pub use crate::score::{calculate_confidence, FixedVariance, ThreadRngVariance, VarianceSource};
