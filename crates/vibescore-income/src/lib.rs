//! Income quality scoring engine for the VibeScore household-finance
//! composite.
//!
//! The engine turns heterogeneous, partially-missing, user-reported
//! financial documents into a normalized 0-100 income quality score with a
//! full audit trail. It is deliberately pure: no I/O, no shared state, and
//! no failure path — any JSON input produces a complete [`ScoreResult`].
//!
//! ```
//! use serde_json::json;
//! use vibescore_income::{compute_income_score, ScoreOptions};
//!
//! let result = compute_income_score(
//!     &json!({"primaryIncome": 5200, "monthlyExpenses": 3400}),
//!     &ScoreOptions::default(),
//! );
//! assert!((0.0..=100.0).contains(&result.score));
//! ```

pub mod age;
pub mod domain;
pub mod metrics;
pub mod normalize;
pub mod payload;
pub mod rollup;
pub mod scoring;

pub use domain::{
    DataQuality, Demographics, Diagnostics, FactorBreakdown, FactorId, FactorResult,
    HistoryAnalysis, IncomeHistoryPoint, IncomeStream, NormalizedIncomeData, PenaltyItem,
    PenaltySummary, ScoreOptions, ScoreResult, StreamAmounts, StreamKind,
};
pub use normalize::{normalize_income_data, normalize_with_today};
pub use payload::{decode_payload, encode_payload, PayloadError, ScorePayload};
pub use scoring::{
    compute_income_score, compute_income_score_at, FACTOR_WEIGHTS, MAX_PENALTY, MOMENTUM_NEUTRAL,
};
