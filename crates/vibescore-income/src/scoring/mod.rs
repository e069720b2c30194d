//! Score aggregation: shared context, the seven factors, penalties, and the
//! final clamped result.

mod factors;
mod penalty;
mod tables;

pub use factors::{FACTOR_WEIGHTS, MOMENTUM_NEUTRAL};
pub use penalty::MAX_PENALTY;

use crate::age::{income_targets, IncomeTargets};
use crate::domain::{
    DataQuality, Demographics, Diagnostics, FactorBreakdown, HistoryAnalysis,
    NormalizedIncomeData, ScoreOptions, ScoreResult,
};
use crate::metrics::{analyze_income_history, clamp_score, data_presence_score};
use crate::normalize::{normalize_income_data, normalize_with_today};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// History is considered sufficient for trend claims from three points on.
const SUFFICIENT_HISTORY_POINTS: usize = 3;

/// Importance weights behind the data-presence quality score.
const PRESENCE_WEIGHTS: &[(&'static str, f64)] = &[
    ("incomeStreams", 3.0),
    ("incomeHistory", 3.0),
    ("monthlyExpenses", 3.0),
    ("savingsRate", 2.0),
    ("emergencyFundMonths", 2.0),
    ("employmentType", 2.0),
    ("debtToIncome", 1.0),
    ("regionCostIndex", 1.0),
    ("industryRisk", 1.0),
    ("bonusReliability", 1.0),
];

/// Read-only context shared by every factor computator within one call.
pub struct ScoreContext {
    pub total_income: f64,
    pub adjusted_income: f64,
    pub region_cost_index: f64,
    pub history: HistoryAnalysis,
    pub quality: DataQuality,
    pub targets: IncomeTargets,
    pub options: ScoreOptions,
}

/// Score a raw profile document. Total over any JSON input: the result is
/// always complete and well formed.
pub fn compute_income_score(raw: &Value, options: &ScoreOptions) -> ScoreResult {
    let data = normalize_income_data(raw, options);
    score_normalized(&data, options)
}

/// Deterministic variant with an injected "today" for age/tenure resolution.
pub fn compute_income_score_at(
    raw: &Value,
    options: &ScoreOptions,
    today: NaiveDate,
) -> ScoreResult {
    let data = normalize_with_today(raw, options, today);
    score_normalized(&data, options)
}

fn score_normalized(data: &NormalizedIncomeData, options: &ScoreOptions) -> ScoreResult {
    let total_income = data.amounts.total();
    let region_cost_index = data.region_cost_index.unwrap_or(100.0);
    let adjusted_income = total_income * (100.0 / region_cost_index.max(1.0));
    let history = analyze_income_history(&data.income_history);
    let quality = data_presence_score(PRESENCE_WEIGHTS, |key| has_value(data, key));
    let targets = income_targets(data.age, options);

    let ctx = ScoreContext {
        total_income,
        adjusted_income,
        region_cost_index,
        history,
        quality,
        targets,
        options: options.clone(),
    };

    let mut breakdown = BTreeMap::new();
    let mut weighted_sum = 0.0;
    for (id, weight) in FACTOR_WEIGHTS {
        let factor = factors::compute_factor(id, data, &ctx);
        let contribution = weight * factor.score;
        weighted_sum += contribution;
        breakdown.insert(
            id.key(),
            FactorBreakdown {
                factor,
                weight,
                contribution,
            },
        );
    }

    let base_score = clamp_score(weighted_sum, 0.0, 100.0);
    let penalty = penalty::compute_penalties(data, &ctx);
    let score = clamp_score(base_score - penalty.total, 0.0, 100.0);

    debug!(
        score,
        base_score,
        penalty = penalty.total,
        total_income,
        "income score computed"
    );

    ScoreResult {
        score,
        base_score,
        total_income,
        adjusted_income,
        region_cost_index,
        demographics: Demographics {
            age: data.age,
            bracket: ctx.targets.bracket.map(|bracket| bracket.label),
            baseline_monthly_income: ctx.targets.baseline_monthly,
            strong_income_cap: ctx.targets.strong_cap,
        },
        diagnostics: Diagnostics {
            missing_fields: ctx.quality.missing.clone(),
            history_sufficient: ctx.history.count >= SUFFICIENT_HISTORY_POINTS,
            history_months: ctx.history.months_covered,
        },
        penalty,
        breakdown,
        quality: ctx.quality,
        history: ctx.history,
    }
}

fn has_value(data: &NormalizedIncomeData, key: &str) -> bool {
    match key {
        "incomeStreams" => data.amounts.total() > 0.0 || !data.income_streams.is_empty(),
        "incomeHistory" => !data.income_history.is_empty(),
        "monthlyExpenses" => data.monthly_expenses.is_some(),
        "savingsRate" => data.savings_rate.is_some(),
        "emergencyFundMonths" => data.emergency_fund_months.is_some(),
        "employmentType" => data.employment_type.is_some(),
        "debtToIncome" => data.debt_to_income.is_some(),
        "regionCostIndex" => data.region_cost_index.is_some(),
        "industryRisk" => data.industry_risk.is_some(),
        "bonusReliability" => data.bonus_reliability.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_profile_returns_complete_result() {
        let result = compute_income_score(&json!({}), &ScoreOptions::default());
        assert_eq!(result.total_income, 0.0);
        assert_eq!(result.breakdown.len(), 7);
        assert_eq!(result.quality.missing.len(), PRESENCE_WEIGHTS.len());
        assert!((0.0..=100.0).contains(&result.score));
    }

    #[test]
    fn score_equals_clamped_base_minus_penalty() {
        let result = compute_income_score(
            &json!({
                "primaryIncome": 5200,
                "monthlyExpenses": 3400,
                "contractRenewalPending": true,
                "regionalUnemploymentRate": 8.5
            }),
            &ScoreOptions::default(),
        );
        let expected = clamp_score(result.base_score - result.penalty.total, 0.0, 100.0);
        assert!((result.score - expected).abs() < 1e-9);
        assert!(result.penalty.total <= MAX_PENALTY);
    }

    #[test]
    fn contributions_sum_to_base_score() {
        let result = compute_income_score(
            &json!({"primaryIncome": 6200, "savingsRate": 0.2}),
            &ScoreOptions::default(),
        );
        let sum: f64 = result.breakdown.values().map(|entry| entry.contribution).sum();
        assert!((clamp_score(sum, 0.0, 100.0) - result.base_score).abs() < 1e-9);
    }

    #[test]
    fn history_sufficiency_needs_three_points() {
        let sparse = compute_income_score(
            &json!({"incomeHistory": [
                {"month": "2026-01", "amount": 4000},
                {"month": "2026-02", "amount": 4100}
            ]}),
            &ScoreOptions::default(),
        );
        assert!(!sparse.diagnostics.history_sufficient);
        let dense = compute_income_score(
            &json!({"incomeHistory": [
                {"month": "2026-01", "amount": 4000},
                {"month": "2026-02", "amount": 4100},
                {"month": "2026-03", "amount": 4200}
            ]}),
            &ScoreOptions::default(),
        );
        assert!(dense.diagnostics.history_sufficient);
    }

    #[test]
    fn age_bracket_overrides_default_targets() {
        let result = compute_income_score(
            &json!({"age": 15, "primaryIncome": 420}),
            &ScoreOptions::default(),
        );
        assert_eq!(result.demographics.bracket, Some("13-15"));
        assert_eq!(result.demographics.baseline_monthly_income, 200.0);
        let adult = compute_income_score(&json!({"primaryIncome": 420}), &ScoreOptions::default());
        assert_eq!(adult.demographics.bracket, None);
        assert_eq!(adult.demographics.baseline_monthly_income, 6500.0);
    }
}
