//! The seven independent factor computators.
//!
//! Each is a pure function of the normalized record and the shared context,
//! defensively defaulted so no input shape can make it fail, and each
//! returns a `FactorResult` whose details map exists purely for audits.

use super::tables;
use super::ScoreContext;
use crate::domain::{FactorId, FactorResult, NormalizedIncomeData, StreamKind};
use crate::metrics::{clamp_score, herfindahl_index, logistic, ratio_score, saturate};
use serde_json::Value;
use std::collections::BTreeMap;

pub const FACTOR_WEIGHTS: [(FactorId, f64); 7] = [
    (FactorId::EarningPower, 0.25),
    (FactorId::ExpenseCoverage, 0.17),
    (FactorId::Stability, 0.18),
    (FactorId::Diversity, 0.12),
    (FactorId::Momentum, 0.12),
    (FactorId::Resilience, 0.10),
    (FactorId::Opportunity, 0.06),
];

pub const MOMENTUM_NEUTRAL: f64 = 48.0;
const MOMENTUM_BASE: f64 = 18.0;

pub fn compute_factor(
    id: FactorId,
    data: &NormalizedIncomeData,
    ctx: &ScoreContext,
) -> FactorResult {
    match id {
        FactorId::EarningPower => earning_power(ctx),
        FactorId::ExpenseCoverage => expense_coverage(data, ctx),
        FactorId::Stability => stability(data),
        FactorId::Diversity => diversity(data, ctx),
        FactorId::Momentum => momentum(ctx),
        FactorId::Resilience => resilience(data, ctx),
        FactorId::Opportunity => opportunity(data),
    }
}

fn earning_power(ctx: &ScoreContext) -> FactorResult {
    let cap = ctx.targets.strong_cap.max(1.0);
    let baseline = ctx.targets.baseline_monthly.max(1.0);
    let normalized = saturate(ctx.adjusted_income, cap);
    let lift = (ctx.adjusted_income / baseline).min(1.1);
    let score = clamp_score(65.0 * normalized + 35.0 * lift.min(1.0), 0.0, 100.0);

    let mut details = BTreeMap::new();
    detail(&mut details, "adjustedIncome", ctx.adjusted_income);
    detail(&mut details, "strongIncomeCap", cap);
    detail(&mut details, "baselineMonthlyIncome", baseline);
    detail(&mut details, "normalized", normalized);
    detail(&mut details, "baselineLift", lift);
    FactorResult::new(FactorId::EarningPower, score, details)
}

fn expense_coverage(data: &NormalizedIncomeData, ctx: &ScoreContext) -> FactorResult {
    let income = ctx.total_income;
    let expenses = data
        .monthly_expenses
        .filter(|v| *v > 0.0)
        .unwrap_or(income * ctx.options.expense_fallback_ratio);
    let essential_share = data
        .essential_expense_share
        .unwrap_or(ctx.options.essential_expense_fallback_ratio)
        .clamp(0.0, 1.0);
    let essential = data
        .essential_expenses
        .filter(|v| *v > 0.0)
        .unwrap_or(expenses * essential_share);

    let coverage_ratio = income / expenses.max(1.0);
    let buffer_ratio = (income - essential).max(0.0) / essential.max(1.0);

    let coverage_component = 0.6 * ratio_score(coverage_ratio, 1.25, 0.4);
    let buffer_component = 40.0 * logistic(buffer_ratio, 0.4, 5.0);
    let score = clamp_score(coverage_component + buffer_component, 0.0, 100.0);

    let mut details = BTreeMap::new();
    detail(&mut details, "monthlyExpenses", expenses);
    detail(&mut details, "essentialExpenses", essential);
    detail(&mut details, "coverageRatio", coverage_ratio);
    detail(&mut details, "bufferRatio", buffer_ratio);
    detail(&mut details, "coverageComponent", coverage_component);
    detail(&mut details, "bufferComponent", buffer_component);
    FactorResult::new(FactorId::ExpenseCoverage, score, details)
}

fn stability(data: &NormalizedIncomeData) -> FactorResult {
    let base = tables::lookup(
        tables::EMPLOYMENT_BASES,
        data.employment_type.as_deref(),
        tables::DEFAULT_EMPLOYMENT_BASE,
    );
    let tenure_bonus = data.tenure_months.clamp(0.0, 24.0) * 0.9;
    let industry_adjustment =
        tables::lookup(tables::INDUSTRY_RISK_ADJUSTMENTS, data.industry_risk.as_deref(), 0.0);
    let frequency_adjustment =
        tables::lookup(tables::PAY_FREQUENCY_ADJUSTMENTS, data.pay_frequency.as_deref(), 0.0);
    let layoff_penalty = (data.layoff_count.max(0.0) * 3.0).min(10.0);
    let benefits_bonus = data.benefits_coverage.unwrap_or(0.0).clamp(0.0, 1.0) * 10.0;
    let reliability_adjustment = tables::lookup(
        tables::BONUS_RELIABILITY_ADJUSTMENTS,
        data.bonus_reliability.as_deref(),
        0.0,
    );
    let insurance_bonus = data.income_protection.unwrap_or(0.0).clamp(0.0, 1.0) * 8.0;

    let score = clamp_score(
        base + tenure_bonus + industry_adjustment + frequency_adjustment - layoff_penalty
            + benefits_bonus
            + reliability_adjustment
            + insurance_bonus,
        0.0,
        100.0,
    );

    let mut details = BTreeMap::new();
    detail(&mut details, "employmentBase", base);
    detail(&mut details, "tenureBonus", tenure_bonus);
    detail(&mut details, "industryAdjustment", industry_adjustment);
    detail(&mut details, "payFrequencyAdjustment", frequency_adjustment);
    detail(&mut details, "layoffPenalty", layoff_penalty);
    detail(&mut details, "benefitsBonus", benefits_bonus);
    detail(&mut details, "bonusReliabilityAdjustment", reliability_adjustment);
    detail(&mut details, "insuranceBonus", insurance_bonus);
    FactorResult::new(FactorId::Stability, score, details)
}

fn diversity(data: &NormalizedIncomeData, ctx: &ScoreContext) -> FactorResult {
    let mut amounts: Vec<f64> = data
        .amounts
        .nonzero()
        .into_iter()
        .map(|(_, amount)| amount)
        .collect();
    // Largest streams first when the document exceeds the considered cap.
    amounts.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    amounts.truncate(ctx.options.max_streams_considered.max(1));

    let n = amounts.len();
    let total: f64 = amounts.iter().sum();

    let mut details = BTreeMap::new();
    if n == 0 || total <= 0.0 {
        detail(&mut details, "streamCount", 0.0);
        return FactorResult::new(FactorId::Diversity, 0.0, details);
    }

    let hhi = herfindahl_index(&amounts);
    let evenness = if n > 1 {
        (1.0 - hhi) / (1.0 - 1.0 / n as f64)
    } else {
        0.0
    };
    let concentration_component = clamp_score(evenness, 0.0, 1.0) * 70.0;

    let passive_like = data.amounts.get(StreamKind::Passive) + data.amounts.get(StreamKind::Rental);
    let passive_share = if ctx.total_income > 0.0 {
        passive_like / ctx.total_income
    } else {
        0.0
    };
    let passive_component = (passive_share / 0.35).min(1.0) * 30.0;

    let score = clamp_score(concentration_component + passive_component, 0.0, 100.0);
    detail(&mut details, "streamCount", n as f64);
    detail(&mut details, "herfindahlIndex", hhi);
    detail(&mut details, "evenness", evenness);
    detail(&mut details, "concentrationComponent", concentration_component);
    detail(&mut details, "passiveShare", passive_share);
    detail(&mut details, "passiveComponent", passive_component);
    FactorResult::new(FactorId::Diversity, score, details)
}

fn momentum(ctx: &ScoreContext) -> FactorResult {
    let history = &ctx.history;
    let mut details = BTreeMap::new();
    if history.count == 0 {
        detail(&mut details, "points", 0.0);
        detail(&mut details, "neutral", MOMENTUM_NEUTRAL);
        return FactorResult::new(FactorId::Momentum, MOMENTUM_NEUTRAL, details);
    }

    let slope_component = 100.0 * logistic(history.slope_percent, 0.0, 18.0);
    let fit_component = 100.0 * clamp_score(history.r_squared, 0.0, 1.0);
    let recent_component = 100.0 * logistic(history.recent_change_pct, 0.0, 0.12);
    let volatility_penalty = (history.volatility * 140.0).min(100.0);

    let score = clamp_score(
        MOMENTUM_BASE + 0.35 * slope_component + 0.25 * fit_component + 0.25 * recent_component
            - 0.35 * volatility_penalty,
        0.0,
        100.0,
    );

    detail(&mut details, "points", history.count as f64);
    detail(&mut details, "slopeComponent", slope_component);
    detail(&mut details, "fitComponent", fit_component);
    detail(&mut details, "recentComponent", recent_component);
    detail(&mut details, "volatilityPenalty", volatility_penalty);
    FactorResult::new(FactorId::Momentum, score, details)
}

fn resilience(data: &NormalizedIncomeData, ctx: &ScoreContext) -> FactorResult {
    let savings_rate = data.savings_rate.unwrap_or(0.0).max(0.0);
    let emergency_months = data.emergency_fund_months.unwrap_or(0.0).max(0.0);
    let dti = data.debt_to_income.unwrap_or(0.0).clamp(0.0, 0.65);
    let insurance = data.income_protection.unwrap_or(0.0).clamp(0.0, 1.0);

    let desired_rate = ctx.options.desired_savings_rate.max(1e-6);
    let ideal_months = ctx.options.ideal_emergency_months.max(1e-6);

    let savings_component = 45.0 * (savings_rate / desired_rate).min(1.0);
    let emergency_component = 35.0 * (emergency_months / ideal_months).min(1.0);
    let debt_component = 25.0 * (1.0 - dti);
    let insurance_component = 8.0 * insurance;

    let score = clamp_score(
        savings_component + emergency_component + debt_component + insurance_component,
        0.0,
        100.0,
    );

    let mut details = BTreeMap::new();
    detail(&mut details, "savingsRate", savings_rate);
    detail(&mut details, "emergencyFundMonths", emergency_months);
    detail(&mut details, "debtToIncome", dti);
    detail(&mut details, "savingsComponent", savings_component);
    detail(&mut details, "emergencyComponent", emergency_component);
    detail(&mut details, "debtComponent", debt_component);
    detail(&mut details, "insuranceComponent", insurance_component);
    FactorResult::new(FactorId::Resilience, score, details)
}

fn opportunity(data: &NormalizedIncomeData) -> FactorResult {
    let base = tables::lookup(
        tables::SKILL_DEMAND_BASES,
        data.skill_demand.as_deref(),
        tables::DEFAULT_SKILL_DEMAND_BASE,
    );
    let promotion_bonus = data.promotion_pipeline.unwrap_or(0.0).clamp(0.0, 1.0) * 16.0;
    let upskilling_bonus = data.upskilling_progress.unwrap_or(0.0).clamp(0.0, 1.0) * 14.0;
    let trend_adjustment =
        tables::lookup(tables::HIRING_TREND_ADJUSTMENTS, data.hiring_trend.as_deref(), 0.0);
    let satisfaction_bonus = data.role_satisfaction.unwrap_or(0.0).clamp(0.0, 1.0) * 6.0;

    let score = clamp_score(
        base + promotion_bonus + upskilling_bonus + trend_adjustment + satisfaction_bonus,
        0.0,
        100.0,
    );

    let mut details = BTreeMap::new();
    detail(&mut details, "skillDemandBase", base);
    detail(&mut details, "promotionBonus", promotion_bonus);
    detail(&mut details, "upskillingBonus", upskilling_bonus);
    detail(&mut details, "hiringTrendAdjustment", trend_adjustment);
    detail(&mut details, "satisfactionBonus", satisfaction_bonus);
    FactorResult::new(FactorId::Opportunity, score, details)
}

fn detail(map: &mut BTreeMap<&'static str, Value>, key: &'static str, value: f64) {
    let json = serde_json::Number::from_f64(if value.is_finite() { value } else { 0.0 })
        .map(Value::Number)
        .unwrap_or(Value::Null);
    map.insert(key, json);
}
