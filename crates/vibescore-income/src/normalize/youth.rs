//! Reinterpretation of the minor (youth) questionnaire schema.
//!
//! Youth documents carry a vocabulary of their own (`youthHasIncome`,
//! `youthTypicalMonthlyIncome`, ...); this module maps it onto the same
//! canonical record the adult schema feeds.

use super::aliases::{flag, label, non_negative, Doc};
use crate::domain::{NormalizedIncomeData, ScoreOptions, StreamKind};

const HAS_INCOME: &[&str] = &["youthHasIncome"];
const PRIMARY_SOURCE: &[&str] = &["youthPrimaryIncomeSource", "youthIncomeSource"];
const INCOME_FREQUENCY: &[&str] = &["youthIncomeFrequency"];
const TYPICAL_INCOME: &[&str] = &["youthTypicalMonthlyIncome", "youthMonthlyIncome"];
const HAS_SAVINGS: &[&str] = &["youthHasCurrentSavings", "youthHasSavings"];
const SAVINGS_AMOUNT: &[&str] = &["youthSavingsAmount", "youthCurrentSavings"];
const SAVINGS_CADENCE: &[&str] = &["youthSavingsFrequency", "youthSavingsCadence"];
const EMERGENCY_BUFFER: &[&str] = &["youthHasEmergencyBuffer"];
const WEEKLY_SPENDING: &[&str] = &["youthWeeklySpending", "youthTypicalWeeklySpending"];
const PAYS_BILLS: &[&str] = &["youthPaysRecurringBills", "youthHasRecurringBills"];
const HELD_JOB: &[&str] = &["youthHasHeldJob", "youthHadPartTimeJob"];
const RAN_OUT: &[&str] = &["youthRanOutOfMoney"];

const WEEKS_PER_MONTH: f64 = 4.333;

/// Any youth-vocabulary key marks the document as a youth record.
pub(crate) fn has_youth_fields(doc: &Doc) -> bool {
    doc.keys().any(|key| key.starts_with("youth"))
}

pub(crate) fn apply_youth_schema(
    doc: &Doc,
    data: &mut NormalizedIncomeData,
    options: &ScoreOptions,
) {
    data.is_youth = true;

    let has_income = flag(doc, HAS_INCOME).unwrap_or(false);
    let typical_income = non_negative(doc, TYPICAL_INCOME).unwrap_or(0.0);
    let source = label(doc, PRIMARY_SOURCE);

    let (kind, employment) = match source.as_deref() {
        Some(source) => classify_source(source),
        None => (StreamKind::Other, "student"),
    };

    if has_income && typical_income > 0.0 {
        data.amounts.add(kind, typical_income);
        data.employment_type = Some(employment.to_string());
    } else {
        data.employment_type = Some("unemployed".to_string());
    }

    if let Some(frequency) = label(doc, INCOME_FREQUENCY) {
        data.bonus_reliability = Some(reliability_tier(&frequency).to_string());
        data.pay_frequency = Some(frequency);
    }

    let has_savings = flag(doc, HAS_SAVINGS).unwrap_or(false);
    let savings_amount = non_negative(doc, SAVINGS_AMOUNT);
    data.savings_rate = match label(doc, SAVINGS_CADENCE) {
        Some(cadence) => Some(cadence_rate(&cadence)),
        None if has_savings => Some(0.10),
        None => data.savings_rate,
    };

    if data.monthly_expenses.is_none() {
        if let Some(weekly) = non_negative(doc, WEEKLY_SPENDING) {
            data.monthly_expenses = Some(weekly * WEEKS_PER_MONTH);
        }
    }

    // Essential share reflects how committed the spending already is.
    if flag(doc, RAN_OUT).unwrap_or(false) {
        data.essential_expense_share = Some(0.9);
    } else if flag(doc, PAYS_BILLS).unwrap_or(false) {
        data.essential_expense_share = Some(0.75);
    }

    let monthly_income = data.amounts.total();
    let spending = data
        .monthly_expenses
        .filter(|v| *v > 0.0)
        .unwrap_or(monthly_income * options.expense_fallback_ratio);
    let buffer_flag = flag(doc, EMERGENCY_BUFFER).unwrap_or(false);
    data.emergency_fund_months = match savings_amount {
        Some(amount) if spending > 0.0 => Some(amount / spending),
        Some(_) | None if buffer_flag => Some(1.0),
        _ => data.emergency_fund_months,
    };

    // Prior work experience acts as a tenure floor, not a precise duration.
    if flag(doc, HELD_JOB).unwrap_or(false) {
        data.tenure_months = data.tenure_months.max(8.0);
    } else if has_income {
        data.tenure_months = data.tenure_months.max(4.0);
    }

    for (key, value) in doc {
        if key.starts_with("youth") {
            if let Some(bool_value) = value.as_bool() {
                data.youth_flags.insert(key.clone(), bool_value);
            }
        }
    }
}

fn classify_source(source: &str) -> (StreamKind, &'static str) {
    if source.contains("part-time") || source.contains("job") {
        (StreamKind::Primary, "part-time")
    } else if source.contains("chore") || source.contains("odd") {
        (StreamKind::Side, "gig")
    } else if source.contains("online") || source.contains("content") || source.contains("stream") {
        (StreamKind::Side, "gig")
    } else if source.contains("business") || source.contains("sell") {
        (StreamKind::Side, "self-employed")
    } else if source.contains("invest") {
        (StreamKind::Passive, "student")
    } else if source.contains("allowance") || source.contains("gift") {
        (StreamKind::Other, "student")
    } else {
        (StreamKind::Other, "student")
    }
}

fn reliability_tier(frequency: &str) -> &'static str {
    match frequency {
        "daily" | "weekly" | "biweekly" | "monthly" => "consistent",
        "occasionally" | "sometimes" => "occasional",
        "rarely" | "seldom" => "unreliable",
        _ => "variable",
    }
}

fn cadence_rate(cadence: &str) -> f64 {
    match cadence {
        "every-paycheck" | "always" => 0.25,
        "weekly" => 0.20,
        "monthly" => 0.15,
        "sometimes" | "occasionally" => 0.08,
        "rarely" => 0.03,
        "never" => 0.0,
        _ => 0.10,
    }
}
