//! Ordered alias-priority lists and pick-first-present field resolution.
//!
//! Raw profile documents spell the same concept many ways; each list below
//! is evaluated front to back and the first non-null hit wins.

use crate::metrics::percent_to_unit;
use serde_json::{Map, Value};

pub(crate) type Doc = Map<String, Value>;

pub(crate) const AGGREGATE_INCOME: &[&str] = &[
    "totalMonthlyIncome",
    "monthlyIncomeTotal",
    "grossMonthlyIncome",
    "monthlyIncome",
    "incomeTotal",
];

pub(crate) const PRIMARY_INCOME: &[&str] =
    &["primaryIncome", "baseSalary", "salaryMonthly", "mainIncome"];
pub(crate) const ADDITIONAL_INCOME: &[&str] =
    &["additionalIncome", "secondaryIncome", "extraIncome"];
pub(crate) const BONUS_INCOME: &[&str] = &["bonusIncome", "annualBonusMonthly", "equityIncome"];
pub(crate) const COMMISSION_INCOME: &[&str] = &["commissionIncome", "monthlyCommission"];
pub(crate) const PASSIVE_INCOME: &[&str] =
    &["passiveIncome", "dividendIncome", "investmentIncome"];
pub(crate) const RENTAL_INCOME: &[&str] = &["rentalIncome", "propertyIncome"];
pub(crate) const SIDE_INCOME: &[&str] = &["sideIncome", "gigIncome", "freelanceIncome"];
pub(crate) const OTHER_INCOME: &[&str] = &["otherIncome", "miscIncome"];

pub(crate) const STREAM_ARRAY: &[&str] = &["incomeStreams", "streams", "sources", "incomeSources"];

pub(crate) const MONTHLY_EXPENSES: &[&str] = &[
    "monthlyExpenses",
    "totalMonthlyExpenses",
    "expenses",
    "monthlySpending",
];
pub(crate) const ESSENTIAL_EXPENSES: &[&str] = &[
    "essentialExpenses",
    "essentialMonthlyExpenses",
    "needsExpenses",
];
pub(crate) const SAVINGS_RATE: &[&str] = &["savingsRate", "monthlySavingsRate", "savingsPct"];
pub(crate) const EMERGENCY_MONTHS: &[&str] =
    &["emergencyFundMonths", "emergencyMonths", "runwayMonths"];
pub(crate) const EMPLOYMENT_TYPE: &[&str] = &["employmentType", "employmentStatus", "workType"];
pub(crate) const INDUSTRY_RISK: &[&str] = &["industryRisk", "industryOutlook", "sectorRisk"];
pub(crate) const BONUS_RELIABILITY: &[&str] = &["bonusReliability", "bonusConsistency"];
pub(crate) const HIRING_TREND: &[&str] = &["hiringTrend", "marketHiringTrend"];
pub(crate) const SKILL_DEMAND: &[&str] = &["skillDemand", "skillMarketDemand"];
pub(crate) const PROMOTION_PIPELINE: &[&str] = &["promotionPipeline", "promotionLikelihood"];
pub(crate) const UPSKILLING: &[&str] = &["upskillingProgress", "trainingProgress"];
pub(crate) const ROLE_SATISFACTION: &[&str] = &["roleSatisfaction", "jobSatisfaction"];
pub(crate) const REGION_COST_INDEX: &[&str] = &[
    "regionCostIndex",
    "regionalCostIndex",
    "costOfLivingIndex",
];
pub(crate) const DEBT_TO_INCOME: &[&str] = &["debtToIncome", "debtToIncomeRatio", "dtiRatio"];
pub(crate) const INCOME_PROTECTION: &[&str] = &[
    "incomeProtectionCoverage",
    "incomeInsuranceCoverage",
    "disabilityCoverage",
];
pub(crate) const UNEMPLOYMENT_RATE: &[&str] = &[
    "regionalUnemploymentRate",
    "unemploymentRate",
    "localUnemploymentRate",
];
pub(crate) const TENURE_MONTHS: &[&str] = &["tenureMonths", "monthsInRole", "jobTenureMonths"];
pub(crate) const TENURE_YEARS: &[&str] = &["tenureYears", "yearsInRole"];
pub(crate) const EMPLOYMENT_START: &[&str] =
    &["employmentStartDate", "jobStartDate", "roleStartDate"];
pub(crate) const PAY_FREQUENCY: &[&str] = &["payFrequency", "paySchedule"];
pub(crate) const LAYOFF_COUNT: &[&str] = &["layoffsExperienced", "layoffCount", "recentLayoffs"];
pub(crate) const BENEFITS_COVERAGE: &[&str] = &["benefitsCoverage", "benefitsScore"];
pub(crate) const CONTRACT_RENEWAL: &[&str] = &["contractRenewalPending", "renewalPending"];
pub(crate) const MAJOR_EXPENSE: &[&str] = &[
    "majorExpensePlanned",
    "plannedMajorExpense",
    "upcomingMajorExpense",
];
pub(crate) const INCOME_HISTORY: &[&str] = &["incomeHistory", "monthlyIncomeHistory", "history"];
pub(crate) const BIRTH_DATE: &[&str] = &["birthDate", "dateOfBirth", "dob", "birthday"];
pub(crate) const AGE: &[&str] = &["age", "userAge"];
pub(crate) const PROFILE_OVERRIDE: &[&str] = &["profile", "profileOverrides", "overrides"];
pub(crate) const SAVINGS_RATE_OVERRIDE: &[&str] = &["savingsRateOverride"];

/// First non-null value among the aliases.
pub(crate) fn pick<'a>(doc: &'a Doc, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| doc.get(*key).filter(|value| !value.is_null()))
}

/// Coerce a JSON value to a finite number; numeric strings count.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64().filter(|v| v.is_finite()),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub(crate) fn number(doc: &Doc, keys: &[&str]) -> Option<f64> {
    pick(doc, keys).and_then(coerce_number)
}

pub(crate) fn non_negative(doc: &Doc, keys: &[&str]) -> Option<f64> {
    number(doc, keys).map(|v| v.max(0.0))
}

/// Numeric field expected to be a unit fraction, accepting 0..100 input.
pub(crate) fn fraction(doc: &Doc, keys: &[&str]) -> Option<f64> {
    number(doc, keys).map(|v| percent_to_unit(v, 0.0))
}

/// Lowercased, hyphen-normalized categorical label.
pub(crate) fn label(doc: &Doc, keys: &[&str]) -> Option<String> {
    pick(doc, keys)
        .and_then(Value::as_str)
        .map(normalize_label)
        .filter(|normalized| !normalized.is_empty())
}

pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Boolean field, accepting yes/no strings and 0/1 numbers.
pub(crate) fn flag(doc: &Doc, keys: &[&str]) -> Option<bool> {
    match pick(doc, keys)? {
        Value::Bool(value) => Some(*value),
        Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "y" | "1" => Some(true),
            "no" | "false" | "n" | "0" => Some(false),
            _ => None,
        },
        Value::Number(num) => num.as_f64().map(|v| v != 0.0),
        _ => None,
    }
}
