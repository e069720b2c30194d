//! Conversion of arbitrary raw profile documents into the canonical record.
//!
//! Handles the adult schema (many field aliases per concept) and the youth
//! questionnaire schema through one explicit normalization stage. The input
//! document is only ever borrowed; nothing mutates the caller's data.

mod aliases;
mod streams;
mod youth;

use crate::age::{age_in_years, decode_date};
use crate::domain::{
    IncomeHistoryPoint, IncomeStream, NormalizedIncomeData, ScoreOptions, StreamKind,
};
use aliases::Doc;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::debug;

const DAYS_PER_MONTH: f64 = 30.4375;
const YOUTH_AGE_CUTOFF: f64 = 17.0;

const STREAM_FIELD_ALIASES: [(StreamKind, &[&str]); 8] = [
    (StreamKind::Primary, aliases::PRIMARY_INCOME),
    (StreamKind::Additional, aliases::ADDITIONAL_INCOME),
    (StreamKind::Bonus, aliases::BONUS_INCOME),
    (StreamKind::Commission, aliases::COMMISSION_INCOME),
    (StreamKind::Passive, aliases::PASSIVE_INCOME),
    (StreamKind::Rental, aliases::RENTAL_INCOME),
    (StreamKind::Side, aliases::SIDE_INCOME),
    (StreamKind::Other, aliases::OTHER_INCOME),
];

/// Normalize a raw profile document. Total over any JSON shape: non-object
/// input produces the defaulted record.
pub fn normalize_income_data(raw: &Value, options: &ScoreOptions) -> NormalizedIncomeData {
    normalize_with_today(raw, options, Utc::now().date_naive())
}

/// Same as [`normalize_income_data`] with an injected "today" for
/// deterministic age and tenure computation.
pub fn normalize_with_today(
    raw: &Value,
    options: &ScoreOptions,
    today: NaiveDate,
) -> NormalizedIncomeData {
    let empty = Doc::new();
    let doc = raw.as_object().unwrap_or(&empty);
    let mut data = NormalizedIncomeData::default();

    // Step 1: canonical stream fields.
    for (kind, keys) in STREAM_FIELD_ALIASES {
        if let Some(amount) = aliases::non_negative(doc, keys) {
            data.amounts.add(kind, amount);
        }
    }

    // Step 2: an aggregate monthly-income field larger than the resolved
    // primary routes its surplus into additional income instead of
    // overwriting primary.
    if let Some(aggregate) = aliases::non_negative(doc, aliases::AGGREGATE_INCOME) {
        let surplus = aggregate - data.amounts.primary_income;
        if surplus > 0.0 {
            data.amounts.add(StreamKind::Additional, surplus);
        }
    }

    // Step 3: explicit stream array, classified by keyword rules.
    if let Some(Value::Array(entries)) = aliases::pick(doc, aliases::STREAM_ARRAY) {
        apply_stream_array(entries, &mut data);
    }

    // Step 4: scalar fields via pick-first-present aliasing.
    apply_scalars(doc, &mut data);

    // Step 5: tenure.
    data.tenure_months = resolve_tenure(doc, today);

    // Age metadata ahead of the youth dispatch.
    data.birth_date = aliases::pick(doc, aliases::BIRTH_DATE).and_then(decode_date);
    data.age = aliases::number(doc, aliases::AGE).or_else(|| {
        data.birth_date
            .map(|birth| age_in_years(birth, today))
    });

    // Step 6: youth questionnaire reinterpretation.
    let is_youth =
        data.age.is_some_and(|age| age <= YOUTH_AGE_CUTOFF) || youth::has_youth_fields(doc);
    if is_youth {
        debug!(age = ?data.age, "normalizing youth questionnaire schema");
        youth::apply_youth_schema(doc, &mut data, options);
    }

    // Step 7: nested profile overrides win over everything derived above.
    if let Some(Value::Object(overrides)) = aliases::pick(doc, aliases::PROFILE_OVERRIDE) {
        apply_overrides(overrides, &mut data, today);
    }

    if data.income_streams.is_empty() {
        data.income_streams = data
            .amounts
            .nonzero()
            .into_iter()
            .map(|(kind, amount)| IncomeStream {
                kind,
                category: kind.label().to_string(),
                amount,
            })
            .collect();
    }

    data
}

fn apply_stream_array(entries: &[Value], data: &mut NormalizedIncomeData) {
    let mut primary_assigned = false;
    for entry in entries.iter().filter_map(streams::decode_entry) {
        let kind = match streams::classify(&entry.hint) {
            Some(kind) => kind,
            // The first unlabeled entry is taken as the primary source; the
            // rest are bucketed as additional income.
            None if !primary_assigned => StreamKind::Primary,
            None => StreamKind::Additional,
        };
        if kind == StreamKind::Primary {
            primary_assigned = true;
        }
        data.amounts.add(kind, entry.amount);
        data.income_streams.push(IncomeStream {
            kind,
            category: if entry.category.is_empty() {
                kind.label().to_string()
            } else {
                entry.category
            },
            amount: entry.amount,
        });
    }
}

/// Scalar resolution shared by the base document and the override object:
/// only fields actually present overwrite the record.
fn apply_scalars(doc: &Doc, data: &mut NormalizedIncomeData) {
    if let Some(value) = aliases::non_negative(doc, aliases::MONTHLY_EXPENSES) {
        data.monthly_expenses = Some(value);
    }
    if let Some(value) = aliases::non_negative(doc, aliases::ESSENTIAL_EXPENSES) {
        data.essential_expenses = Some(value);
    }
    if let Some(value) = aliases::fraction(doc, aliases::SAVINGS_RATE) {
        data.savings_rate = Some(value);
    }
    if let Some(value) = aliases::non_negative(doc, aliases::EMERGENCY_MONTHS) {
        data.emergency_fund_months = Some(value);
    }
    if let Some(value) = aliases::label(doc, aliases::EMPLOYMENT_TYPE) {
        data.employment_type = Some(value);
    }
    if let Some(value) = aliases::label(doc, aliases::INDUSTRY_RISK) {
        data.industry_risk = Some(value);
    }
    if let Some(value) = aliases::label(doc, aliases::BONUS_RELIABILITY) {
        data.bonus_reliability = Some(value);
    }
    if let Some(value) = aliases::label(doc, aliases::HIRING_TREND) {
        data.hiring_trend = Some(value);
    }
    if let Some(value) = aliases::label(doc, aliases::SKILL_DEMAND) {
        data.skill_demand = Some(value);
    }
    if let Some(value) = aliases::fraction(doc, aliases::PROMOTION_PIPELINE) {
        data.promotion_pipeline = Some(value);
    }
    if let Some(value) = aliases::fraction(doc, aliases::UPSKILLING) {
        data.upskilling_progress = Some(value);
    }
    if let Some(value) = aliases::fraction(doc, aliases::ROLE_SATISFACTION) {
        data.role_satisfaction = Some(value);
    }
    if let Some(value) = aliases::number(doc, aliases::REGION_COST_INDEX) {
        data.region_cost_index = Some(value.max(0.0));
    }
    if let Some(value) = aliases::fraction(doc, aliases::DEBT_TO_INCOME) {
        data.debt_to_income = Some(value.max(0.0));
    }
    if let Some(value) = aliases::fraction(doc, aliases::INCOME_PROTECTION) {
        data.income_protection = Some(value.clamp(0.0, 1.0));
    }
    if let Some(value) = aliases::fraction(doc, aliases::UNEMPLOYMENT_RATE) {
        data.unemployment_rate = Some(value.max(0.0));
    }
    if let Some(value) = aliases::label(doc, aliases::PAY_FREQUENCY) {
        data.pay_frequency = Some(value);
    }
    if let Some(value) = aliases::non_negative(doc, aliases::LAYOFF_COUNT) {
        data.layoff_count = value;
    }
    if let Some(value) = aliases::fraction(doc, aliases::BENEFITS_COVERAGE) {
        data.benefits_coverage = Some(value.clamp(0.0, 1.0));
    }
    if let Some(value) = aliases::flag(doc, aliases::CONTRACT_RENEWAL) {
        data.contract_renewal_pending = value;
    }
    if let Some(value) = aliases::flag(doc, aliases::MAJOR_EXPENSE) {
        data.major_expense_planned = value;
    }
    if let Some(history) = aliases::pick(doc, aliases::INCOME_HISTORY) {
        let parsed = parse_history(history);
        if !parsed.is_empty() {
            data.income_history = parsed;
        }
    }
}

fn apply_overrides(overrides: &Doc, data: &mut NormalizedIncomeData, today: NaiveDate) {
    for (kind, keys) in STREAM_FIELD_ALIASES {
        if let Some(amount) = aliases::non_negative(overrides, keys) {
            data.amounts.set(kind, amount);
        }
    }
    apply_scalars(overrides, data);
    if let Some(months) = aliases::non_negative(overrides, aliases::TENURE_MONTHS) {
        data.tenure_months = months;
    } else if aliases::pick(overrides, aliases::EMPLOYMENT_START).is_some() {
        data.tenure_months = resolve_tenure(overrides, today);
    }
    // savingsRateOverride maps onto the savings rate fields together.
    if let Some(rate) = aliases::fraction(overrides, aliases::SAVINGS_RATE_OVERRIDE) {
        data.savings_rate = Some(rate);
    }
}

fn resolve_tenure(doc: &Doc, today: NaiveDate) -> f64 {
    if let Some(months) = aliases::non_negative(doc, aliases::TENURE_MONTHS) {
        return months;
    }
    if let Some(years) = aliases::non_negative(doc, aliases::TENURE_YEARS) {
        return years * 12.0;
    }
    if let Some(start) = aliases::pick(doc, aliases::EMPLOYMENT_START).and_then(decode_date) {
        let days = (today - start).num_days() as f64;
        return (days / DAYS_PER_MONTH).max(0.0);
    }
    0.0
}

fn parse_history(value: &Value) -> Vec<IncomeHistoryPoint> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let map = entry.as_object()?;
            let month = ["month", "date", "period"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(decode_month)?;
            let amount = ["amount", "value", "income", "total"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(aliases::coerce_number)?
                .max(0.0);
            Some(IncomeHistoryPoint { month, amount })
        })
        .collect()
}

fn decode_month(value: &Value) -> Option<NaiveDate> {
    if let Some(date) = decode_date(value) {
        return Some(date);
    }
    // Bare `YYYY-MM` anchors to the first of the month.
    let raw = value.as_str()?.trim();
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
}
