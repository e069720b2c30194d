use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The eight canonical income stream kinds every normalized record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Primary,
    Additional,
    Bonus,
    Commission,
    Passive,
    Rental,
    Side,
    Other,
}

impl StreamKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Primary,
            Self::Additional,
            Self::Bonus,
            Self::Commission,
            Self::Passive,
            Self::Rental,
            Self::Side,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Additional => "Additional",
            Self::Bonus => "Bonus",
            Self::Commission => "Commission",
            Self::Passive => "Passive",
            Self::Rental => "Rental",
            Self::Side => "Side",
            Self::Other => "Other",
        }
    }
}

/// Monthly amounts for the eight canonical streams, always all present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamAmounts {
    pub primary_income: f64,
    pub additional_income: f64,
    pub bonus_income: f64,
    pub commission_income: f64,
    pub passive_income: f64,
    pub rental_income: f64,
    pub side_income: f64,
    pub other_income: f64,
}

impl StreamAmounts {
    pub fn get(&self, kind: StreamKind) -> f64 {
        match kind {
            StreamKind::Primary => self.primary_income,
            StreamKind::Additional => self.additional_income,
            StreamKind::Bonus => self.bonus_income,
            StreamKind::Commission => self.commission_income,
            StreamKind::Passive => self.passive_income,
            StreamKind::Rental => self.rental_income,
            StreamKind::Side => self.side_income,
            StreamKind::Other => self.other_income,
        }
    }

    pub fn add(&mut self, kind: StreamKind, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        *self.slot(kind) += amount;
    }

    /// Overwrite a stream amount, coercing to a non-negative finite value.
    pub fn set(&mut self, kind: StreamKind, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        *self.slot(kind) = amount;
    }

    fn slot(&mut self, kind: StreamKind) -> &mut f64 {
        match kind {
            StreamKind::Primary => &mut self.primary_income,
            StreamKind::Additional => &mut self.additional_income,
            StreamKind::Bonus => &mut self.bonus_income,
            StreamKind::Commission => &mut self.commission_income,
            StreamKind::Passive => &mut self.passive_income,
            StreamKind::Rental => &mut self.rental_income,
            StreamKind::Side => &mut self.side_income,
            StreamKind::Other => &mut self.other_income,
        }
    }

    pub fn total(&self) -> f64 {
        StreamKind::ordered().iter().map(|kind| self.get(*kind)).sum()
    }

    /// Nonzero amounts in canonical kind order, independent of input ordering.
    pub fn nonzero(&self) -> Vec<(StreamKind, f64)> {
        StreamKind::ordered()
            .into_iter()
            .filter_map(|kind| {
                let amount = self.get(kind);
                (amount > 0.0).then_some((kind, amount))
            })
            .collect()
    }
}

/// One categorized monthly income source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStream {
    pub kind: StreamKind,
    pub category: String,
    pub amount: f64,
}

/// One point of the user's income history, anchored to a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeHistoryPoint {
    pub month: NaiveDate,
    pub amount: f64,
}

/// Canonical record the normalizer produces from any raw profile document.
///
/// Percent-like fields are unit fractions (0..1) after disambiguation;
/// every stream amount is non-negative.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIncomeData {
    #[serde(flatten)]
    pub amounts: StreamAmounts,
    pub income_streams: Vec<IncomeStream>,
    pub monthly_expenses: Option<f64>,
    pub essential_expenses: Option<f64>,
    pub essential_expense_share: Option<f64>,
    pub savings_rate: Option<f64>,
    pub emergency_fund_months: Option<f64>,
    pub employment_type: Option<String>,
    pub industry_risk: Option<String>,
    pub bonus_reliability: Option<String>,
    pub hiring_trend: Option<String>,
    pub skill_demand: Option<String>,
    pub promotion_pipeline: Option<f64>,
    pub upskilling_progress: Option<f64>,
    pub role_satisfaction: Option<f64>,
    pub region_cost_index: Option<f64>,
    pub debt_to_income: Option<f64>,
    pub income_protection: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub tenure_months: f64,
    pub pay_frequency: Option<String>,
    pub layoff_count: f64,
    pub benefits_coverage: Option<f64>,
    pub contract_renewal_pending: bool,
    pub major_expense_planned: bool,
    pub income_history: Vec<IncomeHistoryPoint>,
    pub age: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub is_youth: bool,
    /// Youth questionnaire booleans, preserved verbatim for display layers.
    pub youth_flags: BTreeMap<String, bool>,
}

/// The seven scored dimensions of income quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorId {
    EarningPower,
    ExpenseCoverage,
    Stability,
    Diversity,
    Momentum,
    Resilience,
    Opportunity,
}

impl FactorId {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EarningPower => "Earning Power",
            Self::ExpenseCoverage => "Expense Coverage",
            Self::Stability => "Stability",
            Self::Diversity => "Diversity",
            Self::Momentum => "Momentum",
            Self::Resilience => "Resilience",
            Self::Opportunity => "Opportunity",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::EarningPower => "earning_power",
            Self::ExpenseCoverage => "expense_coverage",
            Self::Stability => "stability",
            Self::Diversity => "diversity",
            Self::Momentum => "momentum",
            Self::Resilience => "resilience",
            Self::Opportunity => "opportunity",
        }
    }
}

/// Score for one factor plus the intermediate values behind it.
///
/// `details` exists for explainability and audits only; nothing downstream
/// feeds it back into scoring.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorResult {
    pub id: FactorId,
    pub label: &'static str,
    pub score: f64,
    pub details: BTreeMap<&'static str, Value>,
}

impl FactorResult {
    pub fn new(id: FactorId, score: f64, details: BTreeMap<&'static str, Value>) -> Self {
        Self {
            id,
            label: id.label(),
            score,
            details,
        }
    }
}

/// A named, capped additive deduction representing one risk signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyItem {
    pub id: &'static str,
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltySummary {
    pub total: f64,
    pub items: Vec<PenaltyItem>,
}

/// Weighted fraction of important fields actually supplied in the input.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub score: f64,
    pub missing: Vec<&'static str>,
}

/// Regression summary over the income history.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAnalysis {
    pub count: usize,
    pub mean: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub slope_percent: f64,
    pub volatility: f64,
    pub recent_change_pct: f64,
    pub months_covered: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    #[serde(flatten)]
    pub factor: FactorResult,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age: Option<f64>,
    pub bracket: Option<&'static str>,
    pub baseline_monthly_income: f64,
    pub strong_income_cap: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub missing_fields: Vec<&'static str>,
    pub history_sufficient: bool,
    pub history_months: f64,
}

/// Complete, always-well-formed output of one scoring call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: f64,
    pub base_score: f64,
    pub total_income: f64,
    pub adjusted_income: f64,
    pub region_cost_index: f64,
    pub penalty: PenaltySummary,
    pub breakdown: BTreeMap<&'static str, FactorBreakdown>,
    pub quality: DataQuality,
    pub history: HistoryAnalysis,
    pub demographics: Demographics,
    pub diagnostics: Diagnostics,
}

/// Caller-tunable reference points; every field has a documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreOptions {
    pub baseline_monthly_income: f64,
    pub strong_income_cap: f64,
    pub essential_expense_fallback_ratio: f64,
    pub expense_fallback_ratio: f64,
    pub desired_savings_rate: f64,
    pub ideal_emergency_months: f64,
    pub max_streams_considered: usize,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            baseline_monthly_income: 6500.0,
            strong_income_cap: 14500.0,
            essential_expense_fallback_ratio: 0.65,
            expense_fallback_ratio: 0.82,
            desired_savings_rate: 0.20,
            ideal_emergency_months: 6.0,
            max_streams_considered: 6,
        }
    }
}
