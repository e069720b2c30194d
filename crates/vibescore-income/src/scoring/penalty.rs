//! Additive, capped risk deductions applied after the weighted factor sum.

use super::ScoreContext;
use crate::domain::{NormalizedIncomeData, PenaltyItem, PenaltySummary};

/// Hard ceiling on the combined deduction, no matter how many items fire.
pub const MAX_PENALTY: f64 = 28.0;

const UNEMPLOYMENT_THRESHOLD_PCT: f64 = 6.0;
const VOLATILITY_THRESHOLD: f64 = 0.55;
const MISSING_KEY_THRESHOLD: usize = 4;

pub fn compute_penalties(data: &NormalizedIncomeData, ctx: &ScoreContext) -> PenaltySummary {
    let mut items = Vec::new();

    if let Some(rate) = data.unemployment_rate {
        let pct = rate * 100.0;
        if pct > UNEMPLOYMENT_THRESHOLD_PCT {
            items.push(PenaltyItem {
                id: "regional-unemployment",
                label: "Elevated regional unemployment",
                amount: ((pct - UNEMPLOYMENT_THRESHOLD_PCT) * 2.5).min(10.0),
            });
        }
    }

    if data.contract_renewal_pending {
        items.push(PenaltyItem {
            id: "contract-renewal",
            label: "Contract renewal pending",
            amount: 6.0,
        });
    }

    if data.major_expense_planned {
        items.push(PenaltyItem {
            id: "major-expense",
            label: "Major expense planned",
            amount: 4.0,
        });
    }

    if ctx.history.volatility > VOLATILITY_THRESHOLD {
        items.push(PenaltyItem {
            id: "income-volatility",
            label: "Volatile income history",
            amount: ((ctx.history.volatility - VOLATILITY_THRESHOLD) * 20.0).min(8.0),
        });
    }

    let missing = ctx.quality.missing.len();
    if missing >= MISSING_KEY_THRESHOLD {
        items.push(PenaltyItem {
            id: "missing-data",
            label: "Sparse profile data",
            amount: (((missing - (MISSING_KEY_THRESHOLD - 1)) as f64) * 1.5).min(6.0),
        });
    }

    let total = items
        .iter()
        .map(|item| item.amount)
        .sum::<f64>()
        .min(MAX_PENALTY);

    PenaltySummary { total, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::income_targets;
    use crate::domain::{DataQuality, HistoryAnalysis, ScoreOptions};

    fn empty_context(quality_missing: Vec<&'static str>, volatility: f64) -> ScoreContext {
        let options = ScoreOptions::default();
        ScoreContext {
            total_income: 0.0,
            adjusted_income: 0.0,
            region_cost_index: 100.0,
            history: HistoryAnalysis {
                volatility,
                ..HistoryAnalysis::default()
            },
            quality: DataQuality {
                score: 0.0,
                missing: quality_missing,
            },
            targets: income_targets(None, &options),
            options,
        }
    }

    #[test]
    fn no_signals_means_no_penalty() {
        let data = NormalizedIncomeData::default();
        let summary = compute_penalties(&data, &empty_context(Vec::new(), 0.0));
        assert_eq!(summary.total, 0.0);
        assert!(summary.items.is_empty());
    }

    #[test]
    fn unemployment_penalty_scales_and_caps() {
        let mut data = NormalizedIncomeData::default();
        data.unemployment_rate = Some(0.07);
        let mild = compute_penalties(&data, &empty_context(Vec::new(), 0.0));
        assert!((mild.total - 2.5).abs() < 1e-9);

        data.unemployment_rate = Some(0.15);
        let severe = compute_penalties(&data, &empty_context(Vec::new(), 0.0));
        assert_eq!(severe.total, 10.0);
    }

    #[test]
    fn flat_penalties_fire_on_flags() {
        let mut data = NormalizedIncomeData::default();
        data.contract_renewal_pending = true;
        data.major_expense_planned = true;
        let summary = compute_penalties(&data, &empty_context(Vec::new(), 0.0));
        assert_eq!(summary.total, 10.0);
        assert_eq!(summary.items.len(), 2);
    }

    #[test]
    fn volatility_penalty_needs_threshold() {
        let data = NormalizedIncomeData::default();
        let calm = compute_penalties(&data, &empty_context(Vec::new(), 0.5));
        assert_eq!(calm.total, 0.0);
        let churny = compute_penalties(&data, &empty_context(Vec::new(), 0.75));
        assert!((churny.total - 4.0).abs() < 1e-9);
        let extreme = compute_penalties(&data, &empty_context(Vec::new(), 2.0));
        assert_eq!(extreme.total, 8.0);
    }

    #[test]
    fn missing_data_penalty_needs_four_gaps() {
        let data = NormalizedIncomeData::default();
        let three = compute_penalties(&data, &empty_context(vec!["a", "b", "c"], 0.0));
        assert_eq!(three.total, 0.0);
        let four = compute_penalties(&data, &empty_context(vec!["a", "b", "c", "d"], 0.0));
        assert!((four.total - 1.5).abs() < 1e-9);
        let many = compute_penalties(
            &data,
            &empty_context(vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"], 0.0),
        );
        assert_eq!(many.items[0].amount, 6.0);
    }

    #[test]
    fn total_caps_at_maximum() {
        let mut data = NormalizedIncomeData::default();
        data.unemployment_rate = Some(0.20);
        data.contract_renewal_pending = true;
        data.major_expense_planned = true;
        let summary = compute_penalties(
            &data,
            &empty_context(vec!["a", "b", "c", "d", "e", "f", "g"], 3.0),
        );
        let item_sum: f64 = summary.items.iter().map(|i| i.amount).sum();
        assert!(item_sum > MAX_PENALTY);
        assert_eq!(summary.total, MAX_PENALTY);
    }
}
