use serde_json::{json, Value};
use vibescore_income::{
    compute_income_score, FactorId, ScoreOptions, ScoreResult, FACTOR_WEIGHTS, MAX_PENALTY,
};

fn score(data: Value) -> ScoreResult {
    compute_income_score(&data, &ScoreOptions::default())
}

fn factor_score(result: &ScoreResult, id: FactorId) -> f64 {
    result
        .breakdown
        .get(id.key())
        .expect("factor present in breakdown")
        .factor
        .score
}

fn sample_documents() -> Vec<Value> {
    vec![
        json!({}),
        json!({"primaryIncome": 5200, "monthlyExpenses": 3400, "savingsRate": 0.22}),
        json!({
            "grossMonthlyIncome": 11000,
            "incomeStreams": [
                {"type": "salary", "amount": 9000},
                {"type": "rental", "amount": 1200},
                {"type": "dividends", "amount": 800}
            ],
            "employmentType": "salaried",
            "industryRisk": "low",
            "tenureMonths": 40,
            "debtToIncome": 0.28,
            "regionCostIndex": 140,
            "incomeHistory": [
                {"month": "2025-09", "amount": 9800},
                {"month": "2025-10", "amount": 10100},
                {"month": "2025-11", "amount": 10000},
                {"month": "2025-12", "amount": 10600},
                {"month": "2026-01", "amount": 10900},
                {"month": "2026-02", "amount": 11200}
            ]
        }),
        json!({
            "primaryIncome": "not a number",
            "monthlyExpenses": -300,
            "employmentType": "interdimensional courier",
            "savingsRate": 900,
            "incomeHistory": [{"month": "garbage", "amount": "??"}]
        }),
        json!({
            "age": 15,
            "youthHasIncome": true,
            "youthPrimaryIncomeSource": "part-time-job",
            "youthTypicalMonthlyIncome": 420
        }),
        json!({
            "primaryIncome": 2600,
            "sideIncome": 700,
            "contractRenewalPending": true,
            "majorExpensePlanned": true,
            "regionalUnemploymentRate": 9.5,
            "incomeHistory": [
                {"month": "2025-11", "amount": 400},
                {"month": "2025-12", "amount": 3900},
                {"month": "2026-01", "amount": 300},
                {"month": "2026-02", "amount": 4100}
            ]
        }),
    ]
}

#[test]
fn invariants_hold_across_input_shapes() {
    for document in sample_documents() {
        let result = score(document.clone());
        assert!(
            (0.0..=100.0).contains(&result.score),
            "score out of bounds for {document}"
        );
        assert!((0.0..=100.0).contains(&result.base_score));
        assert!(result.penalty.total <= MAX_PENALTY);
        for (id, _) in FACTOR_WEIGHTS {
            let factor = factor_score(&result, id);
            assert!(
                (0.0..=100.0).contains(&factor),
                "{id:?} out of bounds for {document}"
            );
        }
        let reconstructed = (result.base_score - result.penalty.total).clamp(0.0, 100.0);
        assert!((result.score - reconstructed).abs() < 1e-9);
    }
}

#[test]
fn factor_weights_sum_to_exactly_one() {
    let sum: f64 = FACTOR_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    assert_eq!(sum, 1.0);
}

#[test]
fn breakdown_carries_weights_and_contributions() {
    let result = score(json!({"primaryIncome": 6200}));
    for (id, weight) in FACTOR_WEIGHTS {
        let entry = result.breakdown.get(id.key()).expect("factor present");
        assert_eq!(entry.weight, weight);
        assert!((entry.contribution - weight * entry.factor.score).abs() < 1e-9);
    }
}

#[test]
fn zero_income_streams_zero_total_and_diversity() {
    let result = score(json!({"savingsRate": 0.3}));
    assert_eq!(result.total_income, 0.0);
    assert_eq!(factor_score(&result, FactorId::Diversity), 0.0);
}

#[test]
fn diversity_ignores_stream_order() {
    let forward = score(json!({"incomeStreams": [
        {"type": "salary", "amount": 4000},
        {"type": "commission", "amount": 900},
        {"type": "rental", "amount": 1100}
    ]}));
    let reversed = score(json!({"incomeStreams": [
        {"type": "rental", "amount": 1100},
        {"type": "commission", "amount": 900},
        {"type": "salary", "amount": 4000}
    ]}));
    let a = factor_score(&forward, FactorId::Diversity);
    let b = factor_score(&reversed, FactorId::Diversity);
    assert!((a - b).abs() < 1e-9);
}

#[test]
fn raising_latest_history_point_never_hurts_momentum() {
    let base_history = vec![4000.0, 4100.0, 4050.0, 4200.0, 4150.0, 4250.0];
    let document = |last: f64| {
        let months = ["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"];
        let points: Vec<Value> = months
            .iter()
            .enumerate()
            .map(|(i, month)| {
                let amount = if i == months.len() - 1 {
                    last
                } else {
                    base_history[i]
                };
                json!({"month": month, "amount": amount})
            })
            .collect();
        json!({"primaryIncome": 4200, "incomeHistory": points})
    };

    let mut previous_recent = f64::MIN;
    for last in [4250.0, 4500.0, 5000.0, 6000.0] {
        let result = score(document(last));
        let recent = result
            .breakdown
            .get(FactorId::Momentum.key())
            .and_then(|entry| entry.factor.details.get("recentComponent"))
            .and_then(Value::as_f64)
            .expect("recent component recorded");
        assert!(recent >= previous_recent);
        previous_recent = recent;
    }
}

#[test]
fn supportive_youth_scenario() {
    let result = score(json!({
        "age": 15,
        "youthHasIncome": true,
        "youthPrimaryIncomeSource": "part-time-job",
        "youthIncomeFrequency": "biweekly",
        "youthTypicalMonthlyIncome": 420,
        "youthHasCurrentSavings": true,
        "youthSavingsAmount": 650,
        "youthHasEmergencyBuffer": true
    }));
    assert!((result.total_income - 420.0).abs() < 1e-9);
    assert!(factor_score(&result, FactorId::Resilience) > 55.0);
    assert!(result.penalty.total < 8.0);
    assert_eq!(result.demographics.bracket, Some("13-15"));
}

#[test]
fn stressed_youth_scores_well_below_supportive() {
    let supportive = score(json!({
        "age": 15,
        "youthHasIncome": true,
        "youthPrimaryIncomeSource": "part-time-job",
        "youthIncomeFrequency": "biweekly",
        "youthTypicalMonthlyIncome": 420,
        "youthHasCurrentSavings": true,
        "youthSavingsAmount": 650,
        "youthHasEmergencyBuffer": true
    }));
    let stressed = score(json!({
        "age": 15,
        "youthHasIncome": true,
        "youthPrimaryIncomeSource": "part-time-job",
        "youthIncomeFrequency": "biweekly",
        "youthTypicalMonthlyIncome": 120,
        "youthRanOutOfMoney": true
    }));

    assert!(supportive.score - stressed.score >= 18.0);
    let resilience_gap = factor_score(&supportive, FactorId::Resilience)
        - factor_score(&stressed, FactorId::Resilience);
    assert!(resilience_gap >= 15.0);
    assert!(stressed.penalty.total > supportive.penalty.total);
}

#[test]
fn region_cost_index_scales_adjusted_income_exactly() {
    let profile = |region: f64| {
        json!({
            "primaryIncome": 7000,
            "monthlyExpenses": 4200,
            "employmentType": "salaried",
            "regionCostIndex": region
        })
    };
    let baseline = score(profile(100.0));
    let expensive = score(profile(150.0));

    assert!((baseline.adjusted_income - 7000.0).abs() < 1e-9);
    assert!((expensive.adjusted_income - 7000.0 * (100.0 / 150.0)).abs() < 1e-9);
    assert!(
        factor_score(&expensive, FactorId::EarningPower)
            <= factor_score(&baseline, FactorId::EarningPower)
    );
}

#[test]
fn empty_profile_reports_all_missing_keys() {
    let result = score(json!({}));
    assert_eq!(result.total_income, 0.0);
    assert_eq!(result.quality.missing.len(), 10);
    assert!(result.quality.missing.contains(&"incomeStreams"));
    assert!(result.quality.missing.contains(&"incomeHistory"));
    assert!(!result.diagnostics.history_sufficient);
}

#[test]
fn result_serializes_to_camel_case_json() {
    let result = score(json!({"primaryIncome": 5200}));
    let value = serde_json::to_value(&result).expect("result serializes");
    assert!(value.get("baseScore").is_some());
    assert!(value.get("totalIncome").is_some());
    assert!(value["penalty"].get("total").is_some());
    assert!(value["breakdown"].get("earning_power").is_some());
}
