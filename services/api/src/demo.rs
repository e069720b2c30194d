use crate::error::AppError;
use clap::Args;
use serde_json::{json, Value};
use vibescore_income::{compute_income_score, ScoreOptions, ScoreResult};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only render the youth questionnaire profile
    #[arg(long)]
    pub(crate) youth_only: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let options = ScoreOptions::default();

    if !args.youth_only {
        let adult = adult_profile();
        render("Established adult profile", &compute_income_score(&adult, &options));
    }

    let youth = youth_profile();
    render("Youth questionnaire profile", &compute_income_score(&youth, &options));

    Ok(())
}

fn adult_profile() -> Value {
    json!({
        "age": 38,
        "grossMonthlyIncome": 8200,
        "incomeStreams": [
            {"type": "salary", "label": "Engineering salary", "amount": 7200},
            {"type": "rental", "label": "Duplex unit", "amount": 700},
            {"type": "dividends", "label": "Index fund", "amount": 300}
        ],
        "monthlyExpenses": 5100,
        "essentialExpenses": 3600,
        "savingsRate": 0.18,
        "emergencyFundMonths": 4.5,
        "employmentType": "salaried",
        "industryRisk": "low",
        "tenureMonths": 52,
        "payFrequency": "biweekly",
        "debtToIncome": 0.24,
        "regionCostIndex": 112,
        "incomeHistory": [
            {"month": "2025-09", "amount": 7600},
            {"month": "2025-10", "amount": 7800},
            {"month": "2025-11", "amount": 7750},
            {"month": "2025-12", "amount": 8100},
            {"month": "2026-01", "amount": 8150},
            {"month": "2026-02", "amount": 8200}
        ]
    })
}

fn youth_profile() -> Value {
    json!({
        "age": 15,
        "youthHasIncome": true,
        "youthPrimaryIncomeSource": "part-time-job",
        "youthIncomeFrequency": "biweekly",
        "youthTypicalMonthlyIncome": 420,
        "youthHasCurrentSavings": true,
        "youthSavingsAmount": 650,
        "youthHasEmergencyBuffer": true,
        "youthHasHeldJob": true
    })
}

fn render(title: &str, result: &ScoreResult) {
    println!("{title}");
    println!(
        "Score {:.1} (base {:.1}, penalty {:.1})",
        result.score, result.base_score, result.penalty.total
    );
    println!(
        "Income {:.0}/mo, adjusted {:.0} at cost index {:.0}",
        result.total_income, result.adjusted_income, result.region_cost_index
    );

    println!("\nFactor breakdown");
    for entry in result.breakdown.values() {
        println!(
            "- {:<16} {:>5.1} x {:.2} = {:>5.2}",
            entry.factor.label, entry.factor.score, entry.weight, entry.contribution
        );
    }

    if result.penalty.items.is_empty() {
        println!("\nPenalties: none");
    } else {
        println!("\nPenalties");
        for item in &result.penalty.items {
            println!("- {} ({:.1})", item.label, item.amount);
        }
    }

    if !result.quality.missing.is_empty() {
        println!(
            "\nMissing data ({:.0}% quality): {}",
            result.quality.score,
            result.quality.missing.join(", ")
        );
    }
    println!();
}
