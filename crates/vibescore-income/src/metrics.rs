//! Pure numeric primitives shared by the factor computators.

use crate::domain::{DataQuality, HistoryAnalysis, IncomeHistoryPoint};
use std::collections::BTreeMap;

/// Clamp into `[min, max]`, treating non-finite input as `min`.
pub fn clamp_score(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

/// Coerce to a finite number, falling back otherwise.
pub fn safe_number(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Disambiguate percent-vs-fraction inputs: anything with magnitude above
/// 1.5 is read as a 0..100 percentage.
pub fn percent_to_unit(value: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    if value.abs() > 1.5 {
        value / 100.0
    } else {
        value
    }
}

/// Diminishing-returns curve for "more is better but capped" metrics.
pub fn saturate(value: f64, pivot: f64) -> f64 {
    let v = safe_number(value, 0.0).max(0.0);
    let p = safe_number(pivot, 1.0).max(1.0);
    1.0 - (-v / p).exp()
}

/// Standard logistic centered at `midpoint`.
pub fn logistic(value: f64, midpoint: f64, steepness: f64) -> f64 {
    let v = safe_number(value, midpoint);
    1.0 / (1.0 + (-steepness * (v - midpoint)).exp())
}

/// Rewards proximity to a target ratio. Inside the tolerance band the score
/// rises linearly from 65 at the band edge to 100 at the sweet spot; outside
/// it decays via logistic tails that pass through 65 at the edges.
pub fn ratio_score(ratio: f64, sweet_spot: f64, tolerance: f64) -> f64 {
    let r = safe_number(ratio, 0.0);
    let tol = tolerance.abs().max(1e-6);
    let lower = sweet_spot - tol;
    let upper = sweet_spot + tol;
    let steepness = 3.0 / tol;

    let score = if r < lower {
        130.0 * logistic(r, lower, steepness)
    } else if r > upper {
        130.0 * (1.0 - logistic(r, upper, steepness))
    } else {
        65.0 + 35.0 * (1.0 - (r - sweet_spot).abs() / tol)
    };
    clamp_score(score, 0.0, 100.0)
}

/// Sum of squared shares over the nonzero amounts: 1.0 when fully
/// concentrated in one stream, lower as the distribution evens out.
pub fn herfindahl_index(amounts: &[f64]) -> f64 {
    let positives: Vec<f64> = amounts
        .iter()
        .copied()
        .filter(|a| a.is_finite() && *a > 0.0)
        .collect();
    let total: f64 = positives.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    positives
        .iter()
        .map(|a| {
            let share = a / total;
            share * share
        })
        .sum()
}

/// Population standard deviation over |mean|; 0 for empty input or zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let usable: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if usable.is_empty() {
        return 0.0;
    }
    let mean = usable.iter().sum::<f64>() / usable.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance =
        usable.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / usable.len() as f64;
    variance.sqrt() / mean.abs()
}

/// Deduplicate by month, sort ascending, and run ordinary least squares on a
/// month-index scale (days since the first point / 30). Returns a zeroed
/// record when there is nothing usable to fit.
pub fn analyze_income_history(history: &[IncomeHistoryPoint]) -> HistoryAnalysis {
    // Later entries for the same month win.
    let mut by_month: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for point in history {
        if point.amount.is_finite() && point.amount >= 0.0 {
            by_month.insert(point.month, point.amount);
        }
    }
    if by_month.is_empty() {
        return HistoryAnalysis::default();
    }

    let first = *by_month.keys().next().unwrap_or(&chrono::NaiveDate::MIN);
    let points: Vec<(f64, f64)> = by_month
        .iter()
        .map(|(month, amount)| (((*month - first).num_days() as f64) / 30.0, *amount))
        .collect();

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x) * (x - mean_x)).sum();
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let tss: f64 = points.iter().map(|(_, y)| (y - mean_y) * (y - mean_y)).sum();
    let rss: f64 = points
        .iter()
        .map(|(x, y)| {
            let fitted = intercept + slope * x;
            (y - fitted) * (y - fitted)
        })
        .sum();
    let r_squared = if tss > 0.0 {
        clamp_score(1.0 - rss / tss, 0.0, 1.0)
    } else {
        0.0
    };

    let slope_percent = if mean_y != 0.0 { slope / mean_y } else { 0.0 };
    let amounts: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    let volatility = coefficient_of_variation(&amounts);
    let recent_change_pct = recent_change(&amounts);
    let months_covered = points.last().map(|(x, _)| *x).unwrap_or(0.0);

    HistoryAnalysis {
        count: points.len(),
        mean: mean_y,
        slope,
        intercept,
        r_squared,
        slope_percent,
        volatility,
        recent_change_pct,
        months_covered,
    }
}

/// Percent change between the mean of the last 3 points and the mean of the
/// 3 before them; 0 without a full prior window or with a zero prior mean.
fn recent_change(amounts: &[f64]) -> f64 {
    if amounts.len() < 6 {
        return 0.0;
    }
    let recent: f64 = amounts[amounts.len() - 3..].iter().sum::<f64>() / 3.0;
    let prior: f64 = amounts[amounts.len() - 6..amounts.len() - 3].iter().sum::<f64>() / 3.0;
    if prior == 0.0 {
        return 0.0;
    }
    (recent - prior) / prior * 100.0
}

/// Weighted presence check over the importance table: `score` is the
/// percentage of weight carried by supplied fields, `missing` lists the rest.
pub fn data_presence_score(
    weights: &[(&'static str, f64)],
    has_value: impl Fn(&'static str) -> bool,
) -> DataQuality {
    let mut total = 0.0;
    let mut available = 0.0;
    let mut missing = Vec::new();
    for (key, weight) in weights {
        total += weight;
        if has_value(key) {
            available += weight;
        } else {
            missing.push(*key);
        }
    }
    let score = if total > 0.0 {
        100.0 * available / total
    } else {
        0.0
    };
    DataQuality { score, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).expect("valid month anchor")
    }

    fn series(amounts: &[f64]) -> Vec<IncomeHistoryPoint> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| IncomeHistoryPoint {
                month: month(2025, 1) + chrono::Duration::days(30 * i as i64),
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn clamp_treats_non_finite_as_min() {
        assert_eq!(clamp_score(f64::NAN, 0.0, 100.0), 0.0);
        assert_eq!(clamp_score(f64::INFINITY, 0.0, 100.0), 0.0);
        assert_eq!(clamp_score(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp_score(55.5, 0.0, 100.0), 55.5);
    }

    #[test]
    fn percent_to_unit_disambiguates() {
        assert_eq!(percent_to_unit(45.0, 0.0), 0.45);
        assert_eq!(percent_to_unit(0.45, 0.0), 0.45);
        assert_eq!(percent_to_unit(1.2, 0.0), 1.2);
        assert_eq!(percent_to_unit(f64::NAN, 0.3), 0.3);
    }

    #[test]
    fn saturate_is_bounded_and_monotone() {
        assert_eq!(saturate(0.0, 1000.0), 0.0);
        let low = saturate(500.0, 1000.0);
        let high = saturate(2000.0, 1000.0);
        assert!(low < high);
        assert!(high < 1.0);
        assert_eq!(saturate(-50.0, 1000.0), 0.0);
    }

    #[test]
    fn ratio_score_peaks_at_sweet_spot() {
        let peak = ratio_score(1.25, 1.25, 0.4);
        let edge = ratio_score(0.85, 1.25, 0.4);
        let below = ratio_score(0.4, 1.25, 0.4);
        let above = ratio_score(3.5, 1.25, 0.4);
        assert_eq!(peak, 100.0);
        assert!((edge - 65.0).abs() < 1.0);
        assert!(below < 30.0);
        assert!(above < 65.0);
    }

    #[test]
    fn herfindahl_is_one_for_single_stream() {
        assert_eq!(herfindahl_index(&[4200.0]), 1.0);
        let even = herfindahl_index(&[1000.0, 1000.0]);
        assert!((even - 0.5).abs() < 1e-9);
        assert_eq!(herfindahl_index(&[]), 0.0);
        assert_eq!(herfindahl_index(&[0.0, -20.0]), 0.0);
    }

    #[test]
    fn coefficient_of_variation_handles_degenerate_input() {
        assert_eq!(coefficient_of_variation(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[1200.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0);
        assert!(coefficient_of_variation(&[100.0, 300.0]) > 0.0);
    }

    #[test]
    fn history_regression_recovers_linear_trend() {
        let analysis = analyze_income_history(&series(&[1000.0, 1100.0, 1200.0, 1300.0]));
        assert_eq!(analysis.count, 4);
        assert!((analysis.slope - 100.0).abs() < 1.0);
        assert!(analysis.r_squared > 0.999);
        assert!(analysis.slope_percent > 0.0);
    }

    #[test]
    fn flat_history_has_zero_fit_and_zero_slope() {
        let analysis = analyze_income_history(&series(&[2000.0, 2000.0, 2000.0]));
        assert_eq!(analysis.slope, 0.0);
        assert_eq!(analysis.r_squared, 0.0);
        assert_eq!(analysis.volatility, 0.0);
    }

    #[test]
    fn duplicate_months_collapse_to_latest_value() {
        let mut points = series(&[1000.0, 1500.0]);
        points.push(IncomeHistoryPoint {
            month: points[0].month,
            amount: 900.0,
        });
        let analysis = analyze_income_history(&points);
        assert_eq!(analysis.count, 2);
        assert!((analysis.mean - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn recent_change_needs_six_points() {
        let short = analyze_income_history(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(short.recent_change_pct, 0.0);

        let long = analyze_income_history(&series(&[
            1000.0, 1000.0, 1000.0, 1200.0, 1200.0, 1200.0,
        ]));
        assert!((long.recent_change_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_yields_neutral_record() {
        let analysis = analyze_income_history(&[]);
        assert_eq!(analysis.count, 0);
        assert_eq!(analysis.slope, 0.0);
        assert_eq!(analysis.volatility, 0.0);
    }

    #[test]
    fn presence_score_splits_weight() {
        let weights: &[(&'static str, f64)] = &[("a", 2.0), ("b", 1.0), ("c", 1.0)];
        let quality = data_presence_score(weights, |key| key == "a");
        assert_eq!(quality.score, 50.0);
        assert_eq!(quality.missing, vec!["b", "c"]);
    }
}
