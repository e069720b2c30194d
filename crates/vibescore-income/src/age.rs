//! Heterogeneous date/age decoding and income-expectation brackets.

use crate::domain::ScoreOptions;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::Value;

/// Decode a birth date (or any date) from the shapes user documents carry:
/// ISO-8601 strings, `YYYY-MM-DD`, epoch milliseconds (> 1e12), epoch
/// seconds (> 1e9), serialized `{seconds, nanoseconds}` timestamps, or a
/// `{year, month, day}` object. One branch per shape, `None` otherwise.
pub fn decode_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(raw) => decode_date_string(raw),
        Value::Number(num) => num.as_f64().and_then(decode_epoch),
        Value::Object(map) => {
            if let Some(seconds) = number_field(map, &["seconds", "_seconds"]) {
                return DateTime::<Utc>::from_timestamp(seconds as i64, 0)
                    .map(|dt| dt.date_naive());
            }
            let year = number_field(map, &["year"])?;
            let month = number_field(map, &["month"])?;
            let day = number_field(map, &["day"]).unwrap_or(1.0);
            NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        }
        _ => None,
    }
}

fn decode_date_string(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn decode_epoch(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let seconds = if value > 1e12 {
        value / 1000.0
    } else if value > 1e9 {
        value
    } else {
        return None;
    };
    DateTime::<Utc>::from_timestamp(seconds as i64, 0).map(|dt| dt.date_naive())
}

fn number_field(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| map.get(*key))
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

/// Calendar-year age, decremented when the birthday has not yet occurred
/// this year, clamped to [0, 130].
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> f64 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.clamp(0, 130) as f64
}

/// One row of the ordered expectation table: inclusive age range mapped to
/// annual income expectations.
#[derive(Debug, Clone, Copy)]
pub struct AgeBracket {
    pub label: &'static str,
    pub min_age: f64,
    pub max_age: f64,
    pub annual_min: f64,
    pub annual_max: f64,
    pub annual_mid: Option<f64>,
}

pub const AGE_BRACKETS: [AgeBracket; 7] = [
    AgeBracket {
        label: "13-15",
        min_age: 13.0,
        max_age: 15.0,
        annual_min: 0.0,
        annual_max: 4_800.0,
        annual_mid: Some(2_400.0),
    },
    AgeBracket {
        label: "16-19",
        min_age: 16.0,
        max_age: 19.0,
        annual_min: 2_400.0,
        annual_max: 18_000.0,
        annual_mid: Some(7_200.0),
    },
    AgeBracket {
        label: "20-24",
        min_age: 20.0,
        max_age: 24.0,
        annual_min: 18_000.0,
        annual_max: 52_000.0,
        annual_mid: Some(32_000.0),
    },
    AgeBracket {
        label: "25-34",
        min_age: 25.0,
        max_age: 34.0,
        annual_min: 36_000.0,
        annual_max: 95_000.0,
        annual_mid: Some(62_000.0),
    },
    AgeBracket {
        label: "35-44",
        min_age: 35.0,
        max_age: 44.0,
        annual_min: 48_000.0,
        annual_max: 130_000.0,
        annual_mid: Some(82_000.0),
    },
    AgeBracket {
        label: "45-54",
        min_age: 45.0,
        max_age: 54.0,
        annual_min: 52_000.0,
        annual_max: 140_000.0,
        annual_mid: Some(88_000.0),
    },
    AgeBracket {
        label: "55+",
        min_age: 55.0,
        max_age: 130.0,
        annual_min: 40_000.0,
        annual_max: 120_000.0,
        annual_mid: None,
    },
];

/// Resolve the bracket covering `age`; `None` for non-finite ages or ages
/// below the table's lowest minimum.
pub fn expectation_for_age(age: f64) -> Option<&'static AgeBracket> {
    if !age.is_finite() || age < AGE_BRACKETS[0].min_age {
        return None;
    }
    AGE_BRACKETS
        .iter()
        .find(|bracket| age >= bracket.min_age && age <= bracket.max_age)
}

/// Earning-power reference points derived from the age bracket, with the
/// engine defaults as fallback when no bracket resolves.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTargets {
    pub baseline_monthly: f64,
    pub strong_cap: f64,
    pub bracket: Option<&'static AgeBracket>,
}

pub fn income_targets(age: Option<f64>, options: &ScoreOptions) -> IncomeTargets {
    let bracket = age.and_then(expectation_for_age);
    match bracket {
        Some(bracket) => {
            let mid = bracket
                .annual_mid
                .unwrap_or((bracket.annual_min + bracket.annual_max) / 2.0);
            let baseline = mid / 12.0;
            let cap = (bracket.annual_max / 12.0).max(baseline * 1.1);
            IncomeTargets {
                baseline_monthly: baseline,
                strong_cap: cap,
                bracket: Some(bracket),
            }
        }
        None => IncomeTargets {
            baseline_monthly: options.baseline_monthly_income,
            strong_cap: options.strong_income_cap,
            bracket: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_iso_and_plain_dates() {
        assert_eq!(
            decode_date(&json!("1990-06-15")),
            NaiveDate::from_ymd_opt(1990, 6, 15)
        );
        assert_eq!(
            decode_date(&json!("1990-06-15T08:30:00Z")),
            NaiveDate::from_ymd_opt(1990, 6, 15)
        );
        assert_eq!(decode_date(&json!("not a date")), None);
    }

    #[test]
    fn decodes_epoch_milliseconds_and_seconds() {
        let expected = NaiveDate::from_ymd_opt(2001, 9, 9);
        assert_eq!(decode_date(&json!(1_000_000_001_000_i64)), expected);
        assert_eq!(decode_date(&json!(1_000_000_001_i64)), expected);
        // Small numbers are not timestamps.
        assert_eq!(decode_date(&json!(1990)), None);
    }

    #[test]
    fn decodes_timestamp_and_ymd_objects() {
        let expected = NaiveDate::from_ymd_opt(2001, 9, 9);
        assert_eq!(
            decode_date(&json!({"seconds": 1_000_000_000, "nanoseconds": 0})),
            expected
        );
        assert_eq!(
            decode_date(&json!({"_seconds": 1_000_000_000})),
            expected
        );
        assert_eq!(
            decode_date(&json!({"year": 2008, "month": 2, "day": 29})),
            NaiveDate::from_ymd_opt(2008, 2, 29)
        );
        assert_eq!(decode_date(&json!({"month": 2, "day": 29})), None);
    }

    #[test]
    fn age_accounts_for_unreached_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).expect("valid date");
        let before = NaiveDate::from_ymd_opt(2026, 6, 14).expect("valid date");
        let on = NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date");
        assert_eq!(age_in_years(birth, before), 25.0);
        assert_eq!(age_in_years(birth, on), 26.0);
    }

    #[test]
    fn brackets_cover_working_ages_and_reject_children() {
        assert!(expectation_for_age(12.0).is_none());
        assert!(expectation_for_age(f64::NAN).is_none());
        assert_eq!(expectation_for_age(15.0).map(|b| b.label), Some("13-15"));
        assert_eq!(expectation_for_age(40.0).map(|b| b.label), Some("35-44"));
        assert_eq!(expectation_for_age(90.0).map(|b| b.label), Some("55+"));
    }

    #[test]
    fn targets_fall_back_to_engine_defaults() {
        let options = ScoreOptions::default();
        let unresolved = income_targets(None, &options);
        assert_eq!(unresolved.baseline_monthly, 6500.0);
        assert_eq!(unresolved.strong_cap, 14500.0);
        assert!(unresolved.bracket.is_none());

        let teen = income_targets(Some(15.0), &options);
        assert_eq!(teen.baseline_monthly, 200.0);
        assert_eq!(teen.strong_cap, 400.0);
    }

    #[test]
    fn cap_never_drops_below_baseline_lift() {
        for bracket in AGE_BRACKETS {
            let targets = income_targets(Some(bracket.min_age), &ScoreOptions::default());
            assert!(targets.strong_cap >= targets.baseline_monthly * 1.1);
        }
    }
}
