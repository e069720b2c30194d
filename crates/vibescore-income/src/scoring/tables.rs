//! Immutable lookup tables behind the categorical factor inputs.
//!
//! Unrecognized labels never error; each table carries a fixed default so
//! sparse or misspelled input degrades to a neutral row.

pub(crate) const DEFAULT_EMPLOYMENT_BASE: f64 = 60.0;

pub(crate) const EMPLOYMENT_BASES: &[(&str, f64)] = &[
    ("salaried", 84.0),
    ("w2", 84.0),
    ("full-time", 84.0),
    ("fulltime", 84.0),
    ("employee", 84.0),
    ("permanent", 84.0),
    ("public-sector", 88.0),
    ("government", 88.0),
    ("retired", 70.0),
    ("contract", 62.0),
    ("contractor", 62.0),
    ("self-employed", 58.0),
    ("business-owner", 58.0),
    ("part-time", 55.0),
    ("gig", 48.0),
    ("freelance", 48.0),
    ("seasonal", 44.0),
    ("student", 40.0),
    ("unemployed", 0.0),
];

pub(crate) const INDUSTRY_RISK_ADJUSTMENTS: &[(&str, f64)] = &[
    ("very-low", 6.0),
    ("low", 4.0),
    ("moderate", 0.0),
    ("medium", 0.0),
    ("elevated", -8.0),
    ("high", -14.0),
    ("very-high", -20.0),
];

pub(crate) const PAY_FREQUENCY_ADJUSTMENTS: &[(&str, f64)] = &[
    ("monthly", 6.0),
    ("semi-monthly", 5.0),
    ("semimonthly", 5.0),
    ("biweekly", 5.0),
    ("weekly", 2.0),
    ("daily", -2.0),
    ("irregular", -6.0),
];

pub(crate) const BONUS_RELIABILITY_ADJUSTMENTS: &[(&str, f64)] = &[
    ("guaranteed", 6.0),
    ("consistent", 4.0),
    ("variable", 0.0),
    ("occasional", -4.0),
    ("unreliable", -8.0),
    ("none", -8.0),
];

pub(crate) const DEFAULT_SKILL_DEMAND_BASE: f64 = 60.0;

pub(crate) const SKILL_DEMAND_BASES: &[(&str, f64)] = &[
    ("scarce", 88.0),
    ("high", 78.0),
    ("growing", 70.0),
    ("stable", 60.0),
    ("moderate", 60.0),
    ("soft", 48.0),
    ("declining", 38.0),
];

pub(crate) const HIRING_TREND_ADJUSTMENTS: &[(&str, f64)] = &[
    ("surging", 10.0),
    ("growing", 6.0),
    ("stable", 0.0),
    ("slowing", -6.0),
    ("contracting", -12.0),
    ("freezing", -12.0),
];

/// Look a normalized label up, with a table-specific default.
pub(crate) fn lookup(table: &[(&str, f64)], label: Option<&str>, default: f64) -> f64 {
    let Some(label) = label else {
        return default;
    };
    table
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, value)| *value)
        .unwrap_or(default)
}
