//! Keyword-driven classification of free-form income stream entries.

use super::aliases::{coerce_number, normalize_label};
use crate::domain::StreamKind;
use serde_json::Value;

/// One classification rule: any keyword hit maps the entry to `kind`.
/// Rules are evaluated top to bottom; the first match wins.
pub(crate) struct StreamRule {
    pub keywords: &'static [&'static str],
    pub kind: StreamKind,
}

pub(crate) const STREAM_RULES: &[StreamRule] = &[
    StreamRule {
        keywords: &["bonus", "equity", "rsu", "stock"],
        kind: StreamKind::Bonus,
    },
    StreamRule {
        keywords: &["commission"],
        kind: StreamKind::Commission,
    },
    StreamRule {
        keywords: &["dividend", "passive", "interest", "royalt"],
        kind: StreamKind::Passive,
    },
    StreamRule {
        keywords: &["rental", "rent", "property", "airbnb"],
        kind: StreamKind::Rental,
    },
    StreamRule {
        keywords: &["side", "gig", "freelance", "consult", "contract-work"],
        kind: StreamKind::Side,
    },
    StreamRule {
        keywords: &["salary", "wage", "paycheck", "primary", "main", "w2"],
        kind: StreamKind::Primary,
    },
];

/// Classify a normalized type/category hint. `None` means no rule matched.
pub(crate) fn classify(hint: &str) -> Option<StreamKind> {
    STREAM_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| hint.contains(keyword)))
        .map(|rule| rule.kind)
}

/// A stream-array entry reduced to its classification inputs.
pub(crate) struct StreamEntry {
    pub hint: String,
    pub category: String,
    pub amount: f64,
}

/// Pull the hint and amount out of one raw array element. Bare numbers are
/// accepted as unlabeled amounts; anything unusable decodes to `None`.
pub(crate) fn decode_entry(value: &Value) -> Option<StreamEntry> {
    match value {
        Value::Number(_) => {
            let amount = coerce_number(value)?.max(0.0);
            Some(StreamEntry {
                hint: String::new(),
                category: String::new(),
                amount,
            })
        }
        Value::Object(map) => {
            let amount = ["amount", "monthlyAmount", "value", "monthly"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(coerce_number)?
                .max(0.0);
            let category = ["category", "label", "name", "source", "type"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            let hint = ["type", "category", "label", "name", "source"]
                .iter()
                .filter_map(|key| map.get(*key))
                .filter_map(Value::as_str)
                .map(normalize_label)
                .collect::<Vec<_>>()
                .join(" ");
            Some(StreamEntry {
                hint,
                category,
                amount,
            })
        }
        _ => None,
    }
}
