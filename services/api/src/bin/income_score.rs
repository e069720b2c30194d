//! Standalone scoring harness: one base64url-encoded `{data, options}`
//! argument in, one `ScoreResult` JSON document out. A payload that cannot
//! be decoded is a caller error surfaced through the exit code.

use std::env;
use std::process::ExitCode;
use vibescore_income::{compute_income_score, decode_payload};

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let payload = match (args.next(), args.next()) {
        (Some(payload), None) => payload,
        _ => {
            eprintln!("usage: income-score <base64url-payload>");
            return ExitCode::FAILURE;
        }
    };

    let decoded = match decode_payload(&payload) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("invalid payload: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = compute_income_score(&decoded.data, &decoded.options);
    match serde_json::to_string(&result) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            ExitCode::FAILURE
        }
    }
}
