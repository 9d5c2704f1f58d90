//! Verify URL resolution and query encoding against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file lists named cases with their inputs and the exact string
//! expected back, so the same files can check any other implementation of the
//! wire format.

use next_fetch::{encode_query, resolve_url, QueryParams, QueryValue};
use serde_json::Value;

/// Render a JSON scalar the way the client stringifies query values.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn query_value(value: &Value) -> QueryValue {
    match value {
        Value::Array(items) => QueryValue::List(items.iter().map(scalar).collect()),
        other => QueryValue::Scalar(scalar(other)),
    }
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_test_vectors() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let target = case["target"].as_str().unwrap();
        let base = case["base"].as_str().unwrap();
        let expected = case["expected"].as_str().unwrap();

        assert_eq!(resolve_url(target, base), expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params: QueryParams = case["params"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let pair = pair.as_array().unwrap();
                (pair[0].as_str().unwrap().to_string(), query_value(&pair[1]))
            })
            .collect();
        let expected = case["expected"].as_str().unwrap();

        assert_eq!(encode_query(&params), expected, "{name}");
        assert_eq!(params.to_query_string(), expected, "{name}: method form");
    }
}
