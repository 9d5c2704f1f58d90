//! Query-string construction for GET requests.
//!
//! # Design
//! `QueryParams` keeps keys in insertion order, one value per key. A value is
//! either a scalar or a sequence; sequences are rendered with the `key[]=`
//! convention, one part per element. Keys and values are percent-encoded as
//! URI components: ASCII alphanumerics and `- _ . ! ~ * ' ( )` pass through,
//! everything else is UTF-8 percent-encoded.
//!
//! Floats are stringified the way JavaScript numbers are: `NaN`, `Infinity`,
//! and exponent notation (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.

use std::fmt::Display;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl QueryValue {
    pub fn scalar(value: impl Display) -> Self {
        QueryValue::Scalar(value.to_string())
    }

    pub fn list<T: Display>(values: impl IntoIterator<Item = T>) -> Self {
        QueryValue::List(values.into_iter().map(|v| v.to_string()).collect())
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::scalar(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::scalar(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::scalar(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::scalar(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::scalar(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Scalar(format_number(value))
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

impl<T: Display> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::list(values)
    }
}

impl<T: Display, const N: usize> From<[T; N]> for QueryValue {
    fn from(values: [T; N]) -> Self {
        QueryValue::list(values)
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, QueryValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `key`; an existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        encode_query(self)
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Render `params` as `?k=v&...`, or `""` when there are no keys.
pub fn encode_query(params: &QueryParams) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut parts = Vec::new();
    for (key, value) in params.iter() {
        let key = encode_component(key);
        match value {
            QueryValue::Scalar(v) => parts.push(format!("{key}={}", encode_component(v))),
            QueryValue::List(values) => {
                for v in values {
                    parts.push(format!("{key}[]={}", encode_component(v)));
                }
            }
        }
    }
    format!("?{}", parts.join("&"))
}

fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_encode_to_nothing() {
        assert_eq!(encode_query(&QueryParams::new()), "");
    }

    #[test]
    fn scalars_keep_insertion_order() {
        let params = QueryParams::new().with("test", 2).with("value", 3).with("string", "true");
        assert_eq!(encode_query(&params), "?test=2&value=3&string=true");
    }

    #[test]
    fn spaces_and_non_ascii_are_percent_encoded() {
        let params = QueryParams::from([("hobby", "some hobby with space")]);
        assert_eq!(encode_query(&params), "?hobby=some%20hobby%20with%20space");

        let params = QueryParams::from([("firstName", "André")]);
        assert_eq!(encode_query(&params), "?firstName=Andr%C3%A9");
    }

    #[test]
    fn sequences_repeat_key_with_brackets() {
        let params = QueryParams::from([("hobbies", ["surf", "guitar", "climbing"])]);
        assert_eq!(
            encode_query(&params),
            "?hobbies[]=surf&hobbies[]=guitar&hobbies[]=climbing"
        );
    }

    #[test]
    fn reserved_characters_in_keys_and_values_are_escaped() {
        let params = QueryParams::new().with("a&b", "c=d/e?f");
        assert_eq!(encode_query(&params), "?a%26b=c%3Dd%2Fe%3Ff");
    }

    #[test]
    fn uri_component_marks_pass_through() {
        let params = QueryParams::new().with("q", "it's (ok)!*").with("t", "a-b_c.d~e");
        assert_eq!(encode_query(&params), "?q=it's%20(ok)!*&t=a-b_c.d~e");
    }

    #[test]
    fn mixed_scalars_and_lists() {
        let params = QueryParams::new().with("id", vec![1, 2]).with("sort", "asc");
        assert_eq!(params.to_query_string(), "?id[]=1&id[]=2&sort=asc");
    }

    #[test]
    fn only_empty_lists_leave_a_bare_question_mark() {
        let params = QueryParams::new().with("ids", Vec::<u32>::new());
        assert_eq!(encode_query(&params), "?");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = QueryParams::from([("a", 1), ("b", 2)]);
        params.insert("a", 3);
        assert_eq!(params.get("a"), Some(&QueryValue::Scalar("3".to_string())));
        assert_eq!(encode_query(&params), "?a=3&b=2");
    }

    #[test]
    fn floats_render_like_integers_when_whole() {
        let params = QueryParams::new().with("ratio", 2.0).with("half", 0.5);
        assert_eq!(encode_query(&params), "?ratio=2&half=0.5");
    }

    #[test]
    fn floats_stringify_like_javascript_numbers() {
        let cases = [
            (f64::NAN, "NaN"),
            (f64::INFINITY, "Infinity"),
            (f64::NEG_INFINITY, "-Infinity"),
            (-0.0, "0"),
            (1e21, "1e+21"),
            (1.5e22, "1.5e+22"),
            (1e20, "100000000000000000000"),
            (0.000001, "0.000001"),
            (1e-7, "1e-7"),
            (-2.5e-8, "-2.5e-8"),
        ];
        for (value, expected) in cases {
            assert_eq!(QueryValue::from(value), QueryValue::Scalar(expected.to_string()), "{value}");
        }
    }
}
