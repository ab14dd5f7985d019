use serde_json::Value as JsonValue;

/// Wrapper key some services put around their payload
pub const RESPONSE_DATA: &str = "responseData";

/// Walk `path` through nested JSON objects.
///
/// `responseData` is consumed without descending when the current object
/// has no such key. A missing key or a non-object yields `None`.
pub fn get_by_path<'a, S: AsRef<str>>(value: &'a JsonValue, path: &[S]) -> Option<&'a JsonValue> {
    let mut current = value;
    for segment in path {
        let segment = segment.as_ref();
        match current {
            JsonValue::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None if segment == RESPONSE_DATA => continue,
                None => return None,
            },
            _ if segment == RESPONSE_DATA => continue,
            _ => return None,
        }
    }
    Some(current)
}

/// Split a dotted expression into path segments, dropping empty ones
pub fn split_path(expr: &str) -> Vec<&str> {
    expr.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
