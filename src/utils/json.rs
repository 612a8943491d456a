use serde_json::Value;

/// Walks `path` through nested objects. A missing key, a `null` anywhere along
/// the way, or a non-object intermediate all yield `None`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| !found.is_null())
}

pub fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn lookup_i64(value: &Value, path: &[&str]) -> Option<i64> {
    let found = lookup(value, path)?;
    found
        .as_i64()
        .or_else(|| found.as_f64().map(|f| f.round() as i64))
        .or_else(|| found.as_str().and_then(|s| s.trim().parse().ok()))
}
