use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// A typed variable value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    /// Rendered as a JSON array of strings when substituted
    ListOfString(Vec<String>),
    Null,
    /// Opaque passthrough, rendered as its JSON text
    Other(serde_json::Value),
}

impl Value {
    /// Convert a loosely-typed JSON value from an environment or
    /// collection file.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) if n.is_i64() => {
                Value::Integer(n.as_i64().unwrap_or_default())
            }
            serde_json::Value::Array(items) if items.iter().all(|v| v.is_string()) => {
                Value::ListOfString(
                    items
                        .into_iter()
                        .filter_map(|v| match v {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Value::Other(other),
        }
    }

    /// Convert a TOML config value.
    ///
    /// Arrays become `ListOfString` only when every element is a string.
    pub fn from_toml(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s.clone()),
            toml::Value::Integer(i) => Value::Integer(*i),
            toml::Value::Array(items) if items.iter().all(|v| v.is_str()) => Value::ListOfString(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            other => match serde_json::to_value(other) {
                Ok(json) => Value::Other(json),
                Err(_) => Value::String(other.to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::ListOfString(items) => {
                let quoted: Vec<String> = items
                    .iter()
                    .map(|item| serde_json::Value::String(item.clone()).to_string())
                    .collect();
                write!(f, "[{}]", quoted.join(","))
            }
            Value::Null => f.write_str("null"),
            Value::Other(json) => write!(f, "{}", json),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::ListOfString(items)
    }
}

/// Variables threaded through one collection run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    variables: HashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, silently replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn extend(&mut self, vars: impl IntoIterator<Item = (String, Value)>) {
        self.variables.extend(vars);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = VariableStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

/// One named environment in `collrun.toml`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Environment {
    #[serde(flatten)]
    pub variables: HashMap<String, toml::Value>,
}

/// The whole config file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VariableConfig {
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl VariableConfig {
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_basic() {
        let mut store = VariableStore::new();
        assert!(store.is_empty());

        store.set("key", "value");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key"), Some(&Value::String("value".to_string())));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_store_last_writer_wins() {
        let mut store = VariableStore::new();
        store.set("id", "first");
        store.set("id", 42_i64);
        assert_eq!(store.get("id"), Some(&Value::Integer(42)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_display_per_kind() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Integer(-1200).to_string(), "-1200");
        assert_eq!(
            Value::ListOfString(vec!["p".to_string(), "q".to_string()]).to_string(),
            r#"["p","q"]"#
        );
        assert_eq!(Value::ListOfString(vec![]).to_string(), "[]");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Other(serde_json::json!(true)).to_string(), "true");
        assert_eq!(Value::Other(serde_json::json!(1.5)).to_string(), "1.5");
    }

    #[test]
    fn test_from_toml() {
        let config: VariableConfig = toml::from_str(
            r#"
[environments.dev]
host = "localhost"
retries = 3
tags = ["a", "b"]
debug = true
"#,
        )
        .unwrap();

        let dev = config.get_environment("dev").unwrap();
        assert_eq!(Value::from_toml(&dev.variables["host"]), Value::from("localhost"));
        assert_eq!(Value::from_toml(&dev.variables["retries"]), Value::Integer(3));
        assert_eq!(
            Value::from_toml(&dev.variables["tags"]),
            Value::ListOfString(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            Value::from_toml(&dev.variables["debug"]),
            Value::Other(serde_json::json!(true))
        );
    }
}
