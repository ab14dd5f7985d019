use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

use crate::script::extractor::{get_by_path, split_path};
use crate::variable::{Value, VariableStore};

/// One recognized script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `var <alias> = pm.response.json();`
    Capture { alias: &'a str },
    /// `pm.environment.set("<key>", <expr>);`
    Set { key: &'a str, expr: &'a str },
}

impl<'a> Statement<'a> {
    /// Match a single line against the two known shapes.
    ///
    /// A set expression never spans an unquoted `;`, so a line holding
    /// several statements is not a set statement.
    pub fn parse(line: &'a str) -> Option<Self> {
        static CAPTURE_REGEX: OnceLock<Regex> = OnceLock::new();
        static SET_REGEX: OnceLock<Regex> = OnceLock::new();

        let capture = CAPTURE_REGEX.get_or_init(|| {
            Regex::new(
                r"(?:^|[^\w$.])(?:(?:var|let|const)\s+)?([A-Za-z_$][\w$]*)\s*=\s*(?:pm\.response\.json\(\s*\)|JSON\.parse\(\s*responseBody\s*\))",
            )
            .unwrap()
        });
        let set = SET_REGEX.get_or_init(|| {
            Regex::new(
                r#"pm\.(?:environment|globals|collectionVariables)\.set\(\s*(?:"([^"]*)"|'([^']*)')\s*,\s*((?:"[^"]*"|'[^']*'|[^;"'])+?)\s*\)\s*;?\s*(?://.*)?$"#,
            )
            .unwrap()
        });

        if let Some(caps) = capture.captures(line) {
            return caps.get(1).map(|m| Statement::Capture { alias: m.as_str() });
        }

        let caps = set.captures(line)?;
        let key = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let expr = caps.get(3)?.as_str();
        Some(Statement::Set { key, expr })
    }
}

/// Applies the capture/set idiom of Postman test scripts to a store
pub struct ScriptInterpreter;

impl ScriptInterpreter {
    /// Run `lines` top to bottom against `response`.
    ///
    /// Unrecognized lines are skipped; nothing here fails.
    pub fn apply<'a, I>(lines: I, response: &JsonValue, store: &mut VariableStore)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut alias: Option<&str> = None;

        for line in lines {
            match Statement::parse(line) {
                Some(Statement::Capture { alias: name }) => {
                    tracing::trace!("Captured response as '{}'", name);
                    alias = Some(name);
                }
                Some(Statement::Set { key, expr }) => match alias.and_then(|a| path_after_alias(expr, a)) {
                    Some(path) => Self::set_from_response(key, &path, response, store),
                    None => {
                        let literal = strip_quotes(expr);
                        tracing::debug!("Set '{}' to literal '{}'", key, literal);
                        store.set(key, literal);
                    }
                },
                None => {}
            }
        }
    }

    fn set_from_response(key: &str, path: &[&str], response: &JsonValue, store: &mut VariableStore) {
        let Some(found) = get_by_path(response, path) else {
            tracing::debug!("Path '{}' not in response, '{}' left unset", path.join("."), key);
            return;
        };

        let value = match found {
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::ListOfString(
                items
                    .iter()
                    .map(|item| match item {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            JsonValue::Null => Value::Null,
            other => {
                tracing::warn!(
                    "Unrecognized value {} at '{}', '{}' left unset",
                    other,
                    path.join("."),
                    key
                );
                return;
            }
        };

        tracing::debug!("Set '{}' from response path '{}'", key, path.join("."));
        store.set(key, value);
    }
}

/// The path following the first whole-word occurrence of `alias` in `expr`
fn path_after_alias<'e>(expr: &'e str, alias: &str) -> Option<Vec<&'e str>> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';

    let mut from = 0;
    while let Some(pos) = expr[from..].find(alias) {
        let start = from + pos;
        let end = start + alias.len();
        let before_ok = expr[..start].chars().next_back().is_none_or(|c| !is_ident(c));
        let after_ok = expr[end..].chars().next().is_none_or(|c| !is_ident(c));
        if before_ok && after_ok {
            return Some(split_path(&expr[end..]));
        }
        from = end;
    }
    None
}

fn strip_quotes(expr: &str) -> &str {
    let trimmed = expr.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}
