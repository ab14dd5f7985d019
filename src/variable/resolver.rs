use crate::variable::types::{Value, VariableStore};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

fn var_regex() -> &'static Regex {
    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    VAR_REGEX.get_or_init(|| Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap())
}

/// `{{placeholder}}` substitution
pub struct TemplateResolver;

impl TemplateResolver {
    /// Replace every `{{name}}` whose name is in the store.
    ///
    /// Unknown placeholders are kept verbatim and substituted text is never
    /// rescanned, so a value containing `{{x}}` survives as-is.
    pub fn resolve(text: &str, store: &VariableStore) -> String {
        var_regex()
            .replace_all(text, |caps: &Captures| match store.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Same as [`resolve`](Self::resolve), also returning the byte ranges of
    /// the output that hold substituted lists.
    pub fn resolve_tracking_lists(text: &str, store: &VariableStore) -> (String, Vec<Range<usize>>) {
        let mut output = String::with_capacity(text.len());
        let mut lists = Vec::new();
        let mut last = 0;

        for caps in var_regex().captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            output.push_str(&text[last..whole.start()]);

            match store.get(&caps[1]) {
                Some(value) => {
                    let start = output.len();
                    output.push_str(&value.to_string());
                    if matches!(value, Value::ListOfString(_)) {
                        lists.push(start..output.len());
                    }
                }
                None => output.push_str(whole.as_str()),
            }
            last = whole.end();
        }

        output.push_str(&text[last..]);
        (output, lists)
    }

    /// Expand `${VAR}` references from the process environment
    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

        re.replace_all(text, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }
}
