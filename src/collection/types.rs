use crate::variable::Value;

/// A parsed collection: the item tree plus collection-scoped variables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pub name: String,

    /// Top-level items, in file order
    pub items: Vec<Item>,

    /// Collection variables, seeded into the store before a run
    pub variables: Vec<(String, Value)>,
}

/// A node of the collection tree
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Folder { name: String, items: Vec<Item> },
    Request(RequestTemplate),
}

/// A request leaf, still holding `{{placeholders}}`
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTemplate {
    /// Lookup key
    pub name: String,

    pub method: String,

    pub url: String,

    /// Headers in declaration order
    pub headers: Vec<Header>,

    pub body: Option<String>,

    pub auth: Option<Auth>,

    pub events: Vec<Event>,
}

impl RequestTemplate {
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
            auth: None,
            events: Vec::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_test_script<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.push(Event {
            listen: Event::TEST.to_string(),
            exec: lines.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Lines of every `test` event, in order
    pub fn test_script(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(|e| e.is_test())
            .flat_map(|e| e.exec.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
    pub disabled: bool,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            disabled: false,
        }
    }
}

/// Request authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Bearer { token: String },
    Basic { username: String, password: String },
    /// Any other auth type, kept by name so the builder can report it
    Unsupported(String),
}

/// A script attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// "test" or "prerequest"
    pub listen: String,
    pub exec: Vec<String>,
}

impl Event {
    pub const TEST: &'static str = "test";

    pub fn is_test(&self) -> bool {
        self.listen == Self::TEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_only_includes_test_events() {
        let mut request = RequestTemplate::new("r", "GET", "http://example.com")
            .with_test_script(["var j = pm.response.json();"]);
        request.events.insert(
            0,
            Event {
                listen: "prerequest".to_string(),
                exec: vec!["pm.environment.set(\"pre\", \"1\");".to_string()],
            },
        );

        let lines: Vec<&str> = request.test_script().collect();
        assert_eq!(lines, vec!["var j = pm.response.json();"]);
    }
}
