use crate::collection::types::{Auth, Collection, Event, Header, Item, RequestTemplate};
use crate::variable::Value;
use crate::{CollrunError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// On-disk shape of a Postman v2.1 collection. Only the fields the runner
// uses are modelled; everything else is ignored by serde.

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    info: RawInfo,
    #[serde(default)]
    item: Vec<RawItem>,
    #[serde(default)]
    variable: Vec<RawVariable>,
    #[serde(default)]
    auth: Option<RawAuth>,
}

#[derive(Debug, Deserialize, Default)]
struct RawInfo {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    name: String,
    /// Present on folders only
    item: Option<Vec<RawItem>>,
    request: Option<RawRequest>,
    #[serde(default)]
    event: Vec<RawEvent>,
    /// Folder-level auth, inherited by children
    auth: Option<RawAuth>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRequest {
    /// Shorthand form: `"request": "https://..."`
    Url(String),
    Full(RawRequestObject),
}

#[derive(Debug, Deserialize)]
struct RawRequestObject {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    url: Option<RawUrl>,
    #[serde(default)]
    header: Vec<RawHeader>,
    body: Option<RawBody>,
    auth: Option<RawAuth>,
}

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUrl {
    Raw(String),
    Object(RawUrlObject),
}

#[derive(Debug, Deserialize)]
struct RawUrlObject {
    #[serde(default)]
    raw: String,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    raw: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAuth {
    #[serde(rename = "type")]
    auth_type: String,
    #[serde(default)]
    bearer: serde_json::Value,
    #[serde(default)]
    basic: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    listen: String,
    script: Option<RawScript>,
}

#[derive(Debug, Deserialize)]
struct RawScript {
    #[serde(default)]
    exec: RawExec,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExec {
    Lines(Vec<String>),
    Source(String),
}

impl Default for RawExec {
    fn default() -> Self {
        RawExec::Lines(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    key: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    disabled: bool,
}

/// Loads Postman v2.1 collection files
pub struct CollectionLoader;

impl CollectionLoader {
    /// Read and parse a collection file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Collection> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse collection JSON; folder and collection auth flow down to requests
    pub fn parse_str(content: &str) -> Result<Collection> {
        let raw: RawCollection = serde_json::from_str(content)
            .map_err(|e| CollrunError::ParseError(format!("invalid collection: {}", e)))?;

        let root_auth = raw.auth.as_ref().and_then(convert_auth);
        let items = convert_items(raw.item, &root_auth);

        let variables = raw
            .variable
            .into_iter()
            .filter(|v| !v.disabled)
            .map(|v| (v.key, Value::from_json(v.value)))
            .collect();

        tracing::debug!("Parsed collection '{}'", raw.info.name);

        Ok(Collection {
            name: raw.info.name,
            items,
            variables,
        })
    }
}

fn convert_items(raw_items: Vec<RawItem>, inherited: &Option<Auth>) -> Vec<Item> {
    raw_items
        .into_iter()
        .filter_map(|raw| convert_item(raw, inherited))
        .collect()
}

fn convert_item(raw: RawItem, inherited: &Option<Auth>) -> Option<Item> {
    let RawItem {
        name,
        item,
        request,
        event,
        auth,
    } = raw;

    if let Some(children) = item {
        let folder_auth = match &auth {
            Some(a) => convert_auth(a),
            None => inherited.clone(),
        };
        return Some(Item::Folder {
            name,
            items: convert_items(children, &folder_auth),
        });
    }

    let Some(request) = request else {
        tracing::debug!("Skipping item '{}' with neither request nor children", name);
        return None;
    };

    let mut template = match request {
        RawRequest::Url(url) => {
            let mut template = RequestTemplate::new(name, default_method(), url);
            template.auth = inherited.clone();
            template
        }
        RawRequest::Full(object) => convert_request(name, object, inherited),
    };

    template.events = event.into_iter().map(convert_event).collect();
    Some(Item::Request(template))
}

fn convert_request(name: String, raw: RawRequestObject, inherited: &Option<Auth>) -> RequestTemplate {
    let url = match raw.url {
        Some(RawUrl::Raw(url)) => url,
        Some(RawUrl::Object(object)) => object.raw,
        None => String::new(),
    };

    let body = raw.body.and_then(|body| match body.mode.as_deref() {
        None | Some("raw") => body.raw,
        Some(other) => {
            tracing::debug!("Ignoring unsupported body mode '{}' in '{}'", other, name);
            None
        }
    });

    let auth = match &raw.auth {
        Some(a) => convert_auth(a),
        None => inherited.clone(),
    };

    RequestTemplate {
        name,
        method: raw.method,
        url,
        headers: raw
            .header
            .into_iter()
            .map(|h| Header {
                key: h.key,
                value: h.value,
                disabled: h.disabled,
            })
            .collect(),
        body,
        auth,
        events: Vec::new(),
    }
}

/// `noauth` maps to `None`, which also stops inheritance
fn convert_auth(raw: &RawAuth) -> Option<Auth> {
    match raw.auth_type.as_str() {
        "noauth" => None,
        "bearer" => Some(Auth::Bearer {
            token: auth_param(&raw.bearer, "token").unwrap_or_default(),
        }),
        "basic" => Some(Auth::Basic {
            username: auth_param(&raw.basic, "username").unwrap_or_default(),
            password: auth_param(&raw.basic, "password").unwrap_or_default(),
        }),
        other => Some(Auth::Unsupported(other.to_string())),
    }
}

/// Auth parameters are `[{"key": .., "value": ..}]` in v2.1 and a plain
/// object in v2.0.
fn auth_param(params: &serde_json::Value, key: &str) -> Option<String> {
    let value = match params {
        serde_json::Value::Array(entries) => entries
            .iter()
            .find(|entry| entry.get("key").and_then(|k| k.as_str()) == Some(key))
            .and_then(|entry| entry.get("value")),
        serde_json::Value::Object(map) => map.get(key),
        _ => None,
    }?;

    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn convert_event(raw: RawEvent) -> Event {
    let exec = match raw.script.map(|s| s.exec) {
        Some(RawExec::Lines(lines)) => lines,
        Some(RawExec::Source(source)) => source.lines().map(str::to_string).collect(),
        None => Vec::new(),
    };

    Event {
        listen: raw.listen,
        exec,
    }
}
