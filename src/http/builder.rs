use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::ops::Range;

use crate::Result;
use crate::collection::{Auth, RequestTemplate};
use crate::http::request::Request;
use crate::variable::{TemplateResolver, VariableStore};

const AUTHORIZATION: &str = "Authorization";

/// A built request plus the non-fatal problems met while building it
#[derive(Debug)]
pub struct BuiltRequest {
    pub request: Request,
    pub warnings: Vec<String>,
}

/// Turns a request template into a concrete [`Request`]
pub struct RequestBuilder;

impl RequestBuilder {
    /// Resolve method, URL, body, auth and headers against `store`
    pub fn build(template: &RequestTemplate, store: &VariableStore) -> Result<BuiltRequest> {
        let mut warnings = Vec::new();

        // 1. URL
        let url = TemplateResolver::resolve(&template.url, store);
        let method = match template.method.trim() {
            "" => "GET",
            m => m,
        };
        let mut request = Request::new(method, &url)?;

        // 2. body, repaired only after substitution
        if let Some(body) = template.body.as_deref().filter(|b| !b.is_empty()) {
            let (resolved, lists) = TemplateResolver::resolve_tracking_lists(body, store);
            request.body = repair_body(&resolved, &lists);
        }

        // 3. auth
        match &template.auth {
            Some(Auth::Bearer { token }) => {
                let token = TemplateResolver::resolve(token, store);
                request.set_header(AUTHORIZATION, &format!("Bearer {}", token))?;
            }
            Some(Auth::Basic { username, password }) => {
                let credential = format!(
                    "{}:{}",
                    TemplateResolver::resolve(username, store),
                    TemplateResolver::resolve(password, store)
                );
                request.set_header(AUTHORIZATION, &format!("Basic {}", STANDARD.encode(credential)))?;
            }
            Some(Auth::Unsupported(kind)) => {
                let warning = format!(
                    "unsupported auth type '{}' on '{}', sending without Authorization header",
                    kind, template.name
                );
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
            None => {}
        }

        // 4. headers; a literal `Authorization` header always carries a bearer token
        for header in template.headers.iter().filter(|h| !h.disabled) {
            let value = TemplateResolver::resolve(&header.value, store);
            if header.key == AUTHORIZATION {
                request.set_header(&header.key, &format!("Bearer {}", value))?;
            } else {
                request.set_header(&header.key, &value)?;
            }
        }

        tracing::debug!("Built {} {} for '{}'", request.method, request.url, template.name);

        Ok(BuiltRequest { request, warnings })
    }
}

/// Undo the over-quoting left when a list is substituted into a quoted
/// position (`"{{ids}}"` → `"["a","b"]"`), and map `<nil>` to `null`.
///
/// Only the quote pair directly around a substituted list is dropped.
fn repair_body(body: &str, lists: &[Range<usize>]) -> String {
    let bytes = body.as_bytes();
    let mut quotes = Vec::new();
    for span in lists {
        let opened = span.start > 0 && bytes[span.start - 1] == b'"';
        let closed = bytes.get(span.end) == Some(&b'"');
        if opened && closed {
            quotes.push(span.start - 1);
            quotes.push(span.end);
        }
    }
    // `"{{a}}"{{b}}"` puts both lists against the middle quote
    quotes.dedup();

    let mut repaired = String::with_capacity(body.len());
    let mut last = 0;
    for index in quotes {
        repaired.push_str(&body[last..index]);
        last = index + 1;
    }
    repaired.push_str(&body[last..]);

    repaired.replace("<nil>", "null")
}
