use crate::collection::types::{Item, RequestTemplate};
use crate::{CollrunError, Result};

/// Find the first request named `name`.
///
/// Depth-first, pre-order: a folder's children are searched before the
/// folder's next sibling. Names are compared exactly.
pub fn find_by_name<'a>(items: &'a [Item], name: &str) -> Result<&'a RequestTemplate> {
    find_in(items, name).ok_or_else(|| CollrunError::RequestNotFound(name.to_string()))
}

fn find_in<'a>(items: &'a [Item], name: &str) -> Option<&'a RequestTemplate> {
    items.iter().find_map(|item| match item {
        Item::Folder { items, .. } => find_in(items, name),
        Item::Request(request) if request.name == name => Some(request),
        Item::Request(_) => None,
    })
}

/// Every request leaf, in the same order `find_by_name` visits them
pub fn requests(items: &[Item]) -> Vec<&RequestTemplate> {
    let mut out = Vec::new();
    collect(items, &mut out);
    out
}

fn collect<'a>(items: &'a [Item], out: &mut Vec<&'a RequestTemplate>) {
    for item in items {
        match item {
            Item::Folder { items, .. } => collect(items, out),
            Item::Request(request) => out.push(request),
        }
    }
}
