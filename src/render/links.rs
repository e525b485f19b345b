use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::store::Store;
use crate::types::{LinkTarget, PageKind};

/// Wiki-style internal links: `[[id]]` or `[[id|display text]]`.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([a-z0-9-]+)(?:\|([^\]]+))?\]\]").unwrap());

/// Build the URL for a link target based on its kind and current slug.
#[must_use]
pub fn page_url(target: &LinkTarget, url_prefix: &str) -> String {
    match target.kind {
        PageKind::Home => {
            if url_prefix.is_empty() {
                "/".to_string()
            } else {
                url_prefix.to_string()
            }
        }
        PageKind::Post => format!("{url_prefix}/posts/{}", target.slug),
        PageKind::Page => format!("{url_prefix}/{}", target.slug),
    }
}

/// Resolve all `[[id]]` and `[[id|text]]` tokens in markdown content.
///
/// - `[[mycelium]]` → `[Mycelium networks](/posts/mycelium)`
/// - `[[mycelium|wood wide web]]` → `[wood wide web](/posts/mycelium)`
/// - `[[nonexistent]]` → `[broken link: nonexistent]`
///
/// Targets are resolved against the store at render time, so links always
/// point at the current slug even after a page has been renamed. A body
/// without tokens is returned unchanged with no store round-trip.
pub fn resolve_links(
    store: &dyn Store,
    markdown: &str,
    tenant_id: &str,
    url_prefix: &str,
) -> Result<String> {
    let ids: Vec<String> = LINK_PATTERN
        .captures_iter(markdown)
        .map(|caps| caps[1].to_string())
        .collect();
    if ids.is_empty() {
        return Ok(markdown.to_string());
    }

    let targets = store.resolve_links_by_ids(&ids, tenant_id)?;
    let lookup: HashMap<&str, &LinkTarget> =
        targets.iter().map(|t| (t.id.as_str(), t)).collect();

    let resolved = LINK_PATTERN.replace_all(markdown, |caps: &Captures| {
        let id = &caps[1];
        match lookup.get(id) {
            Some(target) => {
                let text = caps
                    .get(2)
                    .map_or(target.title.as_str(), |m| m.as_str());
                format!("[{text}]({})", page_url(target, url_prefix))
            }
            // Deleted, unpublished, or never existed: degrade visibly
            // instead of failing the render.
            None => format!("[broken link: {id}]"),
        }
    });

    Ok(resolved.into_owned())
}
