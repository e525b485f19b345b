mod links;
mod markdown;

pub use links::{page_url, resolve_links};
pub use markdown::render_markdown;

use crate::error::Result;
use crate::store::Store;

/// Resolve `[[id]]` links in markdown and render the result to HTML.
///
/// This is the single rendering entry point for the serving surface; the
/// layout layer wraps the returned fragment in a full document.
pub fn render_page_content(
    store: &dyn Store,
    markdown: &str,
    tenant_id: &str,
    url_prefix: &str,
) -> Result<String> {
    let resolved = resolve_links(store, markdown, tenant_id, url_prefix)?;
    Ok(render_markdown(&resolved))
}
