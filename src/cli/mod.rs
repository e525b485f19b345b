mod publish;

pub use publish::{page_from_markdown, publish_files};

use crate::error::Result;
use crate::server::layout::{DEFAULT_SITE_CSS, DEFAULT_SITE_TEMPLATE};
use crate::store::Store;
use crate::types::BundleContent;

/// Seed the default site bundle for a tenant that has no revisions yet.
/// Idempotent: an already-initialized tenant is left untouched.
pub fn bootstrap_site(store: &dyn Store, tenant_id: &str) -> Result<bool> {
    if !store.list_bundle_revisions(tenant_id)?.is_empty() {
        return Ok(false);
    }

    store.append_bundle_revision(
        &BundleContent {
            html: DEFAULT_SITE_TEMPLATE.to_string(),
            css: DEFAULT_SITE_CSS.to_string(),
            js: String::new(),
        },
        tenant_id,
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_bootstrap_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();

        assert!(bootstrap_site(&store, "t1").unwrap());
        assert!(!bootstrap_site(&store, "t1").unwrap());
        assert_eq!(store.list_bundle_revisions("t1").unwrap().len(), 1);
    }
}
