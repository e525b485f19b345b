mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface. Every operation is scoped by an
/// explicit tenant id; "not found" is `Ok(None)`, never an error.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Page operations
    fn list_published_posts(&self, tenant_id: &str) -> Result<Vec<PageSummary>>;
    fn get_published_by_slug(
        &self,
        slug: &str,
        kind: PageKind,
        tenant_id: &str,
    ) -> Result<Option<Page>>;
    fn get_published_by_kind(&self, kind: PageKind, tenant_id: &str) -> Result<Option<Page>>;
    fn list_nav_items(&self, tenant_id: &str) -> Result<Vec<NavItem>>;
    /// Batch-resolve page ids to their current slug, kind, and title.
    /// Ids are deduplicated; an empty input returns without a query.
    fn resolve_links_by_ids(&self, ids: &[String], tenant_id: &str) -> Result<Vec<LinkTarget>>;
    /// Includes drafts. Admin surfaces only.
    fn list_all_pages(&self, tenant_id: &str) -> Result<Vec<Page>>;
    fn get_page_by_id(&self, page_id: &str, tenant_id: &str) -> Result<Option<Page>>;
    fn delete_page(&self, page_id: &str, tenant_id: &str) -> Result<bool>;
    fn upsert_page(&self, page: &Page, tenant_id: &str) -> Result<()>;

    // Site bundle operations
    fn get_active_bundle(&self, tenant_id: &str) -> Result<Option<SiteBundle>>;
    fn list_bundle_revisions(&self, tenant_id: &str) -> Result<Vec<SiteBundleRevision>>;
    fn current_revision_id(&self, tenant_id: &str) -> Result<Option<i64>>;
    /// Appends an immutable revision and moves the current pointer to it.
    /// Returns the assigned revision id.
    fn append_bundle_revision(&self, content: &BundleContent, tenant_id: &str) -> Result<i64>;
    /// Repoints the current pointer to an existing revision (rollback).
    fn set_current_revision(&self, revision_id: i64, tenant_id: &str) -> Result<()>;
    /// Deletes a revision; if it was current, repoints to the latest
    /// remaining revision (or clears the pointer when none remain).
    fn delete_bundle_revision(&self, revision_id: i64, tenant_id: &str) -> Result<()>;

    fn close(&self) -> Result<()>;
}
