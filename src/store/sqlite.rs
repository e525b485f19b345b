use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

/// Revisions kept per tenant after an append; older ones are pruned.
const RETAINED_REVISIONS: i64 = 50;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests and throwaway tooling.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn json_column_err(idx: usize, e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn kind_column_err(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unknown page kind: {raw}").into(),
    )
}

// Row mappers. Column order matches the shared SELECT lists below.

const PAGE_COLUMNS: &str = "page_id, slug, title, content, excerpt, tags, date, updated, \
                            published, scripts, seo, kind, nav_label, nav_order";

fn page_from_row(row: &Row) -> rusqlite::Result<Page> {
    let tags: String = row.get(5)?;
    let scripts: Option<String> = row.get(9)?;
    let seo: Option<String> = row.get(10)?;
    let kind: String = row.get(11)?;
    let nav_label: Option<String> = row.get(12)?;

    Ok(Page {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        tags: serde_json::from_str(&tags).map_err(|e| json_column_err(5, e))?,
        date: row.get(6)?,
        updated: row.get(7)?,
        published: row.get::<_, i64>(8)? == 1,
        scripts: scripts
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| json_column_err(9, e))?,
        seo: seo
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| json_column_err(10, e))?,
        kind: kind.parse().map_err(|_| kind_column_err(11, &kind))?,
        nav: match nav_label {
            Some(label) => Some(PageNav {
                label,
                order: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
            }),
            None => None,
        },
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<PageSummary> {
    let tags: String = row.get(4)?;
    Ok(PageSummary {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        excerpt: row.get(3)?,
        tags: serde_json::from_str(&tags).map_err(|e| json_column_err(4, e))?,
        date: row.get(5)?,
    })
}

fn nav_item_from_row(row: &Row) -> rusqlite::Result<NavItem> {
    let kind: String = row.get(2)?;
    Ok(NavItem {
        id: row.get(0)?,
        slug: row.get(1)?,
        kind: kind.parse().map_err(|_| kind_column_err(2, &kind))?,
        label: row.get(3)?,
        order: row.get(4)?,
    })
}

fn link_target_from_row(row: &Row) -> rusqlite::Result<LinkTarget> {
    let kind: String = row.get(2)?;
    Ok(LinkTarget {
        id: row.get(0)?,
        slug: row.get(1)?,
        kind: kind.parse().map_err(|_| kind_column_err(2, &kind))?,
        title: row.get(3)?,
    })
}

fn bundle_from_revision_row(row: &Row) -> rusqlite::Result<SiteBundle> {
    let created_at: String = row.get(3)?;
    Ok(SiteBundle {
        html: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        css: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        js: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        updated_at: parse_datetime(&created_at),
    })
}

fn revision_from_row(row: &Row) -> rusqlite::Result<SiteBundleRevision> {
    let created_at: String = row.get(4)?;
    Ok(SiteBundleRevision {
        revision_id: row.get(0)?,
        html: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        css: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        js: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        created_at: parse_datetime(&created_at),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Page operations

    fn list_published_posts(&self, tenant_id: &str) -> Result<Vec<PageSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT page_id, slug, title, excerpt, tags, date
             FROM page
             WHERE published = 1 AND kind = 'post' AND tenant_id = ?1
             ORDER BY date DESC",
        )?;

        let rows = stmt.query_map(params![tenant_id], summary_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_published_by_slug(
        &self,
        slug: &str,
        kind: PageKind,
        tenant_id: &str,
    ) -> Result<Option<Page>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {PAGE_COLUMNS} FROM page
                 WHERE slug = ?1 AND kind = ?2 AND published = 1 AND tenant_id = ?3
                 LIMIT 1"
            ),
            params![slug, kind.as_str(), tenant_id],
            page_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_published_by_kind(&self, kind: PageKind, tenant_id: &str) -> Result<Option<Page>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {PAGE_COLUMNS} FROM page
                 WHERE kind = ?1 AND published = 1 AND tenant_id = ?2
                 LIMIT 1"
            ),
            params![kind.as_str(), tenant_id],
            page_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_nav_items(&self, tenant_id: &str) -> Result<Vec<NavItem>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT page_id, slug, kind, nav_label, nav_order
             FROM page
             WHERE published = 1 AND nav_label IS NOT NULL AND tenant_id = ?1
             ORDER BY nav_order ASC",
        )?;

        let rows = stmt.query_map(params![tenant_id], nav_item_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn resolve_links_by_ids(&self, ids: &[String], tenant_id: &str) -> Result<Vec<LinkTarget>> {
        // Deduplicate before touching the database; nothing to resolve
        // means no round-trip at all.
        let unique: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let sql = format!(
            "SELECT page_id, slug, kind, title
             FROM page
             WHERE page_id IN ({placeholders}) AND published = 1 AND tenant_id = ?"
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(unique.into_iter().chain(std::iter::once(tenant_id))),
            link_target_from_row,
        )?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_all_pages(&self, tenant_id: &str) -> Result<Vec<Page>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PAGE_COLUMNS} FROM page
             WHERE tenant_id = ?1
             ORDER BY kind ASC, date DESC"
        ))?;

        let rows = stmt.query_map(params![tenant_id], page_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_page_by_id(&self, page_id: &str, tenant_id: &str) -> Result<Option<Page>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {PAGE_COLUMNS} FROM page
                 WHERE page_id = ?1 AND tenant_id = ?2
                 LIMIT 1"
            ),
            params![page_id, tenant_id],
            page_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_page(&self, page_id: &str, tenant_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM page WHERE page_id = ?1 AND tenant_id = ?2",
            params![page_id, tenant_id],
        )?;
        Ok(rows > 0)
    }

    fn upsert_page(&self, page: &Page, tenant_id: &str) -> Result<()> {
        let tags = serde_json::to_string(&page.tags)?;
        let scripts = page
            .scripts
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let seo = page.seo.as_ref().map(serde_json::to_string).transpose()?;

        self.conn().execute(
            "INSERT INTO page (page_id, tenant_id, slug, title, content, excerpt, tags, date,
                               updated, published, scripts, seo, kind, nav_label, nav_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
             ON CONFLICT (page_id, tenant_id) DO UPDATE SET
               slug = excluded.slug,
               title = excluded.title,
               content = excluded.content,
               excerpt = excluded.excerpt,
               tags = excluded.tags,
               date = excluded.date,
               updated = excluded.updated,
               published = excluded.published,
               scripts = excluded.scripts,
               seo = excluded.seo,
               kind = excluded.kind,
               nav_label = excluded.nav_label,
               nav_order = excluded.nav_order",
            params![
                page.id,
                tenant_id,
                page.slug,
                page.title,
                page.content,
                page.excerpt,
                tags,
                page.date,
                page.updated,
                i64::from(page.published),
                scripts,
                seo,
                page.kind.as_str(),
                page.nav.as_ref().map(|n| n.label.as_str()),
                page.nav.as_ref().map(|n| n.order),
            ],
        )?;
        Ok(())
    }

    // Site bundle operations

    fn get_active_bundle(&self, tenant_id: &str) -> Result<Option<SiteBundle>> {
        let conn = self.conn();

        type PointerRow = (Option<i64>, Option<String>, Option<String>, Option<String>, String);
        let pointer: Option<PointerRow> = conn
            .query_row(
                "SELECT current_revision_id, html, css, js, updated_at
                 FROM site_bundle
                 WHERE tenant_id = ?1
                 LIMIT 1",
                params![tenant_id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        if let Some((current_id, html, css, js, updated_at)) = pointer {
            if let Some(revision_id) = current_id {
                let bundle = conn
                    .query_row(
                        "SELECT html, css, js, created_at
                         FROM site_bundle_revision
                         WHERE revision_id = ?1 AND tenant_id = ?2
                         LIMIT 1",
                        params![revision_id, tenant_id],
                        bundle_from_revision_row,
                    )
                    .optional()?;
                if let Some(bundle) = bundle {
                    return Ok(Some(bundle));
                }
            }

            // Legacy fallback (pre-revisions): bundle stored inline on the
            // pointer row itself.
            let html = html.unwrap_or_default();
            let css = css.unwrap_or_default();
            let js = js.unwrap_or_default();
            if !html.is_empty() || !css.is_empty() || !js.is_empty() {
                return Ok(Some(SiteBundle {
                    html,
                    css,
                    js,
                    updated_at: parse_datetime(&updated_at),
                }));
            }
        }

        // No usable pointer: the newest revision wins, if any.
        conn.query_row(
            "SELECT html, css, js, created_at
             FROM site_bundle_revision
             WHERE tenant_id = ?1
             ORDER BY revision_id DESC
             LIMIT 1",
            params![tenant_id],
            bundle_from_revision_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_bundle_revisions(&self, tenant_id: &str) -> Result<Vec<SiteBundleRevision>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT revision_id, html, css, js, created_at
             FROM site_bundle_revision
             WHERE tenant_id = ?1
             ORDER BY revision_id DESC",
        )?;

        let rows = stmt.query_map(params![tenant_id], revision_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn current_revision_id(&self, tenant_id: &str) -> Result<Option<i64>> {
        let conn = self.conn();
        let id: Option<Option<i64>> = conn
            .query_row(
                "SELECT current_revision_id FROM site_bundle WHERE tenant_id = ?1 LIMIT 1",
                params![tenant_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    fn append_bundle_revision(&self, content: &BundleContent, tenant_id: &str) -> Result<i64> {
        let conn = self.conn();
        let now = format_datetime(&Utc::now());

        conn.execute(
            "INSERT INTO site_bundle_revision (tenant_id, html, css, js, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![tenant_id, content.html, content.css, content.js, now],
        )?;
        let revision_id = conn.last_insert_rowid();

        // The pointer update comes last: if it fails, the old pointer still
        // targets a valid revision.
        conn.execute(
            "INSERT INTO site_bundle (tenant_id, current_revision_id, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (tenant_id) DO UPDATE SET
               current_revision_id = excluded.current_revision_id,
               updated_at = excluded.updated_at",
            params![tenant_id, revision_id, now],
        )?;

        // Keep the newest revisions per tenant. Pruning is advisory; its
        // failure must never fail the append.
        let pruned = conn.execute(
            "DELETE FROM site_bundle_revision
             WHERE revision_id IN (
               SELECT revision_id
               FROM site_bundle_revision
               WHERE tenant_id = ?1
               ORDER BY revision_id DESC
               LIMIT -1 OFFSET ?2
             )",
            params![tenant_id, RETAINED_REVISIONS],
        );
        if let Err(e) = pruned {
            tracing::warn!("revision pruning failed for tenant {tenant_id}: {e}");
        }

        Ok(revision_id)
    }

    fn set_current_revision(&self, revision_id: i64, tenant_id: &str) -> Result<()> {
        let now = format_datetime(&Utc::now());
        self.conn().execute(
            "INSERT INTO site_bundle (tenant_id, current_revision_id, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (tenant_id) DO UPDATE SET
               current_revision_id = excluded.current_revision_id,
               updated_at = excluded.updated_at",
            params![tenant_id, revision_id, now],
        )?;
        Ok(())
    }

    fn delete_bundle_revision(&self, revision_id: i64, tenant_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM site_bundle_revision WHERE revision_id = ?1 AND tenant_id = ?2",
            params![revision_id, tenant_id],
        )?;

        let current: Option<Option<i64>> = conn
            .query_row(
                "SELECT current_revision_id FROM site_bundle WHERE tenant_id = ?1 LIMIT 1",
                params![tenant_id],
                |row| row.get(0),
            )
            .optional()?;

        // Repair a dangling pointer: repoint to the latest remaining
        // revision, or clear it when the history is empty.
        if current.flatten() == Some(revision_id) {
            let next_id: Option<i64> = conn
                .query_row(
                    "SELECT revision_id
                     FROM site_bundle_revision
                     WHERE tenant_id = ?1
                     ORDER BY revision_id DESC
                     LIMIT 1",
                    params![tenant_id],
                    |row| row.get(0),
                )
                .optional()?;

            let now = format_datetime(&Utc::now());
            conn.execute(
                "INSERT INTO site_bundle (tenant_id, current_revision_id, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (tenant_id) DO UPDATE SET
                   current_revision_id = excluded.current_revision_id,
                   updated_at = excluded.updated_at",
                params![tenant_id, next_id, now],
            )?;
        }

        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
