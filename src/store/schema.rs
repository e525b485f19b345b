pub const SCHEMA: &str = r#"
-- Pages are partitioned by tenant; page_id is the stable link target,
-- slug is the mutable URL segment.
CREATE TABLE IF NOT EXISTS page (
    page_id TEXT NOT NULL,
    tenant_id TEXT NOT NULL,
    slug TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    excerpt TEXT NOT NULL DEFAULT '',
    tags TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    date TEXT NOT NULL,
    updated TEXT,
    published INTEGER NOT NULL DEFAULT 0,
    scripts TEXT,                      -- JSON array of script URLs, NULL = none
    seo TEXT,                          -- JSON PageMeta object, NULL = none
    kind TEXT NOT NULL,                -- 'home' | 'page' | 'post'

    -- Navigation placement; a non-NULL label means "show in the top bar"
    nav_label TEXT,
    nav_order INTEGER,

    PRIMARY KEY (page_id, tenant_id)
);

-- Current-pointer record, one row per tenant. The inline html/css/js columns
-- are the pre-versioning schema; they are read only as a legacy fallback.
CREATE TABLE IF NOT EXISTS site_bundle (
    tenant_id TEXT PRIMARY KEY,
    current_revision_id INTEGER,
    html TEXT,
    css TEXT,
    js TEXT,
    updated_at TEXT NOT NULL
);

-- Immutable site shell snapshots. revision_id is assigned by SQLite and
-- monotonically increasing, so "latest" is always MAX(revision_id).
CREATE TABLE IF NOT EXISTS site_bundle_revision (
    revision_id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id TEXT NOT NULL,
    html TEXT NOT NULL DEFAULT '',
    css TEXT NOT NULL DEFAULT '',
    js TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_page_tenant_kind ON page(tenant_id, kind, published);
CREATE INDEX IF NOT EXISTS idx_page_tenant_slug ON page(tenant_id, slug);
CREATE INDEX IF NOT EXISTS idx_revision_tenant ON site_bundle_revision(tenant_id, revision_id);
"#;
