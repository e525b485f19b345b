use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PageKind;

/// A content unit: home page, static page, or blog post.
///
/// `id` is the stable identifier wiki-links target; it never changes.
/// `slug` is the URL path segment and may be renamed freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub slug: String,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    pub published: bool,
    /// Script URLs injected into the rendered page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<PageMeta>,
    pub kind: PageKind,
    /// Present means "show in the navigation bar".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<PageNav>,
}

/// Navigation placement for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNav {
    pub label: String,
    /// Sort position, 0 = leftmost.
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Per-page SEO / answer-engine metadata, stored as a single JSON column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_index: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_follow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_expertise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<FaqItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tldr: Option<String>,
    /// When set, responses carry `X-Robots-Tag: noai, noimageai`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_ai_training: Option<bool>,
}

/// Lightweight projection for post listings on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub date: String,
}

/// A resolved nav item for the top bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub slug: String,
    pub kind: PageKind,
    pub label: String,
    pub order: i64,
}

/// Minimal info returned by wiki-link resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub id: String,
    pub slug: String,
    pub kind: PageKind,
    pub title: String,
}

/// The currently active site shell for a tenant. Materialized from the
/// revision history (or the legacy inline columns) on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBundle {
    pub html: String,
    pub css: String,
    pub js: String,
    pub updated_at: DateTime<Utc>,
}

/// The editable triple submitted by callers; timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleContent {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// One immutable snapshot in a tenant's site shell history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBundleRevision {
    pub revision_id: i64,
    pub html: String,
    pub css: String,
    pub js: String,
    pub created_at: DateTime<Utc>,
}
