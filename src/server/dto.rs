use serde::{Deserialize, Serialize};

use crate::types::{Page, PageKind, PageMeta, PageNav, SiteBundleRevision};

/// Body of `PUT /api/admin/pages/{id}`. The page id comes from the path;
/// every field here overwrites the stored value on conflict — callers that
/// want to keep an existing field must send it back.
#[derive(Debug, Deserialize)]
pub struct UpsertPageRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub scripts: Option<Vec<String>>,
    #[serde(default)]
    pub seo: Option<PageMeta>,
    pub kind: PageKind,
    #[serde(default)]
    pub nav: Option<PageNav>,
}

impl UpsertPageRequest {
    #[must_use]
    pub fn into_page(self, id: String) -> Page {
        Page {
            id,
            slug: self.slug,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            tags: self.tags,
            date: self.date,
            updated: self.updated,
            published: self.published,
            scripts: self.scripts,
            seo: self.seo,
            kind: self.kind,
            nav: self.nav,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveBundleResponse {
    pub revision_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RevisionListResponse {
    pub current_revision_id: Option<i64>,
    pub revisions: Vec<SiteBundleRevision>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
