//! Markdown import: turns files with YAML front matter into pages.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Page, PageKind, PageMeta, PageNav};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    id: Option<String>,
    slug: Option<String>,
    title: Option<String>,
    excerpt: Option<String>,
    tags: Vec<String>,
    date: Option<String>,
    updated: Option<String>,
    published: Option<bool>,
    kind: Option<String>,
    scripts: Option<Vec<String>>,
    nav: Option<PageNav>,
    seo: Option<PageMeta>,
}

/// Split a document into its optional YAML front matter block and body.
fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text.strip_prefix("---\n") else {
        return (None, text);
    };
    match rest.find("\n---") {
        Some(end) => {
            let body = rest[end + 4..].trim_start_matches('\n');
            (Some(&rest[..end]), body)
        }
        None => (None, text),
    }
}

fn slugify(stem: &str) -> String {
    let slug: String = stem
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect();
    slug.trim_matches('-').to_string()
}

/// First `# ` heading in the body, used as a title fallback.
fn first_heading(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}

/// Build a page from a markdown file. Front matter wins over derived
/// values; the file stem supplies the slug when neither `slug` nor `id`
/// is given, and `kind` defaults to `post`.
pub fn page_from_markdown(path: &Path, text: &str, today: &str) -> Result<Page> {
    let (front, body) = split_front_matter(text);
    let meta: FrontMatter = match front {
        Some(yaml) => serde_yaml::from_str(yaml)
            .map_err(|e| Error::BadRequest(format!("{}: bad front matter: {e}", path.display())))?,
        None => FrontMatter::default(),
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::BadRequest(format!("{}: unusable file name", path.display())))?;

    let slug = meta.slug.or_else(|| meta.id.clone()).unwrap_or(stem);
    let id = meta.id.unwrap_or_else(|| slug.clone());
    let title = meta
        .title
        .or_else(|| first_heading(body).map(str::to_string))
        .unwrap_or_else(|| slug.clone());
    let kind = match meta.kind.as_deref() {
        Some(raw) => raw
            .parse::<PageKind>()
            .map_err(|e| Error::BadRequest(format!("{}: {e}", path.display())))?,
        None => PageKind::Post,
    };

    Ok(Page {
        id,
        slug,
        title,
        content: body.to_string(),
        excerpt: meta.excerpt.unwrap_or_default(),
        tags: meta.tags,
        date: meta.date.unwrap_or_else(|| today.to_string()),
        updated: meta.updated,
        published: meta.published.unwrap_or(true),
        scripts: meta.scripts,
        seo: meta.seo,
        kind,
        nav: meta.nav,
    })
}

/// Import each file as a page via upsert. Returns the ids written.
pub fn publish_files(store: &dyn Store, files: &[String], tenant_id: &str) -> Result<Vec<String>> {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let mut ids = Vec::with_capacity(files.len());

    for file in files {
        let path = Path::new(file);
        let text = std::fs::read_to_string(path)?;
        let page = page_from_markdown(path, &text, &today)?;
        store.upsert_page(&page, tenant_id)?;
        tracing::info!("published {} ({})", page.id, page.kind);
        ids.push(page.id);
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_parsed() {
        let text = "---\ntitle: Hello\ndate: \"2026-03-01\"\ntags:\n  - a\n  - b\npublished: false\n---\n\nBody text\n";
        let page = page_from_markdown(Path::new("hello-world.md"), text, "2026-08-29").unwrap();

        assert_eq!(page.id, "hello-world");
        assert_eq!(page.slug, "hello-world");
        assert_eq!(page.title, "Hello");
        assert_eq!(page.date, "2026-03-01");
        assert_eq!(page.tags, ["a", "b"]);
        assert!(!page.published);
        assert_eq!(page.kind, PageKind::Post);
        assert_eq!(page.content.trim(), "Body text");
    }

    #[test]
    fn test_no_front_matter_uses_heading_and_stem() {
        let text = "# My Title\n\ncontent\n";
        let page = page_from_markdown(Path::new("My First Post.md"), text, "2026-08-29").unwrap();

        assert_eq!(page.slug, "my-first-post");
        assert_eq!(page.title, "My Title");
        assert_eq!(page.date, "2026-08-29");
        assert!(page.published);
    }

    #[test]
    fn test_explicit_id_kept_across_slug_rename() {
        let text = "---\nid: stable-id\nslug: new-slug\nkind: page\n---\nbody";
        let page = page_from_markdown(Path::new("x.md"), text, "2026-08-29").unwrap();

        assert_eq!(page.id, "stable-id");
        assert_eq!(page.slug, "new-slug");
        assert_eq!(page.kind, PageKind::Page);
    }

    #[test]
    fn test_nav_and_seo_blocks() {
        let text = "---\ntitle: About\nkind: page\nnav:\n  label: About\n  order: 1\nseo:\n  meta_description: who I am\n  no_ai_training: true\n---\nbody";
        let page = page_from_markdown(Path::new("about.md"), text, "2026-08-29").unwrap();

        assert_eq!(page.nav.as_ref().unwrap().label, "About");
        let seo = page.seo.unwrap();
        assert_eq!(seo.meta_description.as_deref(), Some("who I am"));
        assert_eq!(seo.no_ai_training, Some(true));
    }

    #[test]
    fn test_bad_kind_rejected() {
        let text = "---\nkind: article\n---\nbody";
        assert!(page_from_markdown(Path::new("x.md"), text, "2026-08-29").is_err());
    }
}
