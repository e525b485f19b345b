//! Thin HTML glue: wraps rendered page content in the tenant's site shell.
//!
//! The shell is the active site bundle's `html` with `{{placeholder}}`
//! slots; when a tenant has no bundle yet, a built-in default is used.

use crate::types::{NavItem, Page, PageKind, PageSummary};

/// Built-in site shell used until a tenant saves their own bundle.
pub const DEFAULT_SITE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}}</title>
{{meta}}
  <link rel="stylesheet" href="{{prefix}}/site.css">
</head>
<body>
<header class="site-header">
  <a class="site-logo" href="{{homeHref}}">{{siteName}}</a>
  <nav class="site-nav" aria-label="Main">
{{nav}}
  </nav>
</header>
<main class="container">
{{content}}
</main>
<footer class="site-footer">
  <p>&copy; {{year}} {{siteName}}</p>
</footer>
{{scripts}}
<script src="{{prefix}}/site.js" defer></script>
</body>
</html>
"#;

/// Default stylesheet served at /site.css when no bundle provides one.
pub const DEFAULT_SITE_CSS: &str = r#"body { max-width: 42rem; margin: 0 auto; padding: 1rem; font-family: system-ui, sans-serif; line-height: 1.6; }
.site-header { display: flex; gap: 1rem; align-items: baseline; margin-bottom: 2rem; }
.site-logo { font-weight: 700; text-decoration: none; color: inherit; }
.site-nav a { margin-right: 0.75rem; }
.post-list { list-style: none; padding: 0; }
.post-list li { margin-bottom: 1rem; }
.post-date { color: #666; font-size: 0.875rem; }
.site-footer { margin-top: 3rem; color: #666; font-size: 0.875rem; }
"#;

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Context handed to the shell when wrapping a content fragment.
pub struct LayoutOptions<'a> {
    pub title: &'a str,
    pub nav_items: &'a [NavItem],
    pub url_prefix: &'a str,
    pub site_name: &'a str,
    pub scripts: Option<&'a [String]>,
    pub page: Option<&'a Page>,
}

fn nav_href(item: &NavItem, url_prefix: &str) -> String {
    match item.kind {
        PageKind::Home => {
            if url_prefix.is_empty() {
                "/".to_string()
            } else {
                url_prefix.to_string()
            }
        }
        PageKind::Post => format!("{url_prefix}/posts/{}", item.slug),
        PageKind::Page => format!("{url_prefix}/{}", item.slug),
    }
}

fn nav_links(items: &[NavItem], url_prefix: &str) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "    <a href=\"{}\">{}</a>",
                escape_html(&nav_href(item, url_prefix)),
                escape_html(&item.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn script_tags(scripts: Option<&[String]>) -> String {
    scripts
        .unwrap_or_default()
        .iter()
        .map(|s| format!("<script type=\"module\" src=\"{}\"></script>", escape_html(s)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn meta_tags(page: Option<&Page>) -> String {
    let Some(page) = page else {
        return String::new();
    };

    let mut tags = Vec::new();
    let description = page
        .seo
        .as_ref()
        .and_then(|s| s.meta_description.as_deref())
        .unwrap_or(&page.excerpt);
    if !description.is_empty() {
        tags.push(format!(
            "  <meta name=\"description\" content=\"{}\">",
            escape_html(description)
        ));
    }

    if let Some(seo) = &page.seo {
        if let Some(url) = &seo.canonical_url {
            tags.push(format!(
                "  <link rel=\"canonical\" href=\"{}\">",
                escape_html(url)
            ));
        }
        if let Some(image) = &seo.og_image {
            tags.push(format!(
                "  <meta property=\"og:image\" content=\"{}\">",
                escape_html(image)
            ));
        }
        let mut robots = Vec::new();
        if seo.no_index == Some(true) {
            robots.push("noindex");
        }
        if seo.no_follow == Some(true) {
            robots.push("nofollow");
        }
        if !robots.is_empty() {
            tags.push(format!(
                "  <meta name=\"robots\" content=\"{}\">",
                robots.join(", ")
            ));
        }
    }

    tags.join("\n")
}

/// Fill the shell's `{{placeholder}}` slots with a rendered content fragment.
pub fn render_layout(shell: &str, opts: &LayoutOptions, content: &str) -> String {
    let home_href = if opts.url_prefix.is_empty() {
        "/".to_string()
    } else {
        opts.url_prefix.to_string()
    };
    let year = chrono::Utc::now().format("%Y").to_string();

    shell
        .replace("{{title}}", &escape_html(opts.title))
        .replace("{{siteName}}", &escape_html(opts.site_name))
        .replace("{{meta}}", &meta_tags(opts.page))
        .replace("{{nav}}", &nav_links(opts.nav_items, opts.url_prefix))
        .replace("{{homeHref}}", &escape_html(&home_href))
        .replace("{{prefix}}", opts.url_prefix)
        .replace("{{scripts}}", &script_tags(opts.scripts))
        .replace("{{year}}", &year)
        .replace("{{content}}", content)
}

// --- Content fragments ---

pub fn home_fragment(page: &Page, posts: &[PageSummary], intro_html: Option<&str>, url_prefix: &str) -> String {
    let intro = intro_html
        .map(|html| format!("<section class=\"home-intro\">\n{html}\n</section>\n"))
        .unwrap_or_default();

    let items = posts
        .iter()
        .map(|post| {
            format!(
                "  <li><a href=\"{prefix}/posts/{slug}\">{title}</a>\
                 <div class=\"post-date\">{date}</div>\
                 <p>{excerpt}</p></li>",
                prefix = url_prefix,
                slug = escape_html(&post.slug),
                title = escape_html(&post.title),
                date = escape_html(&post.date),
                excerpt = escape_html(&post.excerpt),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{intro}<h2>{title}</h2>\n<ul class=\"post-list\">\n{items}\n</ul>",
        title = escape_html(&page.title),
    )
}

pub fn post_fragment(page: &Page, body_html: &str) -> String {
    let updated = page
        .updated
        .as_deref()
        .map(|u| format!(" · updated {}", escape_html(u)))
        .unwrap_or_default();
    format!(
        "<article>\n<h1>{title}</h1>\n<div class=\"post-date\">{date}{updated}</div>\n{body_html}\n</article>",
        title = escape_html(&page.title),
        date = escape_html(&page.date),
    )
}

pub fn content_fragment(page: &Page, body_html: &str) -> String {
    format!(
        "<article>\n<h1>{title}</h1>\n{body_html}\n</article>",
        title = escape_html(&page.title),
    )
}

pub fn not_found_fragment() -> String {
    "<h1>404</h1>\n<p>That page doesn't exist.</p>".to_string()
}
