use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::render::render_page_content;
use crate::server::AppState;
use crate::server::dto::ApiErrorBody;
use crate::server::layout::{
    self, DEFAULT_SITE_CSS, DEFAULT_SITE_TEMPLATE, LayoutOptions,
};
use crate::server::response::{ApiError, Asset, HtmlPage, StoreResultExt};
use crate::server::validation::is_valid_slug;
use crate::types::{NavItem, Page, PageKind};

/// The serving surface reads only the resolved active bundle; an empty or
/// missing shell falls back to the built-in template.
fn active_shell(state: &AppState) -> Result<String, ApiError> {
    let bundle = state
        .store
        .get_active_bundle(&state.tenant_id)
        .api_err("Failed to load site bundle")?;
    Ok(match bundle {
        Some(b) if !b.html.trim().is_empty() => b.html,
        _ => DEFAULT_SITE_TEMPLATE.to_string(),
    })
}

fn document(
    state: &AppState,
    title: &str,
    nav_items: &[NavItem],
    page: Option<&Page>,
    fragment: &str,
    status: StatusCode,
) -> Result<HtmlPage, ApiError> {
    let shell = active_shell(state)?;
    let opts = LayoutOptions {
        title,
        nav_items,
        url_prefix: &state.url_prefix,
        site_name: &state.site_name,
        scripts: page.and_then(|p| p.scripts.as_deref()),
        page,
    };
    let body = layout::render_layout(&shell, &opts, fragment);
    let no_ai_training = page
        .and_then(|p| p.seo.as_ref())
        .and_then(|s| s.no_ai_training)
        .unwrap_or(false);

    Ok(HtmlPage {
        status,
        body,
        no_ai_training,
    })
}

fn not_found_document(state: &AppState, nav_items: &[NavItem]) -> Result<HtmlPage, ApiError> {
    document(
        state,
        "Not found",
        nav_items,
        None,
        &layout::not_found_fragment(),
        StatusCode::NOT_FOUND,
    )
}

pub async fn home(State(state): State<Arc<AppState>>) -> Result<HtmlPage, ApiError> {
    let store = state.store.as_ref();
    let tenant = state.tenant_id.as_str();
    let prefix = state.url_prefix.as_str();

    let page = store
        .get_published_by_kind(PageKind::Home, tenant)
        .api_err("Failed to load home page")?;
    let posts = store
        .list_published_posts(tenant)
        .api_err("Failed to list posts")?;
    let nav_items = store
        .list_nav_items(tenant)
        .api_err("Failed to load nav items")?;

    let Some(page) = page else {
        return not_found_document(&state, &nav_items);
    };

    // An empty home body renders no intro block.
    let intro = if page.content.trim().is_empty() {
        None
    } else {
        Some(
            render_page_content(store, &page.content, tenant, prefix)
                .api_err("Failed to render home content")?,
        )
    };

    let fragment = layout::home_fragment(&page, &posts, intro.as_deref(), prefix);
    document(&state, &page.title, &nav_items, Some(&page), &fragment, StatusCode::OK)
}

pub async fn post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<HtmlPage, ApiError> {
    let store = state.store.as_ref();
    let tenant = state.tenant_id.as_str();

    let nav_items = store
        .list_nav_items(tenant)
        .api_err("Failed to load nav items")?;

    // Malformed slugs never reach the page lookup.
    if !is_valid_slug(&slug) {
        return not_found_document(&state, &nav_items);
    }

    let page = store
        .get_published_by_slug(&slug, PageKind::Post, tenant)
        .api_err("Failed to load post")?;
    let Some(page) = page else {
        return not_found_document(&state, &nav_items);
    };

    let body_html = render_page_content(store, &page.content, tenant, &state.url_prefix)
        .api_err("Failed to render post content")?;
    let fragment = layout::post_fragment(&page, &body_html);
    document(&state, &page.title, &nav_items, Some(&page), &fragment, StatusCode::OK)
}

/// `GET /{slug}`: static page, or the terminal 404 for unmatched
/// single-segment paths (API routes are matched ahead of this one).
pub async fn static_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<HtmlPage, ApiError> {
    let store = state.store.as_ref();
    let tenant = state.tenant_id.as_str();

    let nav_items = store
        .list_nav_items(tenant)
        .api_err("Failed to load nav items")?;

    if !is_valid_slug(&slug) {
        return not_found_document(&state, &nav_items);
    }

    let page = store
        .get_published_by_slug(&slug, PageKind::Page, tenant)
        .api_err("Failed to load page")?;
    let Some(page) = page else {
        return not_found_document(&state, &nav_items);
    };

    let body_html = render_page_content(store, &page.content, tenant, &state.url_prefix)
        .api_err("Failed to render page content")?;
    let fragment = layout::content_fragment(&page, &body_html);
    document(&state, &page.title, &nav_items, Some(&page), &fragment, StatusCode::OK)
}

pub async fn not_found(State(state): State<Arc<AppState>>) -> Result<HtmlPage, ApiError> {
    let nav_items = state
        .store
        .list_nav_items(&state.tenant_id)
        .api_err("Failed to load nav items")?;
    not_found_document(&state, &nav_items)
}

// --- JSON API ---

pub async fn api_posts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .store
        .list_published_posts(&state.tenant_id)
        .api_err("Failed to list posts")?;
    Ok(Json(posts))
}

pub async fn api_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    if !is_valid_slug(&slug) {
        return Ok(post_not_found());
    }

    let post = state
        .store
        .get_published_by_slug(&slug, PageKind::Post, &state.tenant_id)
        .api_err("Failed to load post")?;

    Ok(match post {
        Some(page) => Json(page).into_response(),
        None => post_not_found(),
    })
}

fn post_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorBody {
            error: "Post not found".to_string(),
        }),
    )
        .into_response()
}

// --- Site bundle assets ---

pub async fn site_css(State(state): State<Arc<AppState>>) -> Result<Asset, ApiError> {
    let bundle = state
        .store
        .get_active_bundle(&state.tenant_id)
        .api_err("Failed to load site bundle")?;
    let body = match bundle {
        Some(b) if !b.css.is_empty() => b.css,
        _ => DEFAULT_SITE_CSS.to_string(),
    };
    Ok(Asset {
        content_type: "text/css; charset=utf-8",
        body,
    })
}

pub async fn site_js(State(state): State<Arc<AppState>>) -> Result<Asset, ApiError> {
    let bundle = state
        .store
        .get_active_bundle(&state.tenant_id)
        .api_err("Failed to load site bundle")?;
    Ok(Asset {
        content_type: "application/javascript; charset=utf-8",
        body: bundle.map(|b| b.js).unwrap_or_default(),
    })
}
