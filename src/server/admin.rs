//! Tenant admin surface: page CRUD (drafts included) and the site bundle
//! history. Authentication is the deployment's responsibility; in platform
//! mode these routes sit behind the platform's own session layer.

use std::sync::Arc;

use axum::{
    Json,
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use crate::server::AppState;
use crate::server::dto::{RevisionListResponse, SaveBundleResponse, UpsertPageRequest};
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt,
};
use crate::server::validation::{validate_page_id, validate_slug};
use crate::types::BundleContent;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pages", get(list_pages).post(create_page))
        .route(
            "/pages/{id}",
            get(get_page).put(upsert_page).delete(delete_page),
        )
        .route("/site", get(get_site).put(save_site))
        .route("/site/revisions", get(list_revisions))
        .route("/site/revisions/{id}/activate", post(activate_revision))
        .route("/site/revisions/{id}", delete(delete_revision))
}

async fn list_pages(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let pages = state
        .store
        .list_all_pages(&state.tenant_id)
        .api_err("Failed to list pages")?;
    Ok(Json(ApiResponse::success(pages)))
}

async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .store
        .get_page_by_id(&id, &state.tenant_id)
        .api_err("Failed to load page")?
        .or_not_found("Page not found")?;
    Ok(Json(ApiResponse::success(page)))
}

/// Creates a page under a fresh stable id. Renames afterwards touch only
/// the slug; the id keeps wiki-links working.
async fn create_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_slug(&req.slug)?;

    let page = req.into_page(uuid::Uuid::new_v4().to_string());
    state
        .store
        .upsert_page(&page, &state.tenant_id)
        .api_err("Failed to create page")?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(page))))
}

async fn upsert_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpsertPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_page_id(&id)?;
    validate_slug(&req.slug)?;

    let page = req.into_page(id);
    state
        .store
        .upsert_page(&page, &state.tenant_id)
        .api_err("Failed to save page")?;
    Ok(Json(ApiResponse::success(page)))
}

async fn delete_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete_page(&id, &state.tenant_id)
        .api_err("Failed to delete page")?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Page not found"))
    }
}

// --- Site bundle ---

async fn get_site(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let bundle = state
        .store
        .get_active_bundle(&state.tenant_id)
        .api_err("Failed to load site bundle")?
        .or_not_found("No site bundle yet")?;
    Ok(Json(ApiResponse::success(bundle)))
}

async fn save_site(
    State(state): State<Arc<AppState>>,
    Json(content): Json<BundleContent>,
) -> Result<impl IntoResponse, ApiError> {
    let revision_id = state
        .store
        .append_bundle_revision(&content, &state.tenant_id)
        .api_err("Failed to save site bundle")?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SaveBundleResponse { revision_id })),
    ))
}

async fn list_revisions(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let revisions = state
        .store
        .list_bundle_revisions(&state.tenant_id)
        .api_err("Failed to list revisions")?;
    let current_revision_id = state
        .store
        .current_revision_id(&state.tenant_id)
        .api_err("Failed to load current revision")?;
    Ok(Json(ApiResponse::success(RevisionListResponse {
        current_revision_id,
        revisions,
    })))
}

/// "Use this version": repoints the current pointer without deleting
/// anything.
async fn activate_revision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let exists = state
        .store
        .list_bundle_revisions(&state.tenant_id)
        .api_err("Failed to list revisions")?
        .iter()
        .any(|r| r.revision_id == id);
    if !exists {
        return Err(ApiError::not_found("Revision not found"));
    }

    state
        .store
        .set_current_revision(id, &state.tenant_id)
        .api_err("Failed to activate revision")?;
    Ok(Json(ApiResponse::success(SaveBundleResponse {
        revision_id: id,
    })))
}

async fn delete_revision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_bundle_revision(id, &state.tenant_id)
        .api_err("Failed to delete revision")?;
    Ok(StatusCode::NO_CONTENT)
}
