use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use pressman::server::{AppState, create_router};
use pressman::store::{SqliteStore, Store};
use pressman::types::*;

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
    // Held for the lifetime of the database file.
    _temp: TempDir,
}

fn test_app() -> TestApp {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::new(temp.path().join("test.db")).unwrap());
    store.initialize().unwrap();

    let state = Arc::new(AppState::new(store.clone(), None, String::new()));
    TestApp {
        router: create_router(state),
        store,
        _temp: temp,
    }
}

fn page(id: &str, kind: PageKind, content: &str) -> Page {
    Page {
        id: id.to_string(),
        slug: id.to_string(),
        title: format!("Title {id}"),
        content: content.to_string(),
        excerpt: format!("Excerpt {id}"),
        tags: vec![],
        date: "2026-01-01".to_string(),
        updated: None,
        published: true,
        scripts: None,
        seo: None,
        kind,
        nav: None,
    }
}

fn nav_page(id: &str, label: &str, order: i64) -> Page {
    let mut p = page(id, PageKind::Page, "nav page body");
    p.nav = Some(PageNav {
        label: label.to_string(),
        order,
    });
    p
}

async fn get(app: &TestApp, path: &str) -> (StatusCode, String, axum::http::HeaderMap) {
    let response = app
        .router
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap(), headers)
}

async fn send_json(
    app: &TestApp,
    method: &str,
    path: &str,
    body: Value,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// --- Public routes ---

#[tokio::test]
async fn home_renders_intro_posts_and_nav() {
    let app = test_app();
    let tenant = DEFAULT_TENANT_ID;

    let mut home = page("home", PageKind::Home, "Welcome to [[about]].");
    home.title = "My Blog".to_string();
    app.store.upsert_page(&home, tenant).unwrap();
    app.store
        .upsert_page(&page("about", PageKind::Page, "About body"), tenant)
        .unwrap();
    app.store
        .upsert_page(&nav_page("uses", "Uses", 1), tenant)
        .unwrap();
    app.store
        .upsert_page(&page("first-post", PageKind::Post, "post body"), tenant)
        .unwrap();

    let (status, body, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    // Intro block: wiki-link resolved to the page's current slug.
    assert!(body.contains(r#"<a href="/about">Title about</a>"#));
    // Post listing and nav bar.
    assert!(body.contains("/posts/first-post"));
    assert!(body.contains(r#"<a href="/uses">Uses</a>"#));
}

#[tokio::test]
async fn home_without_home_page_is_404() {
    let app = test_app();
    app.store
        .upsert_page(&nav_page("about", "About", 1), DEFAULT_TENANT_ID)
        .unwrap();

    let (status, body, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // Nav still present in the 404 render.
    assert!(body.contains("About"));
}

#[tokio::test]
async fn home_with_empty_content_has_no_intro_block() {
    let app = test_app();
    app.store
        .upsert_page(&page("home", PageKind::Home, "   \n"), DEFAULT_TENANT_ID)
        .unwrap();

    let (status, body, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("home-intro"));
}

#[tokio::test]
async fn post_renders_markdown_and_broken_links() {
    let app = test_app();
    app.store
        .upsert_page(
            &page(
                "my-post",
                PageKind::Post,
                "Some *markdown* and [[missing-id]].",
            ),
            DEFAULT_TENANT_ID,
        )
        .unwrap();

    let (status, body, _) = get(&app, "/posts/my-post").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<em>markdown</em>"));
    assert!(body.contains("[broken link: missing-id]"));
}

#[tokio::test]
async fn unknown_post_is_404_with_nav() {
    let app = test_app();
    app.store
        .upsert_page(&nav_page("about", "About", 1), DEFAULT_TENANT_ID)
        .unwrap();

    let (status, body, _) = get(&app, "/posts/unknown-slug").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("About"));
}

#[tokio::test]
async fn draft_pages_are_not_publicly_visible() {
    let app = test_app();
    let mut draft = page("secret", PageKind::Post, "draft body");
    draft.published = false;
    app.store.upsert_page(&draft, DEFAULT_TENANT_ID).unwrap();

    let (status, _, _) = get(&app, "/posts/secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_page_and_fall_through_404() {
    let app = test_app();
    app.store
        .upsert_page(&page("uses", PageKind::Page, "What I use"), DEFAULT_TENANT_ID)
        .unwrap();

    let (status, body, _) = get(&app, "/uses").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("What I use"));

    let (status, _, _) = get(&app, "/no-such-page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Multi-segment paths miss every route and land on the fallback.
    let (status, _, _) = get(&app, "/a/b/c").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn no_ai_training_sets_robots_header() {
    let app = test_app();
    let mut p = page("guarded", PageKind::Post, "body");
    p.seo = Some(PageMeta {
        no_ai_training: Some(true),
        ..Default::default()
    });
    app.store.upsert_page(&p, DEFAULT_TENANT_ID).unwrap();

    let (_, _, headers) = get(&app, "/posts/guarded").await;
    assert_eq!(headers.get("X-Robots-Tag").unwrap(), "noai, noimageai");

    let (_, _, headers) = get(&app, "/posts/guarded").await;
    assert!(headers.get("Content-Type").unwrap().to_str().unwrap().starts_with("text/html"));
}

// --- JSON API ---

#[tokio::test]
async fn api_posts_lists_published_posts() {
    let app = test_app();
    app.store
        .upsert_page(&page("a-post", PageKind::Post, "body"), DEFAULT_TENANT_ID)
        .unwrap();
    let mut draft = page("b-post", PageKind::Post, "body");
    draft.published = false;
    app.store.upsert_page(&draft, DEFAULT_TENANT_ID).unwrap();

    let (status, body, _) = get(&app, "/api/posts").await;
    assert_eq!(status, StatusCode::OK);
    let posts: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["id"], "a-post");
}

#[tokio::test]
async fn api_post_found_and_missing() {
    let app = test_app();
    app.store
        .upsert_page(&page("a-post", PageKind::Post, "body"), DEFAULT_TENANT_ID)
        .unwrap();

    let (status, body, _) = get(&app, "/api/posts/a-post").await;
    assert_eq!(status, StatusCode::OK);
    let post: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(post["slug"], "a-post");

    let (status, body, _) = get(&app, "/api/posts/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["error"], "Post not found");
}

// --- Admin surface ---

#[tokio::test]
async fn admin_page_crud_round_trip() {
    let app = test_app();

    let body = json!({
        "slug": "about",
        "title": "About",
        "content": "who I am",
        "date": "2026-01-01",
        "published": false,
        "kind": "page"
    });
    let (status, response) = send_json(&app, "PUT", "/api/admin/pages/about", body).await;
    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(saved["data"]["id"], "about");

    // Drafts show up in the admin listing but not publicly.
    let (status, body, _) = get(&app, "/api/admin/pages").await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listing["data"].as_array().unwrap().len(), 1);

    let (status, _, _) = get(&app, "/about").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::delete("/api/admin/pages/about")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _, _) = get(&app, "/api/admin/pages/about").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_rejects_invalid_slug() {
    let app = test_app();
    let body = json!({
        "slug": "Not A Slug",
        "title": "x",
        "date": "2026-01-01",
        "kind": "page"
    });
    let (status, _) = send_json(&app, "PUT", "/api/admin/pages/x", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn site_bundle_save_rollback_delete() {
    let app = test_app();

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/admin/site",
        json!({"html": "<main>A {{content}}</main>", "css": "body{color:red}", "js": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first: Value = serde_json::from_str(&body).unwrap();
    let first_id = first["data"]["revision_id"].as_i64().unwrap();

    let (_, body) = send_json(
        &app,
        "PUT",
        "/api/admin/site",
        json!({"html": "<main>B {{content}}</main>", "css": "", "js": "console.log(1)"}),
    )
    .await;
    let second: Value = serde_json::from_str(&body).unwrap();
    let second_id = second["data"]["revision_id"].as_i64().unwrap();

    // The serving surface picks up the newest revision.
    app.store
        .upsert_page(&page("home", PageKind::Home, ""), DEFAULT_TENANT_ID)
        .unwrap();
    let (_, body, _) = get(&app, "/").await;
    assert!(body.starts_with("<main>B "));

    let (_, css, _) = get(&app, "/site.css").await;
    // Second revision shipped no css, falls back to the default stylesheet.
    assert!(css.contains("max-width"));
    let (_, js, _) = get(&app, "/site.js").await;
    assert_eq!(js, "console.log(1)");

    // Rollback to the first revision.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/admin/site/revisions/{first_id}/activate"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body, _) = get(&app, "/").await;
    assert!(body.starts_with("<main>A "));
    let (_, css, _) = get(&app, "/site.css").await;
    assert_eq!(css, "body{color:red}");

    // Deleting the current revision repairs the pointer to the survivor.
    let request = Request::delete(format!("/api/admin/site/revisions/{first_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, body, _) = get(&app, "/api/admin/site/revisions").await;
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listing["data"]["current_revision_id"].as_i64(), Some(second_id));
    assert_eq!(listing["data"]["revisions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn activating_unknown_revision_is_404() {
    let app = test_app();
    let (status, _) = send_json(&app, "POST", "/api/admin/site/revisions/99/activate", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn url_prefix_shapes_generated_links() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::new(temp.path().join("test.db")).unwrap());
    store.initialize().unwrap();

    let state = Arc::new(AppState::new(
        store.clone(),
        Some("tenant-7".to_string()),
        "/dennis".to_string(),
    ));
    let router = create_router(state);

    store
        .upsert_page(
            &page("home", PageKind::Home, "read [[a-post]]"),
            "tenant-7",
        )
        .unwrap();
    store
        .upsert_page(&page("a-post", PageKind::Post, "body"), "tenant-7")
        .unwrap();

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains(r#"<a href="/dennis/posts/a-post">Title a-post</a>"#));
}
