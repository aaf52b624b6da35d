use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use notes_core::UserStore;

use crate::common::{assert_redirects, json_body, session_cookie, spawn_app, TestApp};

mod common;

async fn login(app: &TestApp, username: &str, password: &str) -> axum::response::Response {
    let body = serde_json::json!({ "username": username, "password": password });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.send(request).await
}

#[tokio::test]
async fn login_issues_a_working_session() {
    let app = spawn_app().await;
    app.signup("Читатель").await;

    let response = login(&app, "Читатель", "pa55word").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let notes = app.request(Method::GET, "/notes/", Some(&cookie)).await;
    assert_eq!(notes.status(), StatusCode::OK);
    assert_eq!(json_body(notes).await["notes"], serde_json::json!([]));
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_unauthorized() {
    let app = spawn_app().await;
    app.signup("Читатель").await;

    assert_eq!(
        login(&app, "Читатель", "nope").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&app, "Никто", "pa55word").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = spawn_app().await;
    app.signup("Читатель").await;

    let body = serde_json::json!({ "username": "Читатель", "password": "other" });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/signup/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    assert_eq!(app.send(request).await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    let (cookie, _) = app.signup("Читатель").await;

    let response = app
        .request(Method::POST, "/auth/logout/", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = app.request(Method::GET, "/notes/", Some(&cookie)).await;
    assert_redirects(&after, "/auth/login/?next=/notes/");
}

#[tokio::test]
async fn expired_or_forged_session_redirects_to_login() {
    let app = spawn_app().await;
    let (_, user_id) = app.signup("Читатель").await;
    app.db
        .create_auth_session("stale", user_id, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let stale = app
        .request(Method::GET, "/notes/", Some("session=stale"))
        .await;
    let forged = app
        .request(Method::GET, "/notes/", Some("session=forged"))
        .await;

    assert_redirects(&stale, "/auth/login/?next=/notes/");
    assert_redirects(&forged, "/auth/login/?next=/notes/");
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = spawn_app().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/add/"].is_object());
    assert!(doc["paths"]["/edit/{slug}/"].is_object());
}

#[test]
fn openapi_document_is_written_to_disk() {
    let path = std::env::temp_dir().join(format!("notes-openapi-{}.json", uuid::Uuid::new_v4()));

    notes_api_lib::web::notes::write_openapi(&path).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(doc["paths"]["/delete/{slug}/"].is_object());
}
