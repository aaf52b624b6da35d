#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use notes_api_lib::adapters::db::DbAdapter;
use notes_api_lib::config::Config;
use notes_api_lib::web::{self, state::AppState};
use notes_core::UserId;
use serde_json::Value;
use tower::ServiceExt;

pub const URL_TO_ADD: &str = "/add/";
pub const URL_TO_DONE: &str = "/done/";

pub struct TestApp {
    pub router: Router,
    pub db: Arc<DbAdapter>,
}

pub async fn spawn_app() -> TestApp {
    let db = Arc::new(DbAdapter::in_memory().await.unwrap());
    let state = Arc::new(AppState::new(
        db.clone(),
        db.clone(),
        Arc::new(Config::default()),
    ));
    TestApp {
        router: web::router(state),
        db,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signs a new user up and returns their `Cookie` header value and id.
    pub async fn signup(&self, username: &str) -> (String, UserId) {
        let body = serde_json::json!({ "username": username, "password": "pa55word" });
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/signup/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let cookie = session_cookie(&response);
        let json = json_body(response).await;
        let user_id = json["user_id"].as_str().unwrap().parse().unwrap();
        (cookie, user_id)
    }

    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = serde_urlencoded::to_string(fields).unwrap();
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn request(&self, method: Method, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

/// The `session=<id>` pair from a response's `Set-Cookie` header.
pub fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub fn assert_redirects(response: &Response, target: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(response), target);
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
