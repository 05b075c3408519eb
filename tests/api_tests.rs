//! HTTP route tests
//! Drives the router in-process with `tower::ServiceExt::oneshot`

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use remixblog::api::{create_router, AppState};
use remixblog::auth::{NewUser, User};
use remixblog::config::{Config, Environment};
use remixblog::posts::{NewPost, Post};
use remixblog::store::{MemoryStore, PostStore, SharedStore, UserStore};

fn test_config() -> Config {
    let mut config = Config::default();
    config.session.secret = "api-test-secret".to_string();
    config.auth.bcrypt_cost = 4;
    config
}

fn app_with(config: Config) -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let shared: SharedStore = Arc::new(store.clone());
    let state = AppState::new(config, shared).expect("state");
    (create_router(Arc::new(state)), store)
}

fn app() -> (Router, MemoryStore) {
    app_with(test_config())
}

fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn cookie_pair(response: &axum::response::Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Register a user through the form and return the session cookie pair
async fn register(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(form(
            "/auth/login",
            &format!("loginType=register&username={}&password=secret123", username),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/posts");
    cookie_pair(&response)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("healthy"));
}

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let (app, _) = app();
    let response = app
        .oneshot(form(
            "/auth/login",
            "loginType=register&username=alice&password=secret123",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("remixblog_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=5184000"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let mut config = test_config();
    config.server.environment = Environment::Production;
    let (app, _) = app_with(config);

    let response = app
        .oneshot(form(
            "/auth/login",
            "loginType=register&username=alice&password=secret123",
            None,
        ))
        .await
        .unwrap();
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("; Secure"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_400() {
    let (app, _) = app();
    register(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(form(
            "/auth/login",
            "loginType=login&username=alice&password=wrongpass",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!response.headers().contains_key(header::SET_COOKIE));
    let wrong_password = body_string(response).await;

    let response = app
        .oneshot(form(
            "/auth/login",
            "loginType=login&username=nobody&password=wrongpass",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let unknown_user = body_string(response).await;

    assert!(wrong_password.contains("Invalid credentials"));
    assert!(unknown_user.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_login_success() {
    let (app, _) = app();
    register(&app, "alice").await;

    let response = app
        .oneshot(form(
            "/auth/login",
            "loginType=login&username=alice&password=secret123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn test_duplicate_registration_is_form_error() {
    let (app, _) = app();
    register(&app, "alice").await;

    let mut request = form(
        "/auth/login",
        "loginType=register&username=alice&password=secret123",
        None,
    );
    request
        .headers_mut()
        .insert(header::ACCEPT, "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["formError"], "User alice already exists");
    assert_eq!(json["fields"]["username"], "alice");
}

#[tokio::test]
async fn test_login_validation_payload() {
    let (app, _) = app();
    let mut request = form("/auth/login", "loginType=login&username=al&password=123", None);
    request
        .headers_mut()
        .insert(header::ACCEPT, "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["fieldErrors"]["username"].is_string());
    assert!(json["fieldErrors"]["password"].is_string());
    assert!(json["fields"].get("password").is_none());
}

#[tokio::test]
async fn test_invalid_login_type() {
    let (app, _) = app();
    let response = app
        .oneshot(form(
            "/auth/login",
            "loginType=admin&username=alice&password=secret123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("Login type invalid"));
}

#[tokio::test]
async fn test_new_post_requires_login() {
    let (app, _) = app();

    let response = app.clone().oneshot(get("/posts/new", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/auth/login");

    let response = app
        .oneshot(form("/posts/new", "title=Hello&body=long enough body", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_new_post_validation_rerenders_form() {
    let (app, store) = app();
    let cookie = register(&app, "alice").await;

    let response = app
        .oneshot(form("/posts/new", "title=Hi&body=short", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_string(response).await;
    assert!(html.contains("title should be at least three characters long"));
    assert!(html.contains("body should be at least ten characters long"));
    assert!(html.contains("value=\"Hi\""));
    assert!(store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_new_post_validation_json() {
    let (app, _) = app();
    let cookie = register(&app, "alice").await;

    let mut request = form("/posts/new", "title=Hello&body=short", Some(&cookie));
    request
        .headers_mut()
        .insert(header::ACCEPT, "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["fieldErrors"].get("title").is_none());
    assert_eq!(
        json["fieldErrors"]["body"],
        "body should be at least ten characters long"
    );
    assert_eq!(json["fields"]["title"], "Hello");
    assert_eq!(json["fields"]["body"], "short");
}

#[tokio::test]
async fn test_create_and_show_post() {
    let (app, store) = app();
    let cookie = register(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(form(
            "/posts/new",
            "title=Hello+world&body=This+is+my+first+post",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let posts = store.list_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert_eq!(location, format!("/posts/{}", posts[0].id));

    let response = app.clone().oneshot(get(location, Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Hello world"));
    assert!(html.contains("This is my first post"));
    assert!(html.contains("Logout alice"));
    assert!(html.contains("_method"));

    let response = app.oneshot(get("/posts", None)).await.unwrap();
    assert!(body_string(response).await.contains("Hello world"));
}

#[tokio::test]
async fn test_missing_post_is_404() {
    let (app, _) = app();
    let response = app.oneshot(get("/posts/does-not-exist", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_author_can_delete() {
    let (app, store) = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    app.clone()
        .oneshot(form(
            "/posts/new",
            "title=Alice+post&body=Written+by+alice",
            Some(&alice),
        ))
        .await
        .unwrap();
    let post_id = store.list_posts().await.unwrap()[0].id.clone();
    let uri = format!("/posts/{}", post_id);

    let response = app
        .clone()
        .oneshot(form(&uri, "_method=delete", Some(&bob)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(store.find_post(&post_id).await.unwrap().is_some());

    let response = app
        .oneshot(form(&uri, "_method=delete", Some(&alice)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(store.find_post(&post_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_flow() {
    let (app, _) = app();
    let cookie = register(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(form("/auth/logout", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/auth/logout");
    let cleared = cookie_pair(&response);
    assert_eq!(cleared, "remixblog_session=");

    let response = app
        .clone()
        .oneshot(get("/posts/new", Some(&cleared)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.oneshot(get("/auth/logout", Some(&cleared))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("You have been logged out"));
}

#[tokio::test]
async fn test_garbage_cookie_is_anonymous() {
    let (app, _) = app();
    let response = app
        .oneshot(get("/posts", Some("remixblog_session=garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("href=\"/auth/login\""));
}

#[test]
fn test_state_requires_secret() {
    let mut config = test_config();
    config.session.secret = String::new();
    let result = AppState::new(config, Arc::new(MemoryStore::new()));
    assert!(matches!(result, Err(remixblog::Error::MissingSessionSecret)));
}

/// Store whose every call fails, like a dropped database connection
struct UnavailableStore;

fn unavailable<T>() -> remixblog::error::Result<T> {
    Err(remixblog::Error::Other("connection refused".to_string()))
}

#[async_trait::async_trait]
impl UserStore for UnavailableStore {
    async fn find_user_by_username(
        &self,
        _username: &str,
    ) -> remixblog::error::Result<Option<User>> {
        unavailable()
    }

    async fn find_user_by_id(&self, _id: &str) -> remixblog::error::Result<Option<User>> {
        unavailable()
    }

    async fn insert_user(&self, _user: NewUser) -> remixblog::error::Result<User> {
        unavailable()
    }
}

#[async_trait::async_trait]
impl PostStore for UnavailableStore {
    async fn list_posts(&self) -> remixblog::error::Result<Vec<Post>> {
        unavailable()
    }

    async fn find_post(&self, _id: &str) -> remixblog::error::Result<Option<Post>> {
        unavailable()
    }

    async fn insert_post(&self, _post: NewPost) -> remixblog::error::Result<Post> {
        unavailable()
    }

    async fn delete_post(&self, _id: &str) -> remixblog::error::Result<bool> {
        unavailable()
    }
}

#[tokio::test]
async fn test_login_storage_failure_is_500() {
    let shared: SharedStore = Arc::new(UnavailableStore);
    let state = AppState::new(test_config(), shared).expect("state");
    let app = create_router(Arc::new(state));

    for login_type in ["login", "register"] {
        let response = app
            .clone()
            .oneshot(form(
                "/auth/login",
                &format!("loginType={}&username=alice&password=secret123", login_type),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }
}
