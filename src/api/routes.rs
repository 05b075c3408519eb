//! Route handlers

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use minijinja::context;
use serde::Serialize;

use super::server::SharedState;
use crate::auth::{CurrentUser, LoginForm, LoginType, RequireUser, User, UserInfo};
use crate::error::{Error, Result};
use crate::posts::{
    ActionData, LoginActionData, LoginFieldErrors, LoginFields, NewPost, PostActionData,
    PostActionForm, PostFieldErrors, PostFields, PostForm,
};

/// Where a successful login or registration lands
const AFTER_LOGIN: &str = "/posts";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

pub async fn index() -> Redirect {
    Redirect::to("/posts")
}

/// Whether the client asked for JSON rather than HTML
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json") && !accept.contains("text/html"))
        .unwrap_or(false)
}

/// Respond 400 with the action data, as JSON or as the re-rendered form
fn bad_request<T: Serialize>(
    state: &SharedState,
    headers: &HeaderMap,
    template: &str,
    user: Option<&User>,
    data: &T,
) -> Result<Response> {
    if wants_json(headers) {
        return Ok((StatusCode::BAD_REQUEST, Json(data)).into_response());
    }

    let page = state.views.render(
        template,
        context! {
            user => user.cloned().map(UserInfo::from),
            data => data,
        },
    )?;
    Ok((StatusCode::BAD_REQUEST, page).into_response())
}

// Posts

pub async fn list_posts(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    let posts = state.store.list_posts().await?;

    state.views.render(
        "posts/index.html",
        context! {
            user => user.map(UserInfo::from),
            posts => posts,
        },
    )
}

pub async fn show_post(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    let post = state
        .store
        .find_post(&id)
        .await?
        .ok_or_else(|| Error::PostNotFound(id.clone()))?;

    let can_delete = user
        .as_ref()
        .map(|u| post.is_authored_by(&u.id))
        .unwrap_or(false);

    state.views.render(
        "posts/show.html",
        context! {
            user => user.map(UserInfo::from),
            post => post,
            can_delete => can_delete,
        },
    )
}

pub async fn new_post_form(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>> {
    state.views.render(
        "posts/new.html",
        context! {
            user => UserInfo::from(user),
            data => PostActionData::new(PostFieldErrors::default(), PostFields::default()),
        },
    )
}

pub async fn create_post(
    State(state): State<SharedState>,
    RequireUser(user): RequireUser,
    headers: HeaderMap,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let field_errors = PostFieldErrors::validate(form.title.as_deref(), form.body.as_deref());
    let fields = PostFields {
        title: form.title.unwrap_or_default(),
        body: form.body.unwrap_or_default(),
    };

    if field_errors.has_errors() {
        tracing::debug!(?field_errors, "Rejected new post");
        let data = ActionData::new(field_errors, fields);
        return bad_request(&state, &headers, "posts/new.html", Some(&user), &data);
    }

    let post = state
        .store
        .insert_post(NewPost {
            title: fields.title,
            body: fields.body,
            user_id: user.id.clone(),
        })
        .await?;

    tracing::info!(post_id = %post.id, user_id = %user.id, "Created post");
    Ok(Redirect::to(&format!("/posts/{}", post.id)).into_response())
}

/// Form actions on a single post. Only `_method=delete` is supported.
pub async fn post_action(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    RequireUser(user): RequireUser,
    Form(form): Form<PostActionForm>,
) -> Result<Response> {
    if form.method.as_deref() != Some("delete") {
        return Ok((StatusCode::BAD_REQUEST, "Unsupported action").into_response());
    }

    let post = state
        .store
        .find_post(&id)
        .await?
        .ok_or_else(|| Error::PostNotFound(id.clone()))?;

    if !post.is_authored_by(&user.id) {
        tracing::warn!(post_id = %id, user_id = %user.id, "Refused to delete another user's post");
        return Ok((StatusCode::FORBIDDEN, "You can only delete your own posts").into_response());
    }

    state.store.delete_post(&id).await?;
    tracing::info!(post_id = %id, user_id = %user.id, "Deleted post");
    Ok(Redirect::to("/posts").into_response())
}

// Auth

pub async fn login_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    state.views.render(
        "auth/login.html",
        context! {
            user => user.map(UserInfo::from),
            data => LoginActionData::new(LoginFieldErrors::default(), LoginFields::default()),
        },
    )
}

pub async fn login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let login_type = form.login_type.as_deref().map(str::parse::<LoginType>);
    let field_errors = LoginFieldErrors::validate(form.username.as_deref(), form.password.as_deref());
    let fields = LoginFields {
        login_type: form.login_type.clone().unwrap_or_default(),
        username: form.username.clone().unwrap_or_default(),
    };

    let Some(Ok(login_type)) = login_type else {
        let data = ActionData::new(field_errors, fields).with_form_error("Login type invalid");
        return bad_request(&state, &headers, "auth/login.html", None, &data);
    };

    if field_errors.has_errors() {
        let data = ActionData::new(field_errors, fields);
        return bad_request(&state, &headers, "auth/login.html", None, &data);
    }

    let username = fields.username.as_str();
    let password = form.password.as_deref().unwrap_or_default();

    let user = match login_type {
        LoginType::Login => match state.credentials.authenticate(username, password).await? {
            Some(user) => user,
            None => {
                tracing::info!("Failed login for {}", username);
                let data = ActionData::new(field_errors, fields.clone())
                    .with_form_error("Invalid credentials");
                return bad_request(&state, &headers, "auth/login.html", None, &data);
            }
        },
        LoginType::Register => match state.credentials.register(username, password).await {
            Ok(user) => user,
            Err(Error::DuplicateKey(_)) => {
                let message = format!("User {} already exists", username);
                let data = ActionData::new(field_errors, fields.clone()).with_form_error(message);
                return bad_request(&state, &headers, "auth/login.html", None, &data);
            }
            Err(e) => return Err(e),
        },
    };

    tracing::info!(user_id = %user.id, "{} succeeded for {}", login_type, user.username);
    Ok(state.sessions.create_user_session(&user.id, AFTER_LOGIN))
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    state.sessions.logout(&headers)
}

pub async fn logged_out(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    state.views.render(
        "auth/logout.html",
        context! { user => user.map(UserInfo::from) },
    )
}
