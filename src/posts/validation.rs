//! Form field validation
//!
//! Validators return `Some(message)` when a field is rejected. Missing
//! fields are rejected like short ones. Lengths count characters, not bytes.

use serde::Serialize;

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_BODY_LEN: usize = 10;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

fn too_short(value: Option<&str>, min: usize) -> bool {
    value.map_or(true, |v| v.chars().count() < min)
}

pub fn validate_title(title: Option<&str>) -> Option<String> {
    too_short(title, MIN_TITLE_LEN)
        .then(|| "title should be at least three characters long".to_string())
}

pub fn validate_body(body: Option<&str>) -> Option<String> {
    too_short(body, MIN_BODY_LEN).then(|| "body should be at least ten characters long".to_string())
}

pub fn validate_username(username: Option<&str>) -> Option<String> {
    too_short(username, MIN_USERNAME_LEN)
        .then(|| "username should be at least three characters long".to_string())
}

pub fn validate_password(password: Option<&str>) -> Option<String> {
    too_short(password, MIN_PASSWORD_LEN)
        .then(|| "password should be at least six characters long".to_string())
}

/// Payload returned with a 400 so the form can be shown again
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData<E, F> {
    pub field_errors: E,
    pub fields: F,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
}

impl<E, F> ActionData<E, F> {
    pub fn new(field_errors: E, fields: F) -> Self {
        Self {
            field_errors,
            fields,
            form_error: None,
        }
    }

    pub fn with_form_error(mut self, message: impl Into<String>) -> Self {
        self.form_error = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PostFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostFieldErrors {
    pub fn validate(title: Option<&str>, body: Option<&str>) -> Self {
        Self {
            title: validate_title(title),
            body: validate_body(body),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.title.is_some() || self.body.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFields {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoginFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LoginFieldErrors {
    pub fn validate(username: Option<&str>, password: Option<&str>) -> Self {
        Self {
            username: validate_username(username),
            password: validate_password(password),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

/// Login values shown again after a failed attempt. The password is not
/// echoed back.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFields {
    pub login_type: String,
    pub username: String,
}

pub type PostActionData = ActionData<PostFieldErrors, PostFields>;
pub type LoginActionData = ActionData<LoginFieldErrors, LoginFields>;
