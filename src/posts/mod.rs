//! Blog posts and form validation

pub mod models;
pub mod validation;

pub use models::{NewPost, Post, PostActionForm, PostForm};
pub use validation::{
    validate_body, validate_password, validate_title, validate_username, ActionData,
    LoginActionData, LoginFieldErrors, LoginFields, PostActionData, PostFieldErrors, PostFields,
};
