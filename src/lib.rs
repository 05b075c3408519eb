//! remixblog - a small server-rendered blog
//!
//! Posts are created through a validated form; authors log in with a
//! username and password and are remembered by a signed session cookie.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod posts;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::Error;
