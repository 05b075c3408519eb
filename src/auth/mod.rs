//! Authentication and session management

pub mod credentials;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use credentials::CredentialService;
pub use middleware::{AuthState, CurrentUser, RequireUser, LOGIN_PATH};
pub use models::{LoginForm, LoginType, NewUser, User, UserInfo};
pub use password::{BcryptHasher, PasswordHasher};
pub use session::{extract_cookie, SameSite, Session, SessionConfig, SessionManager};
