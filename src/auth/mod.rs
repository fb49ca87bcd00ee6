pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use crate::models::User;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::Identity;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    // Username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Payload for a user login request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Must be present. No strength policy is applied on login.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    /// 1 to 64 characters, alphanumeric plus underscores and hyphens.
    #[validate(
        length(min = 1, max = 64, message = "Username is required"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Must be present. No strength policy is applied.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response after successful registration or login: the signed token plus
/// the public user fields. The password hash is never part of this.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
