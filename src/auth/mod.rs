pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use service::{promote_to_admin, AuthService};
pub use token::{Claims, TokenError, TokenService};

/// Request body for both `/auth/register` and `/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Must not be empty.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response structure after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT to send back as `Authorization: Bearer <token>`.
    pub token: String,
}
