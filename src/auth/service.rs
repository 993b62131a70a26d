use log::{debug, info};
use std::sync::Arc;

use super::password::PasswordHasher;
use super::token::TokenService;
use crate::error::AppError;
use crate::models::{NewUser, Role, User};
use crate::store::UserStore;

/// Registration, login and token-to-user resolution.
///
/// These are the only entry points that see plaintext passwords; they are
/// hashed or verified and then dropped.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates a `USER` account and returns a token for it.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, AppError> {
        if self.users.find_user_by_email(email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AppError::DuplicateEmail(email.to_string()));
        }

        let user = self
            .users
            .create_user(NewUser {
                email: email.to_string(),
                password_hash: self.hasher.hash(password)?,
                role: Role::User,
            })
            .await?;
        info!("Registered user {}", user.id);

        self.tokens.issue(&user)
    }

    /// Returns a token if `email` exists and `password` matches its stored hash.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let verified = match self.users.find_user_by_email(email).await? {
            Some(user) if self.hasher.verify(password, &user.password_hash) => Some(user),
            Some(_) => None,
            None => {
                self.hasher.verify_dummy(password);
                None
            }
        };

        match verified {
            Some(user) => {
                debug!("User {} logged in", user.id);
                self.tokens.issue(&user)
            }
            None => Err(AppError::InvalidCredentials),
        }
    }

    /// Validates `token` and loads the user it names.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.validate(token)?;
        self.users
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".into()))
    }

}

/// Grants the `ADMIN` role to the user registered under `email`.
///
/// Needs only a user store, so the admin command can run without token or
/// hashing configuration.
pub async fn promote_to_admin(users: &dyn UserStore, email: &str) -> Result<User, AppError> {
    let user = users
        .set_role(email, Role::Admin)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user registered with {}", email)))?;
    info!("User {} promoted to admin", user.id);
    Ok(user)
}
