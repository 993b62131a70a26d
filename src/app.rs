//! Shared application state and the pieces `main` and the tests assemble an
//! `App` from.

use actix_cors::Cors;
use actix_web::{error, http::header, web, HttpRequest};
use chrono::Duration;
use std::sync::Arc;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;

/// Services available to every handler through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let lifetime = Duration::try_hours(config.jwt_expiration_hours).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Token lifetime of {} hours is out of range",
                config.jwt_expiration_hours
            ))
        })?;
        let tokens = TokenService::new(&config.jwt_secret, lifetime);
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;

        Ok(Self {
            auth: AuthService::new(users, hasher, tokens),
            tasks: TaskService::new(tasks),
        })
    }

    /// Builds the state from one store that holds both users and tasks.
    pub fn with_store<S>(store: S, config: &Config) -> Result<Self, AppError>
    where
        S: UserStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store, config)
    }
}

/// CORS policy: the configured origins, or any origin when none are configured.
pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if config.cors_allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    config
        .cors_allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Malformed JSON bodies become a 400 with the usual error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// A task id that is not a UUID cannot name an owned task.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err: error::PathError, _req: &HttpRequest| {
        AppError::NotFound("Task not found".into()).into()
    })
}
