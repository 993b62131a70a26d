use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app::AppState,
    auth::{AuthResponse, Credentials},
    error::AppError,
};

/// Register a new user
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}` for the new account.
/// - `400 Bad Request`: Malformed body, invalid email or empty password.
/// - `409 Conflict`: The email is already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let token = state.auth.register(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`.
/// - `400 Bad Request`: Malformed body or invalid email format.
/// - `401 Unauthorized`: Unknown email or wrong password; the two are not distinguished.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
