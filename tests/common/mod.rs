//! Shared helpers for the integration tests.
//!
//! Apps are assembled the same way `main` assembles them, but on top of a
//! `MemoryStore` so no database is needed.

#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test, web, App,
};
use serde_json::json;
use todolist_api::{
    app::{cors, AppState},
    auth::{AuthMiddleware, AuthResponse},
    routes,
    store::MemoryStore,
    Config,
};

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".into()),
        "JWT_SECRET" => Some("integration-test-secret".into()),
        "BCRYPT_COST" => Some("4".into()),
        _ => None,
    })
    .expect("test config is valid")
}

pub fn memory_state() -> AppState {
    AppState::with_store(MemoryStore::new(), &test_config()).expect("state builds")
}

/// Builds the full app around `state`.
pub async fn init_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let config = test_config();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(AuthMiddleware)
            .wrap(cors(&config))
            .configure(routes::config),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers `email` and returns the issued token, panicking with the response
/// body if registration fails.
pub async fn register<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Failed to register {}. Status: {}. Body: {}",
        email,
        status,
        String::from_utf8_lossy(&body)
    );

    let auth: AuthResponse = serde_json::from_slice(&body).expect("auth response JSON");
    auth.token
}
