use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, warn};
use std::rc::Rc;

use super::extractors::AuthenticatedUser;
use crate::app::AppState;

/// Resolves the bearer token on each request into an `AuthenticatedUser`.
///
/// Never rejects a request itself: a missing or invalid token just leaves the
/// request unauthenticated, and the `AuthenticatedUser` extractor turns that
/// into a 401 on routes that need a user.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

/// Registration, login and the health check never carry a token.
pub fn is_public_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/auth/")
}

/// The credentials of an `Authorization: Bearer <token>` header. The scheme
/// name is matched case-insensitively.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_path(req.path()) {
                return service.call(req).await;
            }

            let Some(token) = bearer_token(&req) else {
                return service.call(req).await;
            };

            match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => match state.auth.authenticate(&token).await {
                    Ok(user) => {
                        req.extensions_mut().insert(AuthenticatedUser(user));
                    }
                    Err(err) => debug!("Request to {} left unauthenticated: {}", req.path(), err),
                },
                None => warn!("AppState missing; cannot authenticate {}", req.path()),
            }

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/auth/register"));
        assert!(!is_public_path("/tasks"));
        assert!(!is_public_path("/tasks/3"));
        assert!(!is_public_path("/authx"));
    }

    fn bearer_of(value: &str) -> Option<String> {
        let req = test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_srv_request();
        bearer_token(&req)
    }

    #[::core::prelude::v1::test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_of("Bearer abc.def"), Some("abc.def".into()));
        assert_eq!(bearer_of("bearer abc.def"), Some("abc.def".into()));
        assert_eq!(bearer_of("BEARER  abc.def "), Some("abc.def".into()));
        assert_eq!(bearer_of("Basic YTpi"), None);
        assert_eq!(bearer_of("Bearer"), None);
        assert_eq!(bearer_of("Bearer   "), None);
    }
}
