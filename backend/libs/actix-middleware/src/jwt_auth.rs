//! Bearer-token authentication
//!
//! `authenticate` is the single place where a request's credentials are
//! turned into a [`UserId`]. The [`JwtAuth`] middleware applies it per
//! resource, either rejecting unauthenticated requests before the handler
//! runs (`required`) or letting them through anonymously (`optional`).
//!
//! The `JwtService` is looked up from app data (`web::Data<JwtService>`),
//! so it must be registered on the `App` before any guarded resource.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{HeaderMap, AUTHORIZATION},
        StatusCode,
    },
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use crypto_core::jwt::{JwtService, TokenError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use thiserror::Error;
use uuid::Uuid;

/// Authenticated caller, inserted into request extensions by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Caller when authentication is optional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUserId(pub Option<Uuid>);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header missing")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Authentication is not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Token failure details stay in the logs
        let message = match self {
            AuthError::NotConfigured => "Internal server error",
            _ => "Unauthorized",
        };
        HttpResponse::build(status).json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }))
    }
}

const BEARER_SCHEME: &str = "bearer";

/// Pull the token out of an `Authorization` header value
///
/// Both `Bearer <token>` and a bare token are accepted.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let value = header_value.trim_start();
    let token = match value.get(..BEARER_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = &value[BEARER_SCHEME.len()..];
            // "Bearerabc" is a raw token, not the scheme
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                value
            } else {
                rest
            }
        }
        _ => value,
    };
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller from request headers
pub fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<UserId, AuthError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .ok_or(AuthError::MissingToken)?;

    let user_id = jwt.verify_user_id(token)?;
    Ok(UserId(user_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Reject the request with 401 when no valid token is present
    Required,
    /// Attach the caller when a valid token is present, continue otherwise
    Optional,
}

/// JWT Authentication Middleware
#[derive(Debug, Clone, Copy)]
pub struct JwtAuth {
    mode: AuthMode,
}

impl JwtAuth {
    pub fn required() -> Self {
        Self {
            mode: AuthMode::Required,
        }
    }

    pub fn optional() -> Self {
        Self {
            mode: AuthMode::Optional,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = JwtAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;

        let outcome = match req.app_data::<web::Data<JwtService>>() {
            Some(jwt) => authenticate(req.headers(), jwt.get_ref()),
            None => {
                tracing::error!("JwtService missing from app data");
                Err(AuthError::NotConfigured)
            }
        };

        Box::pin(async move {
            match (outcome, mode) {
                (Ok(user_id), _) => {
                    req.extensions_mut().insert(user_id);
                }
                (Err(err @ AuthError::NotConfigured), _) | (Err(err), AuthMode::Required) => {
                    tracing::debug!(path = %req.path(), error = %err, "Rejected request");
                    let response = err.error_response();
                    return Ok(req.into_response(response.map_into_boxed_body()));
                }
                (Err(err), AuthMode::Optional) => {
                    tracing::debug!(path = %req.path(), error = %err, "Continuing anonymously");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

impl FromRequest for UserId {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(AuthError::MissingToken)),
        }
    }
}

impl FromRequest for MaybeUserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req.extensions().get::<UserId>().map(|u| u.0);
        ready(Ok(MaybeUserId(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    const SECRET: &str = "middleware-test-secret-0123456789abcdef";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token_forms() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
    }

    #[test]
    fn test_bare_scheme_is_missing_token() {
        assert_eq!(extract_token("Bearer"), None);
        assert_eq!(extract_token("  BEARER \t "), None);

        let jwt = JwtService::new(SECRET).unwrap();
        let err = authenticate(&headers_with("Bearer "), &jwt).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[test]
    fn test_authenticate_bearer_and_raw() {
        let jwt = JwtService::new(SECRET).unwrap();
        let user = Uuid::new_v4();
        let token = jwt.issue(user).unwrap();

        let bearer = authenticate(&headers_with(&format!("Bearer {}", token)), &jwt).unwrap();
        let raw = authenticate(&headers_with(&token), &jwt).unwrap();

        assert_eq!(bearer, UserId(user));
        assert_eq!(raw, UserId(user));
    }

    #[test]
    fn test_authenticate_missing_header() {
        let jwt = JwtService::new(SECRET).unwrap();
        let err = authenticate(&HeaderMap::new(), &jwt).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authenticate_foreign_token() {
        let jwt = JwtService::new(SECRET).unwrap();
        let foreign = JwtService::new("another-secret-for-another-deployment")
            .unwrap()
            .issue(Uuid::new_v4())
            .unwrap();

        let err = authenticate(&headers_with(&foreign), &jwt).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken(TokenError::InvalidSignature)
        ));
    }
}
