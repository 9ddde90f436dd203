use crate::credentials::CredentialStore;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::BlockingError,
    http::{header, StatusCode},
    web, Error, HttpMessage, HttpResponse, ResponseError,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Realm announced in the `WWW-Authenticate` challenge
pub const REALM: &str = "Enter username and password";

/// User name resolved by the Basic-auth gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Why a request was refused by the gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("Authorization header is not Basic")]
    InvalidScheme,
    #[error("malformed Basic credentials")]
    InvalidEncoding,
    #[error("invalid user name or password")]
    InvalidCredentials,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", REALM)))
            .content_type("text/plain; charset=utf-8")
            .body("Authentication required")
    }
}

/// Basic authentication middleware backed by a [`CredentialStore`]
#[derive(Clone)]
pub struct BasicAuthMiddleware {
    credentials: Arc<CredentialStore>,
}

impl BasicAuthMiddleware {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self { credentials }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BasicAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddlewareService {
            service: Rc::new(service),
            credentials: self.credentials.clone(),
        }))
    }
}

pub struct BasicAuthMiddlewareService<S> {
    service: Rc<S>,
    credentials: Arc<CredentialStore>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let credentials = self.credentials.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            match authenticate_blocking(credentials, header).await? {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), reason = %e, "basic authentication failed");
                    let response = e.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Run [`authenticate`] on the blocking thread pool.
///
/// Argon2 verification takes tens of milliseconds; running it inline would
/// stall every connection served by the same worker.
pub async fn authenticate_blocking(
    credentials: Arc<CredentialStore>,
    header_value: Option<String>,
) -> Result<Result<AuthenticatedUser, AuthError>, BlockingError> {
    web::block(move || authenticate(&credentials, header_value.as_deref())).await
}

/// Resolve the user named in a `Basic` Authorization header value.
pub fn authenticate(
    credentials: &CredentialStore,
    header_value: Option<&str>,
) -> Result<AuthenticatedUser, AuthError> {
    let value = header_value.ok_or(AuthError::MissingHeader)?;
    let encoded = value
        .strip_prefix("Basic ")
        .ok_or(AuthError::InvalidScheme)?
        .trim();

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

    let (user, password) = decoded.split_once(':').ok_or(AuthError::InvalidEncoding)?;

    if credentials.verify(user, password) {
        Ok(AuthenticatedUser(user.to_string()))
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

impl actix_web::FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AuthError::MissingHeader.into())),
        }
    }
}
