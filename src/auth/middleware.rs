use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::Identity;
use crate::auth::token::verify_token;
use crate::config::AuthMode;
use crate::error::AppError;

/// Bearer-token gate for the `/api` scope.
///
/// In the `Required` profile every task route demands a valid token; a
/// verified request gets its `Identity` inserted into request extensions
/// for the handlers' extractor. In the `Open` profile all routes pass
/// through with the anonymous identity.
pub struct AuthMiddleware {
    mode: AuthMode,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
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
            service,
            mode: self.mode,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    mode: AuthMode,
}

fn is_public(path: &str) -> bool {
    path == "/api/health" || path == "/api/register" || path == "/api/login"
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.mode == AuthMode::Open {
            req.extensions_mut().insert(Identity::Anonymous);
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match bearer {
            Some(token) => match verify_token(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(Identity::User {
                        id: claims.sub,
                        username: claims.username,
                    });
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                // Malformed, badly signed, or expired: 403.
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            // No token at all: 401.
            None => {
                let app_err = AppError::Unauthenticated("Access token required".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
