use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The caller identity resolved by `AuthMiddleware`.
///
/// `User` carries the id and username embedded in a verified bearer token.
/// `Anonymous` is injected in the open profile, where task routes are
/// public and tasks carry no owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User { id: i64, username: String },
    Anonymous,
}

impl Identity {
    /// The owner scope for store operations: `None` means no ownership
    /// filter is applied.
    pub fn owner_id(&self) -> Option<i64> {
        match self {
            Identity::User { id, .. } => Some(*id),
            Identity::Anonymous => None,
        }
    }
}

impl FromRequest for Identity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>().cloned() {
            Some(identity) => ready(Ok(identity)),
            // Only reachable if a protected handler is mounted outside
            // AuthMiddleware; refusing the request is the safe default.
            None => {
                let err = AppError::Unauthenticated("Access token required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_identity_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(Identity::User {
            id: 123,
            username: "alice".to_string(),
        });

        let mut payload = Payload::None;
        let identity = Identity::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(identity.owner_id(), Some(123));
    }

    #[actix_rt::test]
    async fn test_identity_extractor_missing() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = Identity::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[std::prelude::v1::test]
    fn test_anonymous_has_no_owner() {
        assert_eq!(Identity::Anonymous.owner_id(), None);
    }
}
