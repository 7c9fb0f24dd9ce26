use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};

use crate::auth::{AuthUser, TokenVerifier};
use crate::error::ErrorResponse;

/// Rejection produced by the [`AuthUser`] extractor. Always a 401 with a
/// JSON body naming what was wrong with the credentials.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: &str) -> Self {
        AuthError {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(ErrorResponse {
            error: self.message.clone(),
        })
    }
}

impl FromRequest for AuthUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let verifier = match req.app_data::<web::Data<TokenVerifier>>() {
            Some(verifier) => verifier,
            None => return ready(Err(AuthError::new("Internal configuration error"))),
        };

        let header = match req.headers().get(header::AUTHORIZATION) {
            Some(value) => value,
            None => return ready(Err(AuthError::new("Missing Authorization header"))),
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty());

        let token = match token {
            Some(token) => token,
            None => return ready(Err(AuthError::new("Invalid Authorization header format"))),
        };

        match verifier.verify(token) {
            Ok(user) => ready(Ok(user)),
            Err(reason) => {
                tracing::debug!("Rejected bearer token: {}", reason);
                ready(Err(AuthError::new("Invalid token")))
            }
        }
    }
}
