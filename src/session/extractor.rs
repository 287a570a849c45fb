use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::{
    app_state::AppState,
    errors::AppError,
    session::{claims::SessionClaims, token::SessionTokenService},
};

/// The verified session presented with a request, if any.
///
/// The session cookie is tried first, then an `Authorization: Bearer` header
/// for non-browser clients. A token that fails verification is skipped, so
/// when nothing valid is presented the result is `CurrentSession(None)`.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionClaims>);

impl CurrentSession {
    pub fn from_request_parts(req: &HttpRequest, tokens: &SessionTokenService) -> Self {
        let cookie = req
            .cookie(tokens.cookie_name())
            .map(|cookie| cookie.value().to_string());
        let bearer = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);

        let claims = cookie
            .into_iter()
            .chain(bearer)
            .find_map(|token| match tokens.validate(&token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    log::debug!("Ignoring session token: {}", e);
                    None
                }
            });

        CurrentSession(claims)
    }

    pub fn sid(&self) -> Option<&str> {
        self.0.as_ref().map(|claims| claims.sid.as_str())
    }
}

impl FromRequest for CurrentSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req
            .app_data::<web::Data<AppState>>()
            .map(|state| Self::from_request_parts(req, &state.session_tokens))
            .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()));

        ready(session)
    }
}
