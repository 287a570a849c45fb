use actix_web::cookie::{time, Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    session::claims::SessionClaims,
};

/// Issues and verifies the signed tokens that bind a client to its quiz
/// session. A token that fails verification is as good as no token.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
    cookie_name: String,
}

impl SessionTokenService {
    pub fn new(secret: &SecretString, expiration_hours: i64, cookie_name: &str) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            expiration_hours,
            cookie_name: cookie_name.to_string(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn issue(&self) -> AppResult<(String, SessionClaims)> {
        let claims = SessionClaims::new(self.expiration_hours);

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::InternalError(format!("Failed to create session token: {}", e))
        })?;

        Ok((token, claims))
    }

    pub fn validate(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(self.cookie_name.clone(), token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::hours(self.expiration_hours))
            .finish()
    }

    /// Keeps the presented session, or mints a new one together with the
    /// cookie that hands it to the client.
    pub fn resolve_or_issue(
        &self,
        current: Option<SessionClaims>,
    ) -> AppResult<(SessionClaims, Option<Cookie<'static>>)> {
        match current {
            Some(claims) => Ok((claims, None)),
            None => {
                let (token, claims) = self.issue()?;
                log::debug!("Issued new quiz session {}", claims.sid);
                Ok((claims, Some(self.cookie(token))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service() -> SessionTokenService {
        let config = Config::test_config();
        SessionTokenService::new(&config.session_secret, 1, &config.session_cookie_name)
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();
        let (token, claims) = tokens.issue().unwrap();

        assert!(!token.is_empty());
        assert_eq!(tokens.validate(&token).unwrap(), claims);
    }

    #[test]
    fn test_invalid_token() {
        let result = service().validate("invalid.token.here");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = SessionTokenService::new(
            &SecretString::from("a_completely_different_secret".to_string()),
            1,
            "quiz_session",
        );
        let (token, _) = other.issue().unwrap();

        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = service().cookie("token-value".to_string());

        assert_eq!(cookie.name(), "quiz_session");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_resolve_or_issue() {
        let tokens = service();

        let (claims, cookie) = tokens.resolve_or_issue(None).unwrap();
        let cookie = cookie.expect("a new session sets a cookie");
        assert_eq!(tokens.validate(cookie.value()).unwrap().sid, claims.sid);

        let (kept, cookie) = tokens.resolve_or_issue(Some(claims.clone())).unwrap();
        assert_eq!(kept, claims);
        assert!(cookie.is_none());
    }
}
