//! HS256 JWT adapter: token issuing and session validation.
//!
//! Implements both `TokenIssuer` and `SessionValidator` over a shared
//! signing secret. Claims carry the account id, email, and guest flag,
//! so validation needs no database round-trip.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};
use crate::domain::user::User;
use crate::ports::{SessionValidator, TokenIssuer};

/// JWT claims for aleator tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject - the account id.
    sub: String,

    /// Account email at issue time.
    email: String,

    /// Whether the account was a guest at issue time.
    #[serde(default)]
    guest: bool,

    /// Expiry timestamp (Unix epoch seconds).
    exp: i64,

    /// Issued at timestamp.
    iat: i64,
}

/// Issues and validates HS256 bearer tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl JwtTokenService {
    /// Creates a token service from the shared signing secret.
    pub fn new(secret: &SecretString, token_ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            token_ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Timestamp::now();
        let claims = Claims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            guest: user.is_guest(),
            exp: now.plus_secs(self.token_ttl.as_secs()).as_datetime().timestamp(),
            iat: now.as_datetime().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ServiceUnavailable(format!("Token signing failed: {}", e)))
    }
}

#[async_trait::async_trait]
impl SessionValidator for JwtTokenService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        let id = data.claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, data.claims.email, data.claims.guest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn service() -> JwtTokenService {
        JwtTokenService::new(
            &SecretString::new("test-signing-secret".to_string()),
            Duration::from_secs(3600),
        )
    }

    fn test_user() -> User {
        User::register(
            UserId::new(),
            "a@example.com".to_string(),
            "hash".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn issued_token_validates_to_same_identity() {
        let svc = service();
        let user = test_user();

        let token = svc.issue(&user).unwrap();
        let validated = svc.validate(&token).await.unwrap();

        assert_eq!(&validated.id, user.id());
        assert_eq!(validated.email, "a@example.com");
        assert!(!validated.is_guest);
    }

    #[tokio::test]
    async fn guest_flag_survives_the_round_trip() {
        let svc = service();
        let guest = User::guest(UserId::new(), "tok".to_string());

        let token = svc.issue(&guest).unwrap();
        let validated = svc.validate(&token).await.unwrap();
        assert!(validated.is_guest);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let result = service().validate("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let other = JwtTokenService::new(
            &SecretString::new("different-secret".to_string()),
            Duration::from_secs(3600),
        );
        let token = other.issue(&test_user()).unwrap();

        let result = service().validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let user = test_user();
        let past = Timestamp::now().minus_secs(7200);
        let claims = Claims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            guest: false,
            exp: past.as_datetime().timestamp(),
            iat: past.as_datetime().timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )
        .unwrap();

        let result = service().validate(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
