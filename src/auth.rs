use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation};
use secrecy::{ExposeSecret as _, SecretString};

use crate::prelude::*;

/// How long the login service keeps a token valid.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct TokenUser {
    pub id: String,
}

/// The payload of a bearer token: `{ "user": { "id": ... }, "exp": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Claims {
    pub user: TokenUser,
    pub exp: i64,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("request carries no bearer token"))]
    MissingToken {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to decode JWT token: {source}"))]
    Decode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("token names a malformed user id `{id}`"))]
    InvalidSubject { id: String },
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    msg: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            AuthError::MissingToken { .. } => {
                (StatusCode::UNAUTHORIZED, "No token, authorization denied")
            }
            AuthError::Decode { .. } | AuthError::InvalidSubject { .. } => {
                (StatusCode::UNAUTHORIZED, "Token is not valid")
            }
        };

        tracing::debug!(error = %self, "request rejected");
        (status, Json(AuthResponse { msg })).into_response()
    }
}

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Verifies HS256 bearer tokens. Issuing them is left to whoever shares the secret.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: SecretString,
    validation: Validation,
}

impl Authenticator {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            validation: Validation::new(ALGORITHM),
        }
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    pub fn decode(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        jsonwebtoken::decode(token, &self.decoding_key(), &self.validation).context(DecodeSnafu)
    }

    /// Reads the `Authorization: Bearer <token>` header and returns the user the token was issued for.
    pub fn identify(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .context(MissingTokenSnafu)?;

        let TokenData { claims, .. } = self.decode(token)?;
        let user = Record::parse_key(&claims.user.id).context(InvalidSubjectSnafu {
            id: &claims.user.id,
        })?;

        Ok(Identity { user })
    }
}

/// The authenticated caller of a request.
///
/// Handlers that take an `Identity` reject unauthenticated requests with `401` before they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: Record<User>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Authenticator::from_ref(state).identify(&parts.headers)
    }
}

/// Token signing for tests, which play the part of the login service.
#[cfg(test)]
impl Authenticator {
    pub(crate) fn encode(&self, claims: &Claims) -> String {
        let key = jsonwebtoken::EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        jsonwebtoken::encode(&jsonwebtoken::Header::new(ALGORITHM), claims, &key)
            .expect("HS256 signing never fails")
    }

    pub(crate) fn expiration(&self) -> i64 {
        (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp()
    }

    /// Signs a token for `user`, valid for [TOKEN_LIFETIME_DAYS].
    pub(crate) fn issue(&self, user: &Record<User>) -> String {
        self.encode(&Claims::new(TokenUser::new(user.key()), self.expiration()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn authenticator(secret: &str) -> Authenticator {
        Authenticator::new(SecretString::new(secret.to_string()))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();
        headers.insert(header::AUTHORIZATION, value);
        headers
    }

    #[test]
    fn issued_tokens_identify_their_user() {
        let auth = authenticator("youtube_clone_secret_key");
        let user = Record::<User>::new("mahesh".to_string());

        let token = auth.issue(&user);
        let identity = auth.identify(&bearer(&token)).unwrap();

        assert_eq!(identity.user, user);
    }

    #[test]
    fn missing_or_malformed_header_is_missing_token() {
        let auth = authenticator("secret");

        let error = auth.identify(&HeaderMap::new()).unwrap_err();
        assert!(matches!(error, AuthError::MissingToken { .. }));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let error = auth.identify(&headers).unwrap_err();
        assert!(matches!(error, AuthError::MissingToken { .. }));
    }

    #[test]
    fn foreign_signatures_are_rejected() {
        let user = Record::<User>::new("mahesh".to_string());
        let token = authenticator("someone else").issue(&user);

        let error = authenticator("secret").identify(&bearer(&token)).unwrap_err();
        assert!(matches!(error, AuthError::Decode { .. }));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = authenticator("secret");
        let expired = (chrono::Utc::now() - chrono::Duration::days(1)).timestamp();
        let token = auth
            .encode(&Claims::new(TokenUser::new("mahesh".to_string()), expired));

        let error = auth.identify(&bearer(&token)).unwrap_err();
        assert!(matches!(error, AuthError::Decode { .. }));
    }

    #[test]
    fn malformed_user_ids_are_rejected() {
        let auth = authenticator("secret");
        let token = auth
            .encode(&Claims::new(
                TokenUser::new("users:mahesh".to_string()),
                auth.expiration(),
            ));

        let error = auth.identify(&bearer(&token)).unwrap_err();
        assert!(matches!(error, AuthError::InvalidSubject { .. }));
    }

    #[test]
    fn every_rejection_is_unauthorized() {
        let auth = authenticator("secret");
        let rejections = [
            auth.identify(&HeaderMap::new()).unwrap_err(),
            auth.identify(&bearer("not.a.jwt")).unwrap_err(),
            auth.identify(&bearer(&auth.encode(&Claims::new(
                TokenUser::new("a b".to_string()),
                auth.expiration(),
            ))))
            .unwrap_err(),
        ];

        for rejection in rejections {
            assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn rejections_use_the_public_messages() {
        let response = MissingTokenSnafu.build().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = InvalidSubjectSnafu { id: "x" }.build().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
