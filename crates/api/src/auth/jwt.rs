//! JWT access-token validation (and minting, for local development and tests).
//!
//! Tokens are HS256-signed by the identity provider with a secret shared with
//! this service. The subject is the user's UUID; the audience is fixed per
//! deployment (`authenticated` by default).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use promptcubic_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Claims carried by an identity-provider access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// Primary email, when the provider includes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Provider role, e.g. `"authenticated"`.
    #[serde(default)]
    pub role: String,
    /// Audience the token was issued for.
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
    /// Allowed clock skew when checking `exp`, in seconds.
    pub leeway_secs: u64,
}

/// Default expected audience.
const DEFAULT_AUDIENCE: &str = "authenticated";
/// Role claim of a signed-in user.
pub const AUTHENTICATED_ROLE: &str = "authenticated";
/// Role claim of the provider's public key. It identifies the app, not a user.
pub const ANON_ROLE: &str = "anon";
/// Default clock-skew leeway in seconds.
const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default         |
    /// |-------------------|----------|-----------------|
    /// | `JWT_SECRET`      | **yes**  | --              |
    /// | `JWT_AUDIENCE`    | no       | `authenticated` |
    /// | `JWT_LEEWAY_SECS` | no       | `30`            |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());

        let leeway_secs: u64 = std::env::var("JWT_LEEWAY_SECS")
            .unwrap_or_else(|_| DEFAULT_LEEWAY_SECS.to_string())
            .parse()
            .expect("JWT_LEEWAY_SECS must be a valid u64");

        Self {
            secret,
            audience,
            leeway_secs,
        }
    }

    /// Config with the default audience and leeway for the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            audience: DEFAULT_AUDIENCE.to_string(),
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration (with leeway), and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);
    validation.leeway = config.leeway_secs;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Mint an HS256 token the way the identity provider does.
///
/// Production tokens always come from the provider; this exists for local
/// development against a self-hosted secret and for tests.
pub fn generate_access_token(
    user_id: DbId,
    email: Option<&str>,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        role: AUTHENTICATED_ROLE.to_string(),
        aud: config.audience.clone(),
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
