use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::{ClaimSet, Claims};
use crate::auth::error::AuthError;
use crate::config::JwtConfig;

/// Scheme label prefixed onto issued tokens so the response value drops
/// straight into an Authorization header.
pub const SCHEME: &str = "Bearer";

/// Immutable signing configuration, built once at startup and shared by
/// reference. Safe for concurrent reads.
#[derive(Clone)]
pub struct SigningContext {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SigningContext {
    pub fn from_config(cfg: &JwtConfig) -> anyhow::Result<Self> {
        // HS256 with a weak key is worse than failing to start.
        anyhow::ensure!(
            cfg.secret.as_bytes().len() >= 16,
            "JWT_SECRET must be at least 16 bytes"
        );
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes),
            refresh_ttl: Duration::days(cfg.refresh_ttl_days),
        })
    }

    pub fn access_expiration(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + self.access_ttl
    }

    pub fn refresh_expiration(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + self.refresh_ttl
    }

    /// Encodes the identity claims into a signed token valid from now until
    /// `not_after`. Pure apart from the clock read.
    pub fn issue(&self, identity: &ClaimSet, not_after: OffsetDateTime) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            nbf: now.unix_timestamp() as usize,
            exp: not_after.unix_timestamp() as usize,
            identity: identity.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %identity.id, "access token issued");
        Ok(token)
    }

    /// Verifies the signature and returns the payload. With `verify_expiry`
    /// the issuer, audience and expiry are checked with zero leeway; without
    /// it only the signature is checked, so the rotation flow can read
    /// claims out of an access token that has already expired. All failures
    /// collapse into `InvalidToken`.
    pub fn decode(&self, token: &str, verify_expiry: bool) -> Result<Claims, AuthError> {
        let raw = token
            .strip_prefix(SCHEME)
            .map(|rest| rest.trim_start())
            .unwrap_or(token);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if verify_expiry {
            validation.set_issuer(std::slice::from_ref(&self.issuer));
            validation.set_audience(std::slice::from_ref(&self.audience));
        } else {
            validation.validate_exp = false;
            validation.validate_aud = false;
            validation.required_spec_claims.clear();
        }

        let data =
            decode::<Claims>(raw, &self.decoding, &validation).map_err(|_| AuthError::InvalidToken)?;
        debug!(user_id = %data.claims.identity.id, verify_expiry, "access token decoded");
        Ok(data.claims)
    }
}
