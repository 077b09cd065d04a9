//! Token issuance and parsing for access/refresh token pairs.
//!
//! Each token carries a unique `jti`; the refresh jti is the handle that
//! binds the token to a session record.

use anyhow::bail;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";
const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // user_id
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String, // user_id
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub token_type: String,
}

impl RefreshClaims {
    pub fn user_id(&self) -> anyhow::Result<Uuid> {
        Ok(Uuid::parse_str(&self.sub)?)
    }

    /// Expiry as a timestamp, used to bound denylist retention.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly minted token pair together with the refresh token's jti.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub refresh_jti: String,
}

/// Mints and parses signed token pairs. Holds its configuration
/// explicitly instead of reading process-wide state.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn issue_pair(&self, user_id: Uuid) -> anyhow::Result<TokenPair> {
        let now = Utc::now();
        let refresh_jti = Uuid::new_v4().to_string();

        let access_claims = AccessClaims {
            sub: user_id.to_string(),
            exp: (now + Duration::minutes(self.config.access_token_ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        let refresh_claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: (now + Duration::days(self.config.refresh_token_ttl_days)).timestamp(),
            iat: now.timestamp(),
            jti: refresh_jti.clone(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret.as_ref());
        let access = encode(&Header::default(), &access_claims, &key)?;
        let refresh = encode(&Header::default(), &refresh_claims, &key)?;

        Ok(TokenPair {
            access,
            refresh,
            refresh_jti,
        })
    }

    pub fn decode_access(&self, token: &str) -> anyhow::Result<AccessClaims> {
        let claims = self.decode::<AccessClaims>(token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            bail!("not an access token");
        }
        Ok(claims)
    }

    pub fn decode_refresh(&self, token: &str) -> anyhow::Result<RefreshClaims> {
        let claims = self.decode::<RefreshClaims>(token)?;
        if claims.token_type != REFRESH_TOKEN_TYPE {
            bail!("not a refresh token");
        }
        Ok(claims)
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, token: &str) -> anyhow::Result<T> {
        let validation = Validation::default();
        let data = decode::<T>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
