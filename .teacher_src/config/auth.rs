//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Zitadel OIDC)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Zitadel authority URL
    pub zitadel_authority: String,

    /// OAuth2 client ID
    pub zitadel_client_id: String,

    /// Expected audience for tokens
    pub zitadel_audience: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the authority URL.
    /// In development, allows localhost with HTTP/HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.zitadel_authority.is_empty() {
            return Err(ValidationError::MissingRequired("ZITADEL_AUTHORITY"));
        }
        if self.zitadel_client_id.is_empty() {
            return Err(ValidationError::MissingRequired("ZITADEL_CLIENT_ID"));
        }
        if self.zitadel_audience.is_empty() {
            return Err(ValidationError::MissingRequired("ZITADEL_AUDIENCE"));
        }

        // In production, require HTTPS
        if *environment == Environment::Production && !self.zitadel_authority.starts_with("https://") {
            return Err(ValidationError::AuthorityMustBeHttps);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            zitadel_authority: String::new(),
            zitadel_client_id: String::new(),
            zitadel_audience: String::new(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
