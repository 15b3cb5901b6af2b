use crate::aws::cognito::error::CognitoError;
use crate::entity::identity::CallerIdentity;
use crate::errors::{LambdaError, LambdaResult};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info, instrument};

const BEARER_SCHEME: &str = "Bearer";

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub type Claims = Map<String, Value>;

/// How token payloads are trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVerification {
    /// Signature checked against the published JWKS (RS256 only)
    Verified,
    /// INSECURE: payload is read without checking signature or any claim.
    /// Only compiled into tests and builds with `insecure-token-decode`.
    #[cfg(any(test, feature = "insecure-token-decode"))]
    InsecureUnverified,
}

/// Decodes a bearer token into its claims
#[async_trait]
pub trait TokenAuthorizer: Send + Sync {
    async fn decode_claims(&self, token: &str) -> Result<Claims, CognitoError>;
}

pub struct CognitoTokenAuthorizer {
    jwks_url: String,
    issuer: Option<String>,
    verification: TokenVerification,
    jwks_cache: Cache<String, Value>,
}

impl CognitoTokenAuthorizer {
    pub fn new(jwks_url: String, issuer: Option<String>, jwks_cache_ttl: Duration) -> Self {
        CognitoTokenAuthorizer {
            jwks_url,
            issuer,
            verification: TokenVerification::Verified,
            jwks_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(jwks_cache_ttl)
                .build(),
        }
    }

    #[cfg(any(test, feature = "insecure-token-decode"))]
    pub fn with_verification(mut self, verification: TokenVerification) -> Self {
        self.verification = verification;
        self
    }

    async fn get_jwks(&self) -> Result<Value, CognitoError> {
        if let Some(jwks) = self.jwks_cache.get(&self.jwks_url).await {
            info!("Using cached JWKS");
            return Ok(jwks);
        }

        info!("Fetching new JWKS from {}", self.jwks_url);
        let response = HTTP_CLIENT.get(&self.jwks_url).send().await.map_err(|e| {
            error!("Failed to fetch JWKS: {:?}", e);
            CognitoError::ReqwestError(e)
        })?;

        if !response.status().is_success() {
            error!("Failed to fetch JWKS: HTTP {}", response.status());
            return Err(CognitoError::HttpError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: Value = response.json().await.map_err(|e| {
            error!("Failed to parse JWKS JSON: {:?}", e);
            CognitoError::ReqwestError(e)
        })?;

        self.jwks_cache
            .insert(self.jwks_url.clone(), jwks.clone())
            .await;
        Ok(jwks)
    }

    async fn decode_verified(&self, token: &str) -> Result<Claims, CognitoError> {
        let header = decode_header(token).map_err(|e| {
            error!("Failed to decode token header: {:?}", e);
            CognitoError::JwtError(e)
        })?;

        if header.alg != Algorithm::RS256 {
            error!("Rejected token signed with {:?}", header.alg);
            return Err(CognitoError::InvalidTokenError(
                "Unsupported algorithm".to_string(),
            ));
        }

        let kid = header.kid.ok_or_else(|| {
            error!("Token header missing 'kid'");
            CognitoError::InvalidTokenError("Missing kid".to_string())
        })?;

        let jwks = self.get_jwks().await?;
        let decoding_key = find_decoding_key(&jwks, &kid)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            error!("Failed to decode token: {:?}", e);
            CognitoError::JwtError(e)
        })?;

        info!("Token successfully decoded and validated");
        Ok(token_data.claims)
    }

    #[cfg(any(test, feature = "insecure-token-decode"))]
    fn decode_unverified(token: &str) -> Result<Claims, CognitoError> {
        let header = decode_header(token)?;
        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenAuthorizer for CognitoTokenAuthorizer {
    #[instrument(
        skip(self, token),
        fields(jwks_url = %self.jwks_url),
        name = "aws.cognito.token_authorizer.decode_claims"
    )]
    async fn decode_claims(&self, token: &str) -> Result<Claims, CognitoError> {
        match self.verification {
            TokenVerification::Verified => self.decode_verified(token).await,
            #[cfg(any(test, feature = "insecure-token-decode"))]
            TokenVerification::InsecureUnverified => Self::decode_unverified(token),
        }
    }
}

/// Builds the RSA key for `kid` out of a JWKS document
fn find_decoding_key(jwks: &Value, kid: &str) -> Result<DecodingKey, CognitoError> {
    let keys = jwks["keys"].as_array().ok_or_else(|| {
        error!("JWKS does not contain 'keys' array");
        CognitoError::InvalidTokenError("Missing keys".to_string())
    })?;

    let jwk = keys
        .iter()
        .find(|key| key["kid"].as_str() == Some(kid))
        .ok_or_else(|| {
            error!("No matching JWK found for kid: {}", kid);
            CognitoError::InvalidTokenError("Key not found".to_string())
        })?;

    let n = jwk["n"].as_str().ok_or_else(|| {
        error!("JWK missing 'n' parameter");
        CognitoError::InvalidTokenError("Missing n".to_string())
    })?;
    let e = jwk["e"].as_str().ok_or_else(|| {
        error!("JWK missing 'e' parameter");
        CognitoError::InvalidTokenError("Missing e".to_string())
    })?;

    Ok(DecodingKey::from_rsa_components(n, e)?)
}

/// Drops the auth scheme from a header value. The scheme name is matched
/// case-insensitively.
pub fn strip_bearer(header_value: &str) -> &str {
    let trimmed = header_value.trim();
    if trimmed.eq_ignore_ascii_case(BEARER_SCHEME) {
        return "";
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => token.trim(),
        _ => trimmed,
    }
}

/// Decodes `token` and extracts the caller identity from its claims
#[instrument(skip(authorizer, token), name = "aws.cognito.token_authorizer.authenticate")]
pub async fn authenticate<A>(
    authorizer: &A,
    token: &str,
    require_name: bool,
) -> LambdaResult<CallerIdentity>
where
    A: TokenAuthorizer + ?Sized,
{
    let token = strip_bearer(token);
    if token.is_empty() {
        return Err(LambdaError::Authentication("Missing token".to_string()));
    }

    let claims = authorizer.decode_claims(token).await?;
    CallerIdentity::from_claims(&claims, require_name)
}
