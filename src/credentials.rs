//! Credential kinds and per-request authorization resolution.
//!
//! The dispatcher never caches authorization values: every call re-derives the
//! header through [`CredentialsProvider::get_authorization`], which keeps
//! dynamic credential kinds (session-scoped secrets, rotated OAuth tokens)
//! working without client rebuilds.

use crate::errors::{AuthorizationError, Error, Result};

/// Credential kind an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationType {
    PublicKey,
    SecretKey,
    PublicKeyOrOauth,
    SecretKeyOrOauth,
    OAuth,
    /// Session-scoped secrets and other caller-managed header values.
    CustomAuth,
}

impl AuthorizationType {
    fn describe(&self) -> &'static str {
        match self {
            AuthorizationType::PublicKey => "public key",
            AuthorizationType::SecretKey => "secret key",
            AuthorizationType::PublicKeyOrOauth => "public key or OAuth",
            AuthorizationType::SecretKeyOrOauth => "secret key or OAuth",
            AuthorizationType::OAuth => "OAuth",
            AuthorizationType::CustomAuth => "custom",
        }
    }
}

/// A request-ready `Authorization` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    header: String,
}

impl Authorization {
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self {
            header: format!("Bearer {}", token.as_ref()),
        }
    }

    /// Raw header value, used as-is (session secrets are not Bearer-prefixed).
    pub fn raw(value: impl Into<String>) -> Self {
        Self {
            header: value.into(),
        }
    }

    pub fn header_value(&self) -> &str {
        &self.header
    }
}

/// Resolves an [`Authorization`] for a requested credential kind.
///
/// Fails with [`Error::Authorization`] when the kind is unsupported by the
/// current credential set, before any request is constructed.
pub trait CredentialsProvider: Send + Sync {
    fn get_authorization(&self, authorization_type: AuthorizationType) -> Result<Authorization>;
}

fn unsupported(authorization_type: AuthorizationType) -> Error {
    AuthorizationError::new(format!(
        "operation requires {} authorization, which the configured credentials do not provide",
        authorization_type.describe()
    ))
    .into()
}

/// Static secret/public key pair credentials (`sk_*` / `pk_*`, sandbox
/// variants `sk_sbox_*` / `pk_sbox_*`).
#[derive(Debug, Clone)]
pub struct StaticKeysCredentials {
    secret_key: Option<String>,
    public_key: Option<String>,
}

impl StaticKeysCredentials {
    /// Secret-key-only credentials.
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        Self::with_keys(Some(secret_key.into()), None)
    }

    /// Secret + public key credentials.
    pub fn with_keys(secret_key: Option<String>, public_key: Option<String>) -> Result<Self> {
        let secret_key = secret_key.filter(|k| !k.trim().is_empty());
        let public_key = public_key.filter(|k| !k.trim().is_empty());

        if secret_key.is_none() && public_key.is_none() {
            return Err(Error::Configuration(
                "a secret key or public key is required".into(),
            ));
        }
        if let Some(key) = &secret_key {
            if !key.starts_with("sk_") {
                return Err(Error::Configuration(
                    "secret key must start with sk_ or sk_sbox_".into(),
                ));
            }
        }
        if let Some(key) = &public_key {
            if !key.starts_with("pk_") {
                return Err(Error::Configuration(
                    "public key must start with pk_ or pk_sbox_".into(),
                ));
            }
        }

        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Public-key-only credentials, for token endpoints on frontends.
    pub fn public_only(public_key: impl Into<String>) -> Result<Self> {
        Self::with_keys(None, Some(public_key.into()))
    }
}

impl CredentialsProvider for StaticKeysCredentials {
    fn get_authorization(&self, authorization_type: AuthorizationType) -> Result<Authorization> {
        match authorization_type {
            AuthorizationType::SecretKey | AuthorizationType::SecretKeyOrOauth => self
                .secret_key
                .as_deref()
                .map(Authorization::bearer)
                .ok_or_else(|| unsupported(AuthorizationType::SecretKey)),
            AuthorizationType::PublicKey | AuthorizationType::PublicKeyOrOauth => self
                .public_key
                .as_deref()
                .map(Authorization::bearer)
                .ok_or_else(|| unsupported(AuthorizationType::PublicKey)),
            AuthorizationType::OAuth | AuthorizationType::CustomAuth => {
                Err(unsupported(authorization_type))
            }
        }
    }
}

/// Pre-issued OAuth access token credentials.
///
/// Token acquisition and refresh stay outside the SDK; callers wire in a
/// provider of their own when they need rotation.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    access_token: String,
}

impl OAuthCredentials {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::Configuration("access token is required".into()));
        }
        Ok(Self { access_token })
    }
}

impl CredentialsProvider for OAuthCredentials {
    fn get_authorization(&self, authorization_type: AuthorizationType) -> Result<Authorization> {
        match authorization_type {
            AuthorizationType::OAuth
            | AuthorizationType::SecretKeyOrOauth
            | AuthorizationType::PublicKeyOrOauth => Ok(Authorization::bearer(&self.access_token)),
            AuthorizationType::SecretKey
            | AuthorizationType::PublicKey
            | AuthorizationType::CustomAuth => Err(unsupported(authorization_type)),
        }
    }
}

/// Session-secret credentials for customer-scoped payment session calls.
///
/// The secret is sent verbatim, without a Bearer prefix.
#[derive(Debug, Clone)]
pub struct SessionSecretCredentials {
    session_secret: String,
}

impl SessionSecretCredentials {
    pub fn new(session_secret: impl Into<String>) -> Result<Self> {
        let session_secret = session_secret.into();
        if session_secret.trim().is_empty() {
            return Err(Error::Configuration("session secret is required".into()));
        }
        Ok(Self { session_secret })
    }
}

impl CredentialsProvider for SessionSecretCredentials {
    fn get_authorization(&self, authorization_type: AuthorizationType) -> Result<Authorization> {
        match authorization_type {
            AuthorizationType::CustomAuth => Ok(Authorization::raw(&self.session_secret)),
            _ => Err(unsupported(authorization_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_keys_resolve_bearer_secret() {
        let creds = StaticKeysCredentials::new("sk_sbox_m73dzbpy7cf3gfd46xr4yj5xo4e").unwrap();
        let auth = creds.get_authorization(AuthorizationType::SecretKey).unwrap();
        assert_eq!(
            auth.header_value(),
            "Bearer sk_sbox_m73dzbpy7cf3gfd46xr4yj5xo4e"
        );
    }

    #[test]
    fn public_only_client_cannot_resolve_secret_key() {
        let creds = StaticKeysCredentials::public_only("pk_sbox_pkhpdtvabcf7hdgpwnbhw7r2uic").unwrap();
        let err = creds
            .get_authorization(AuthorizationType::SecretKey)
            .unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }

    #[test]
    fn static_keys_reject_oauth_kind() {
        let creds = StaticKeysCredentials::new("sk_m73dzbpy7cf3gfd46xr4yj5xo4e").unwrap();
        assert!(creds.get_authorization(AuthorizationType::OAuth).is_err());
    }

    #[test]
    fn malformed_secret_key_fails_construction() {
        let err = StaticKeysCredentials::new("not-a-key").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn oauth_credentials_cover_either_or_kinds() {
        let creds = OAuthCredentials::new("tok_abc").unwrap();
        let auth = creds
            .get_authorization(AuthorizationType::SecretKeyOrOauth)
            .unwrap();
        assert_eq!(auth.header_value(), "Bearer tok_abc");
        assert!(creds
            .get_authorization(AuthorizationType::SecretKey)
            .is_err());
    }

    #[test]
    fn session_secret_is_sent_verbatim() {
        let creds = SessionSecretCredentials::new("pssn_secret_ok").unwrap();
        let auth = creds
            .get_authorization(AuthorizationType::CustomAuth)
            .unwrap();
        assert_eq!(auth.header_value(), "pssn_secret_ok");
    }
}
