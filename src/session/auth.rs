use secrecy::{ExposeSecret, SecretString};

use crate::error::PicasaError;

/// Supplies the OAuth2 bearer token for each request.
///
/// Acquiring and refreshing tokens is left to the implementor.
pub trait TokenSource: Send + Sync {
    /// `Ok(None)` sends the request unauthenticated.
    fn access_token(&self) -> Result<Option<String>, PicasaError>;
}

/// A token issued out of band.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(SecretString::from(token.into()))
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<Option<String>, PicasaError> {
        Ok(Some(self.0.expose_secret().to_owned()))
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([REDACTED])")
    }
}
