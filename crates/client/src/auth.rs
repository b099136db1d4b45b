//! Basic authentication credentials.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Username and password sent as HTTP basic authentication on every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Attach these credentials to a request.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

/// Attach optional credentials to a request.
pub(crate) fn authorize(builder: RequestBuilder, credentials: Option<&Credentials>) -> RequestBuilder {
    match credentials {
        Some(credentials) => credentials.apply(builder),
        None => builder,
    }
}
