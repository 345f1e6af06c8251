//! Credential checks for inbound requests.
//!
//! Requests carry HTTP Basic credentials. The gate decodes them and asks a
//! [`CredentialGate`] whether they are valid; everything past the gate only
//! sees the resulting [`Principal`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Username/secret pair taken from a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or not a Basic one
    #[error("Not authenticated")]
    MissingCredentials,

    /// Basic credentials that could not be decoded
    #[error("Invalid authentication credentials")]
    Malformed,

    /// Well-formed credentials that don't match
    #[error("Incorrect username or password")]
    Rejected,
}

/// Verifies credentials and names the caller.
pub trait CredentialGate: Send + Sync {
    fn verify(&self, credentials: &Credentials) -> Result<Principal, AuthError>;
}

/// Accepts a single configured username/secret pair.
pub struct StaticCredentials {
    username: String,
    secret: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl CredentialGate for StaticCredentials {
    fn verify(&self, credentials: &Credentials) -> Result<Principal, AuthError> {
        // Evaluate both so a wrong username takes as long as a wrong secret.
        let user_ok = constant_time_eq(credentials.username.as_bytes(), self.username.as_bytes());
        let secret_ok = constant_time_eq(credentials.secret.as_bytes(), self.secret.as_bytes());
        if user_ok & secret_ok {
            Ok(Principal {
                username: credentials.username.clone(),
            })
        } else {
            Err(AuthError::Rejected)
        }
    }
}

/// Parse the value of an `Authorization` header as Basic credentials.
///
/// The scheme name is case-insensitive. The secret may contain colons; only
/// the first colon separates it from the username.
pub fn parse_basic(header: &str) -> Result<Credentials, AuthError> {
    let header = header.trim();
    let (scheme, encoded) = header
        .split_once(' ')
        .ok_or(AuthError::MissingCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MissingCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Malformed)?;
    let (username, secret) = decoded.split_once(':').ok_or(AuthError::Malformed)?;

    Ok(Credentials {
        username: username.to_string(),
        secret: secret.to_string(),
    })
}

/// Compare two byte strings without exiting early on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
