//! Site login credentials.

use std::fmt;

/// Username/password pair for the community site.
///
/// Read once from configuration and never mutated. The `Debug`
/// implementation redacts the password so the pair can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password. Callers must not log this.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
