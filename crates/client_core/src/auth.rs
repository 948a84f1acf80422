//! Session credential supplied by the host environment.

use std::fmt;

/// Opaque, non-empty authorization token for one session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn authorization_header(&self) -> String {
        format!("tma {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes redacted>)", self.0.len())
    }
}

/// Read once at session start. A provider never refreshes or polls.
pub trait AuthTokenProvider: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// Credential handed over directly by the host (e.g. a command-line flag).
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<Credential>);

impl StaticCredential {
    pub fn new(raw: Option<String>) -> Self {
        Self(raw.and_then(Credential::new))
    }

    pub fn absent() -> Self {
        Self(None)
    }
}

impl AuthTokenProvider for StaticCredential {
    fn credential(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// Reads the credential from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl AuthTokenProvider for EnvCredentialProvider {
    fn credential(&self) -> Option<Credential> {
        std::env::var(&self.var).ok().and_then(Credential::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \n").is_none());
        assert!(StaticCredential::new(Some(String::new()))
            .credential()
            .is_none());
    }

    #[test]
    fn builds_tma_authorization_header() {
        let credential = Credential::new("query_id=AAA&hash=abc").expect("credential");
        assert_eq!(
            credential.authorization_header(),
            "tma query_id=AAA&hash=abc"
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let credential = Credential::new("secret-token").expect("credential");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-token"), "leaked: {rendered}");
    }

    #[test]
    fn env_provider_reads_named_variable() {
        let var = "CLIENT_CORE_TEST_CREDENTIAL_ENV_PROVIDER";
        std::env::set_var(var, "init-data");
        let provider = EnvCredentialProvider::new(var);
        assert_eq!(
            provider.credential().map(|c| c.expose().to_string()),
            Some("init-data".to_string())
        );
        std::env::remove_var(var);
        assert!(provider.credential().is_none());
    }
}
