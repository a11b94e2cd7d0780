use std::fmt;

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Secret API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, only for building the outbound request
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Resolves the model credential at call time
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Returns the key, or `None` when it is not configured
    fn api_key(&self) -> Option<ApiKey>;

    /// Name of the setting users must provide, for error messages
    fn source_name(&self) -> &'static str;
}

/// Reads the key from the process environment on every call
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        std::env::var(GEMINI_API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(ApiKey)
    }

    fn source_name(&self) -> &'static str {
        GEMINI_API_KEY_VAR
    }
}

/// Fixed credential, used when the key is injected rather than read from env
#[derive(Debug, Clone)]
pub struct StaticCredentials(Option<ApiKey>);

impl StaticCredentials {
    pub fn new(key: Option<&str>) -> Self {
        Self(key.map(ApiKey::new))
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        self.0.clone()
    }

    fn source_name(&self) -> &'static str {
        GEMINI_API_KEY_VAR
    }
}
