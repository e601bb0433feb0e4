use std::fmt;
use std::time::Duration;

/// Path of the remote `add-record` endpoint, relative to the base URL.
pub const DEFAULT_NOTIFY_PATH: &str = "/api2/Docuware/add-record";

/// Connection settings for [`HttpRecordNotifier`](crate::HttpRecordNotifier).
#[derive(Clone)]
pub struct NotifierConfig {
    /// Base URL of the remote service, e.g. `https://dms.example.com`
    pub base_url: String,
    /// Endpoint path joined onto `base_url`
    pub path: String,
    /// Account sent as `userId`
    pub user: String,
    /// Credential sent as `passwordWS`
    pub password: String,
    /// Target cabinet sent as `cabinetId`
    pub cabinet_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl NotifierConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: DEFAULT_NOTIFY_PATH.to_string(),
            user: String::new(),
            password: String::new(),
            cabinet_id: String::new(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn cabinet_id(mut self, cabinet_id: impl Into<String>) -> Self {
        self.cabinet_id = cabinet_id.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The password must never reach logs.
impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("cabinet_id", &self.cabinet_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = NotifierConfig::new("https://dms.example.com").credentials("svc", "hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("svc"));
    }

    #[test]
    fn test_defaults() {
        let config = NotifierConfig::new("https://dms.example.com");
        assert_eq!(config.path, DEFAULT_NOTIFY_PATH);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
