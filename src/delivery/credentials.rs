use std::fmt;

/// Environment variable holding the SMTP sender address/login.
pub const ENV_SMTP_USER: &str = "SHORTLIST_SMTP_USER";
/// Environment variable holding the SMTP password (app password for Gmail).
pub const ENV_SMTP_PASSWORD: &str = "SHORTLIST_SMTP_PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct SenderCredentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Load a `.env` file from the working directory, if any. Variables already
/// set in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
    }
}

/// Read an environment variable, trimmed. Unset or blank counts as missing.
pub fn get_env_value(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Sender credentials from the environment; `None` unless both are present.
pub fn sender_from_env() -> Option<SenderCredentials> {
    sender_from(get_env_value(ENV_SMTP_USER), get_env_value(ENV_SMTP_PASSWORD))
}

pub fn sender_from(user: Option<String>, password: Option<String>) -> Option<SenderCredentials> {
    Some(SenderCredentials {
        user: non_empty(user)?,
        password: non_empty(password)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_requires_both_values() {
        assert!(sender_from(Some("hr@example.com".into()), None).is_none());
        assert!(sender_from(None, Some("secret".into())).is_none());
        assert!(sender_from(None, None).is_none());
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        assert!(sender_from(Some("hr@example.com".into()), Some("   ".into())).is_none());
        assert!(sender_from(Some("".into()), Some("secret".into())).is_none());
    }

    #[test]
    fn test_values_are_trimmed() {
        let creds = sender_from(Some(" hr@example.com\n".into()), Some(" secret ".into())).unwrap();
        assert_eq!(creds.user, "hr@example.com");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = sender_from(Some("hr@example.com".into()), Some("hunter2".into())).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("hr@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_get_env_value_unset() {
        assert!(get_env_value("SHORTLIST_TEST_SURELY_UNSET_VARIABLE").is_none());
    }
}
