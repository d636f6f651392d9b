//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Bare `$VAR` is left alone. An unset variable without a default is an
/// error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("UNDOC_EXPAND_SIMPLE", "latin-1");
        }
        let result = expand_env("${UNDOC_EXPAND_SIMPLE}", "include.source_encoding").unwrap();
        assert_eq!(result, "latin-1");
        unsafe {
            std::env::remove_var("UNDOC_EXPAND_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("UNDOC_EXPAND_UNSET");
        }
        let result = expand_env("${UNDOC_EXPAND_UNSET:-docs}", "docs.source_dir").unwrap();
        assert_eq!(result, "docs");
    }

    #[test]
    fn test_expand_embedded() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("UNDOC_EXPAND_ROOT", "/srv/project");
        }
        let result = expand_env("${UNDOC_EXPAND_ROOT}/docs", "docs.source_dir").unwrap();
        assert_eq!(result, "/srv/project/docs");
        unsafe {
            std::env::remove_var("UNDOC_EXPAND_ROOT");
        }
    }

    #[test]
    fn test_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("UNDOC_EXPAND_MISSING");
        }
        let err = expand_env("${UNDOC_EXPAND_MISSING}", "docs.source_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("UNDOC_EXPAND_MISSING"), "{msg}");
        assert!(msg.contains("docs.source_dir"), "{msg}");
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        let result = expand_env("cost$HOME", "docs.source_dir").unwrap();
        assert_eq!(result, "cost$HOME");
    }
}
