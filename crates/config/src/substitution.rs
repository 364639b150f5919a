use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";
const BRACED_PLACEHOLDER_PATTERN: &str = r"\$\{\w+\}";

fn placeholder_regex() -> Result<Regex> {
    Regex::new(PLACEHOLDER_PATTERN).context("Invalid placeholder pattern")
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
///
/// Unset variables keep their placeholder so validation can report them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = placeholder_regex()?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let placeholder = caps.get(0).map_or("", |m| m.as_str());
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "Substituting environment variable");
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                placeholder.to_string()
            }
        }
    });
    let result = result.into_owned();

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (validation will flag them): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_regex().map_or(false, |re| re.is_match(content))
}

/// Like [`has_unresolved_env_vars`], but only the `${VAR}` form counts.
///
/// For secrets, where a bare `$word` is more likely literal text.
pub fn has_unresolved_braced_env_vars(content: &str) -> bool {
    Regex::new(BRACED_PLACEHOLDER_PATTERN).map_or(false, |re| re.is_match(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_forms() {
        env::set_var("INSPECTD_TEST_DB_HOST", "db.example");
        env::set_var("INSPECTD_TEST_DB_USER", "inspector");

        let out = substitute_env_vars("host: ${INSPECTD_TEST_DB_HOST}\nuser: $INSPECTD_TEST_DB_USER").unwrap();
        assert_eq!(out, "host: db.example\nuser: inspector");
        assert!(!has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_unset_keeps_placeholder() {
        env::remove_var("INSPECTD_TEST_NEVER_SET");
        let out = substitute_env_vars("password: ${INSPECTD_TEST_NEVER_SET}").unwrap();
        assert_eq!(out, "password: ${INSPECTD_TEST_NEVER_SET}");
        assert!(has_unresolved_env_vars(&out));
        assert!(has_unresolved_braced_env_vars(&out));
    }

    #[test]
    fn test_bare_dollar_is_not_braced_placeholder() {
        assert!(has_unresolved_env_vars("pa$word"));
        assert!(!has_unresolved_braced_env_vars("pa$word"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = substitute_env_vars("name: inspection-service").unwrap();
        assert_eq!(out, "name: inspection-service");
        assert!(!has_unresolved_env_vars(&out));
    }
}
