//! Environment variable parsing utilities
//!
//! Small helpers shared by the pool configuration and the service config so
//! that neither needs `unwrap()` to read a number or a flag.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// Missing and unparsable values both fall back to `default`.
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("BLOG_SERVICE_PORT", 8080);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing, blank or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Parse a boolean flag
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` (case-insensitive).
/// Anything else yields `default`.
pub fn parse_env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Split a comma separated variable into trimmed, non-empty items
pub fn parse_env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_parse_env_with_default() {
        std::env::remove_var("ENV_UTILS_PORT");
        let result: u16 = parse_env_with_default("ENV_UTILS_PORT", 3000);
        assert_eq!(result, 3000);

        std::env::set_var("ENV_UTILS_PORT", "8080");
        let result: u16 = parse_env_with_default("ENV_UTILS_PORT", 3000);
        assert_eq!(result, 8080);

        std::env::set_var("ENV_UTILS_PORT", "not-a-port");
        let result: u16 = parse_env_with_default("ENV_UTILS_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("ENV_UTILS_PORT");
    }

    #[test]
    #[serial]
    fn test_parse_env_optional_blank_is_none() {
        std::env::set_var("ENV_UTILS_OPT", "  ");
        assert_eq!(parse_env_optional::<u32>("ENV_UTILS_OPT"), None);

        std::env::set_var("ENV_UTILS_OPT", " 12 ");
        assert_eq!(parse_env_optional::<u32>("ENV_UTILS_OPT"), Some(12));
        std::env::remove_var("ENV_UTILS_OPT");
    }

    #[test]
    #[serial]
    fn test_parse_env_flag() {
        std::env::remove_var("ENV_UTILS_FLAG");
        assert!(parse_env_flag("ENV_UTILS_FLAG", true));

        std::env::set_var("ENV_UTILS_FLAG", "FALSE");
        assert!(!parse_env_flag("ENV_UTILS_FLAG", true));

        std::env::set_var("ENV_UTILS_FLAG", "1");
        assert!(parse_env_flag("ENV_UTILS_FLAG", false));

        std::env::set_var("ENV_UTILS_FLAG", "maybe");
        assert!(!parse_env_flag("ENV_UTILS_FLAG", false));
        std::env::remove_var("ENV_UTILS_FLAG");
    }

    #[test]
    #[serial]
    fn test_parse_env_list() {
        std::env::set_var(
            "ENV_UTILS_LIST",
            "http://localhost:5173, https://blog.example.com,,",
        );
        assert_eq!(
            parse_env_list("ENV_UTILS_LIST"),
            vec!["http://localhost:5173", "https://blog.example.com"]
        );

        std::env::remove_var("ENV_UTILS_LIST");
        assert!(parse_env_list("ENV_UTILS_LIST").is_empty());
    }
}
