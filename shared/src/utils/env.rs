use std::str::FromStr;

pub fn get_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses `key`, falling back to `default` when unset or unparsable
pub fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_parsed_fallback() {
        std::env::set_var("UTILS_ENV_TEST_NUMBER", "abc");
        assert_eq!(get_env_parsed("UTILS_ENV_TEST_NUMBER", 42u64), 42);

        std::env::set_var("UTILS_ENV_TEST_NUMBER", "7");
        assert_eq!(get_env_parsed("UTILS_ENV_TEST_NUMBER", 42u64), 7);

        std::env::remove_var("UTILS_ENV_TEST_NUMBER");
        assert_eq!(get_env_parsed("UTILS_ENV_TEST_NUMBER", 42u64), 42);
    }
}
