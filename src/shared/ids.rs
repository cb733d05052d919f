/// Environment variable names: ASCII letters, digits and `_`, not starting with a digit.
pub fn validate_env_key(value: &str) -> Result<(), String> {
    let Some(first) = value.chars().next() else {
        return Err("field key must be non-empty".to_string());
    };
    if first.is_ascii_digit() {
        return Err(format!("field key `{value}` must not start with a digit"));
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Ok(());
    }
    Err(format!(
        "field key `{value}` must use only ASCII letters, digits or '_'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_accept_conventional_names() {
        assert!(validate_env_key("DATABASE_URL").is_ok());
        assert!(validate_env_key("_private2").is_ok());
    }

    #[test]
    fn env_keys_reject_empty_leading_digit_and_punctuation() {
        assert!(validate_env_key("").is_err());
        assert!(validate_env_key("1PORT").is_err());
        assert!(validate_env_key("API-KEY").is_err());
    }
}
