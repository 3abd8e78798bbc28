use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref name) = config.questions_file {
        if name.trim().is_empty() {
            errors.push("questions_file: must not be empty".to_string());
        }
    }

    if let Some(ref name) = config.profiles_file {
        if name.trim().is_empty() {
            errors.push("profiles_file: must not be empty".to_string());
        }
    }

    if let Some(ref ttl) = config.session_ttl {
        match humantime::parse_duration(ttl) {
            Ok(duration) if duration.is_zero() => {
                errors.push("session_ttl: must be greater than zero".to_string());
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(format!("session_ttl: invalid duration '{}' - {}", ttl, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
