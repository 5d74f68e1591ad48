use super::ApiError;

const MAX_IDENTIFIER_LEN: usize = 128;
const MAX_USERNAME_LEN: usize = 64;

pub fn validate_device_id(device_id: &str) -> Result<&str, ApiError> {
    let trimmed = device_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Device ID cannot be empty"));
    }

    if trimmed.len() > MAX_IDENTIFIER_LEN {
        return Err(ApiError::validation(format!(
            "Device ID must be {} characters or less",
            MAX_IDENTIFIER_LEN
        )));
    }

    Ok(trimmed)
}

pub fn validate_device_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Device name cannot be empty"));
    }
    Ok(trimmed)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "Username must be {} characters or less",
            MAX_USERNAME_LEN
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password cannot be empty"));
    }
    Ok(password)
}

/// Page parameters are 1-indexed and bounded by `max_page_size`.
pub fn validate_page(page_number: i64, page_size: i64, max_page_size: u64) -> Result<(), ApiError> {
    if page_number <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid page number: {}. Page number must be a positive integer",
            page_number
        )));
    }

    let in_range = u64::try_from(page_size).is_ok_and(|size| (1..=max_page_size).contains(&size));
    if !in_range {
        return Err(ApiError::validation(format!(
            "Invalid page size: {}. Page size must be between 1 and {}",
            page_size, max_page_size
        )));
    }

    Ok(())
}

/// Trims grant names and rejects blank ones.
pub fn validate_grant_names(names: &[String]) -> Result<Vec<String>, ApiError> {
    names
        .iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(ApiError::validation("Grant names cannot be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
