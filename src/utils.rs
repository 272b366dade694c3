use crate::constants::*;
use crate::error::ApiError;

/// Lengths are counted in characters after trimming.
pub fn validate_string_length(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<(), ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    if value.chars().count() > max_length {
        return Err(ApiError::BadRequest(format!(
            "{} must be less than {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_limit(limit: Option<u32>, default: u32) -> Result<u32, ApiError> {
    match limit {
        Some(0) => Err(ApiError::BadRequest(
            "Limit must be greater than 0".to_string(),
        )),
        Some(l) if l > MAX_LIMIT => Err(ApiError::BadRequest(format!(
            "Limit cannot exceed {}",
            MAX_LIMIT
        ))),
        Some(l) => Ok(l),
        None => Ok(default),
    }
}

pub fn validate_visitors_limit(limit: Option<u32>) -> Result<u32, ApiError> {
    validate_limit(limit, DEFAULT_VISITORS_LIMIT)
}

pub fn validate_offset(offset: Option<u32>) -> Result<u32, ApiError> {
    match offset {
        Some(o) if o > MAX_OFFSET => Err(ApiError::BadRequest(format!(
            "Offset cannot exceed {}",
            MAX_OFFSET
        ))),
        Some(o) => Ok(o),
        None => Ok(0),
    }
}
