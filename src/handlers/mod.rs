pub mod protected;
pub mod public;

use std::collections::HashMap;

use crate::error::ApiError;

/// Required-field validation for resource forms. Reports every missing field
/// at once, field by field.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    for (name, value) in fields {
        if value.trim().is_empty() {
            field_errors.insert(name.to_string(), "This field is required".to_string());
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ))
    }
}
