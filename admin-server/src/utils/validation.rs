//! Request payload validation
//!
//! Bridges `validator` derive output into [`AppError`] so that failures
//! reach the caller field by field.

use validator::Validate;

use crate::utils::AppError;

/// Validate a request payload, converting failures into a single
/// validation error with one detail entry per offending field.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    let Err(errors) = payload.validate() else {
        return Ok(());
    };

    let mut err = AppError::validation("Validation failed");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        err = err.with_detail(field.to_string(), serde_json::json!(messages));
    }
    Err(err)
}
