//! Contact form handler

use axum::Json;
use axum::extract::State;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, validate_payload};
use shared::error::ErrorCode;
use shared::models::ContactMessage;

/// POST /api/contact - validate and deliver a contact form submission
///
/// Delivery failures surface as one generic error; the cause only goes
/// to the log. No retries.
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<ContactMessage>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_payload(&payload)?;

    if let Err(e) = state.mailer.send_contact(&payload).await {
        tracing::error!(
            sender = %payload.email,
            code = %e.code,
            error = %e.message,
            "Contact form delivery failed"
        );
        return Err(AppError::with_message(
            ErrorCode::MailSendFailed,
            "Sorry, there was an error sending your message. Please try again.",
        ));
    }

    Ok(Json(ApiResponse {
        code: Some(0),
        message: "Your message has been sent successfully!".to_string(),
        data: None,
        details: None,
    }))
}
