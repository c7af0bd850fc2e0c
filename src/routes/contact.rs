use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::extractors::ApiJson;
use crate::mail::ContactMessage;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(contact))
}

fn validate(message: &ContactMessage) -> AppResult<()> {
    let fields = [&message.name, &message.email, &message.message];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::BadRequest("All fields must be filled in".into()));
    }
    if !message.email.contains('@') {
        return Err(AppError::BadRequest("Email address is not valid".into()));
    }
    Ok(())
}

async fn contact(
    State(state): State<AppState>,
    ApiJson(message): ApiJson<ContactMessage>,
) -> AppResult<Json<Value>> {
    validate(&message)?;
    tracing::info!("Contact form submission: {} ({})", message.name, message.email);

    if let Some(mailer) = &state.mailer {
        mailer.send_contact(&message).await?;
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Message sent. Thank you!",
    })))
}
