use std::sync::Arc;

use actix_web::web;

use super::errors::ChatError;
use super::schemas::{ChatResponse, ChatWebRequest};
use crate::chat_client::{GenericChatService, CHAT_DEGRADED_REPLY};
use crate::schemas::GenericResponse;

/// Provider failures never surface to the shopper; they get the canned
/// WhatsApp redirect in a normal success envelope instead.
#[utoipa::path(
    post,
    path = "/chat/message",
    tag = "Chat",
    request_body(content = ChatWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Reply generated", body= GenericResponse<ChatResponse>),
    )
)]
#[tracing::instrument(err, name = "Chat message", skip(chat_service, body), fields())]
pub async fn chat_message(
    body: ChatWebRequest,
    chat_service: web::Data<Arc<dyn GenericChatService>>,
) -> Result<web::Json<GenericResponse<ChatResponse>>, ChatError> {
    if body.message.is_empty() {
        return Err(ChatError::ValidationError("Message is required".to_string()));
    }
    let reply = match chat_service
        .generate_reply(&body.message, &body.history)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!("Chat provider failed: {:?}", err);
            CHAT_DEGRADED_REPLY.to_string()
        }
    };
    Ok(web::Json(GenericResponse::success(
        "Reply generated successfully",
        Some(ChatResponse { reply }),
    )))
}
