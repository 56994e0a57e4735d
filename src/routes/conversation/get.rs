use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::ConversationView;
use actix_web::{get, web, Responder, Result};
use serde_valid::Validate;

/// GET /conversations?user_id={id}
/// Inbox of the user, most recently active conversation first.
#[tracing::instrument(name = "List conversations.", skip(messaging))]
#[get("")]
pub async fn list_handler(
    query: web::Query<forms::Viewer>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = query.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let conversations = messaging.conversations_for_user(query.user_id).await?;
    Ok(JsonResponse::build().set_list(conversations).ok("OK"))
}

#[tracing::instrument(name = "Get conversation.", skip(messaging))]
#[get("/{id}")]
pub async fn item_handler(
    path: web::Path<(i32,)>,
    query: web::Query<forms::Viewer>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = query.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let conversation = messaging.conversation(id, query.user_id).await?;

    Ok(JsonResponse::build()
        .set_id(conversation.id)
        .set_item(conversation)
        .ok("OK"))
}
