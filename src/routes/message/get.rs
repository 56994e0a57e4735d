use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::MessageView;
use actix_web::{get, web, Responder, Result};
use serde_valid::Validate;

/// GET /conversations/{id}/messages?user_id={id}&order=asc|desc&limit={n}
/// `asc` (default) is chat history, `desc` serves last-message previews.
#[tracing::instrument(name = "List messages.", skip(messaging))]
#[get("/{id}/messages")]
pub async fn list_messages_handler(
    path: web::Path<(i32,)>,
    query: web::Query<forms::MessagesQuery>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = query.validate() {
        return Err(JsonResponse::<MessageView>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let messages = messaging
        .messages(id, query.user_id, query.order, query.limit)
        .await?;

    Ok(JsonResponse::build().set_list(messages).ok("OK"))
}
