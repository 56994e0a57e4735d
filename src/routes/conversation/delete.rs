use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use actix_web::{delete, web, Responder, Result};
use serde_valid::Validate;

/// Removes the conversation with all of its participants and messages.
#[tracing::instrument(name = "Delete conversation.", skip(messaging))]
#[delete("/{id}")]
pub async fn delete_handler(
    path: web::Path<(i32,)>,
    query: web::Query<forms::Viewer>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = query.validate() {
        return Err(JsonResponse::<()>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    messaging.delete_conversation(id, query.user_id).await?;

    Ok(JsonResponse::<()>::build().set_id(id).ok("Deleted"))
}
