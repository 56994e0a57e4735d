use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::ConversationView;
use actix_web::{delete, post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Add participant.", skip(messaging))]
#[post("/{id}/participants")]
pub async fn add_participant_handler(
    path: web::Path<(i32,)>,
    form: web::Json<forms::AddParticipant>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let conversation = messaging
        .add_participant(id, form.user_id, form.participant_id)
        .await?;

    Ok(JsonResponse::build()
        .set_id(conversation.id)
        .set_item(conversation)
        .ok("Participant added"))
}

/// DELETE /conversations/{id}/participants/{participant_id}?user_id={actor}
#[tracing::instrument(name = "Remove participant.", skip(messaging))]
#[delete("/{id}/participants/{participant_id}")]
pub async fn remove_participant_handler(
    path: web::Path<(i32, i32)>,
    query: web::Query<forms::Viewer>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = query.validate() {
        return Err(JsonResponse::<()>::build().form_error(errors.to_string()));
    }

    let (id, participant_id) = path.into_inner();
    messaging
        .remove_participant(id, query.user_id, participant_id)
        .await?;

    Ok(JsonResponse::<()>::build().set_id(id).ok("Participant removed"))
}
