use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::ConversationView;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Open direct conversation.", skip(messaging))]
#[post("/direct")]
pub async fn direct_handler(
    form: web::Json<forms::OpenDirect>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let conversation = match (form.other_user_id, form.other_username.as_deref()) {
        (Some(other_user_id), _) => messaging.open_direct(form.user_id, other_user_id).await?,
        (None, Some(username)) => {
            messaging
                .open_direct_with_username(form.user_id, username)
                .await?
        }
        (None, None) => {
            return Err(JsonResponse::<ConversationView>::build()
                .form_error("other_user_id or other_username is required"))
        }
    };

    Ok(JsonResponse::build()
        .set_id(conversation.id)
        .set_item(conversation)
        .ok("OK"))
}

#[tracing::instrument(name = "Create group conversation.", skip(messaging))]
#[post("/group")]
pub async fn group_handler(
    form: web::Json<forms::CreateGroup>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let conversation = messaging
        .create_group(form.creator_id, &form.name, &form.participant_ids)
        .await?;

    Ok(JsonResponse::build()
        .set_id(conversation.id)
        .set_item(conversation)
        .ok("Created"))
}

#[tracing::instrument(name = "Create class conversation.", skip(messaging))]
#[post("/class")]
pub async fn class_handler(
    form: web::Json<forms::CreateClassGroup>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<ConversationView>::build().form_error(errors.to_string()));
    }

    let conversation = messaging
        .create_class_group(form.creator_id, form.class_id, form.name.as_deref())
        .await?;

    Ok(JsonResponse::build()
        .set_id(conversation.id)
        .set_item(conversation)
        .ok("Created"))
}
