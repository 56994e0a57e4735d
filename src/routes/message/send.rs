use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::MessageView;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Send message.", skip(form, messaging))]
#[post("/{id}/messages")]
pub async fn send_handler(
    path: web::Path<(i32,)>,
    form: web::Json<forms::SendMessage>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        let errors = errors.to_string();
        tracing::debug!("Invalid message received {:?}", &errors);
        return Err(JsonResponse::<MessageView>::build().form_error(errors));
    }

    let (id,) = path.into_inner();
    let message = messaging
        .send_message(id, form.sender_id, &form.content, &form.file_paths)
        .await?;

    Ok(JsonResponse::build()
        .set_id(message.id)
        .set_item(message)
        .ok("Sent"))
}
