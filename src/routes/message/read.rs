use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Mark conversation read.", skip(messaging))]
#[post("/{id}/read")]
pub async fn read_handler(
    path: web::Path<(i32,)>,
    form: web::Json<forms::MarkRead>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<u64>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let stamped = messaging.mark_read(id, form.user_id).await?;

    Ok(JsonResponse::<u64>::build()
        .set_id(id)
        .set_item(stamped)
        .ok("Marked as read"))
}
