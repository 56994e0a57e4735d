use crate::helpers::JsonResponse;
use crate::services::MessagingService;
use crate::views::UnreadView;
use actix_web::{get, web, Responder, Result};

/// Total unread messages across all conversations of the user.
#[tracing::instrument(name = "Get unread total.", skip(messaging))]
#[get("/{id}/unread")]
pub async fn unread_handler(
    path: web::Path<(i32,)>,
    messaging: web::Data<MessagingService>,
) -> Result<impl Responder> {
    let (user_id,) = path.into_inner();
    let unread_count = messaging.unread_total(user_id).await?;

    Ok(JsonResponse::build()
        .set_item(UnreadView {
            user_id,
            unread_count,
        })
        .ok("OK"))
}
