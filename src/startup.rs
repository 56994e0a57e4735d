use crate::configuration::Settings;
use crate::connectors::{LinkFileStorage, PgClassDirectory, PgUserDirectory};
use crate::health::HealthChecker;
use crate::helpers::JsonResponse;
use crate::routes;
use crate::services::MessagingService;
use crate::store::{ConversationStore, PgConversationStore};
use actix_cors::Cors;
use actix_web::{dev::Server, error, middleware, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// Wires the postgres-backed store and directories, then starts serving.
pub fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let store: Arc<dyn ConversationStore> = Arc::new(PgConversationStore::new(pg_pool.clone()));
    let messaging = MessagingService::new(
        store.clone(),
        Arc::new(PgUserDirectory::new(pg_pool.clone())),
        Arc::new(PgClassDirectory::new(pg_pool)),
        Arc::new(LinkFileStorage::new(&settings.files)),
    );

    serve(listener, store, messaging)
}

/// Starts the HTTP server around an already assembled messaging service.
pub fn serve(
    listener: TcpListener,
    store: Arc<dyn ConversationStore>,
    messaging: MessagingService,
) -> Result<Server, std::io::Error> {
    let messaging = web::Data::new(messaging);
    let health_checker = web::Data::new(Arc::new(HealthChecker::new(store)));

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg: String = match err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "Invalid JSON at line {}, column {}: {}",
                err.line(),
                err.column(),
                err
            ),
            err => err.to_string(),
        };
        tracing::debug!("Rejected request body: {}", msg);
        JsonResponse::<()>::build().bad_request(msg)
    });
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| JsonResponse::<()>::build().bad_request(err.to_string()));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(Cors::permissive())
            .app_data(json_config.clone())
            .app_data(query_config.clone())
            .app_data(messaging.clone())
            .app_data(health_checker.clone())
            .configure(configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health_check")
            .service(routes::health_check)
            .service(routes::health_components),
    )
    .service(
        web::scope("/conversations")
            .service(routes::conversation::direct_handler)
            .service(routes::conversation::group_handler)
            .service(routes::conversation::class_handler)
            .service(routes::conversation::list_handler)
            .service(routes::conversation::item_handler)
            .service(routes::conversation::delete_handler)
            .service(routes::conversation::add_participant_handler)
            .service(routes::conversation::remove_participant_handler)
            .service(routes::message::send_handler)
            .service(routes::message::list_messages_handler)
            .service(routes::message::read_handler),
    )
    .service(web::scope("/users").service(routes::user::unread_handler));
}
