use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::Class>, String> {
    sqlx::query_as::<_, models::Class>(
        "SELECT id, name, teacher_id, created_at FROM classes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch class {}, error: {:?}", id, err);
        "Could not fetch class".to_string()
    })
}

pub async fn fetch_student_ids(pool: &PgPool, class_id: i32) -> Result<Vec<i32>, String> {
    let query_span = tracing::info_span!("Fetch class roster.", class_id);
    sqlx::query_scalar::<_, i32>(
        "SELECT student_id FROM class_students WHERE class_id = $1 ORDER BY student_id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch class roster, error: {:?}", err);
        "Could not fetch class roster".to_string()
    })
}
