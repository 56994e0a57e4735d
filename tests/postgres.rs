//! End-to-end runs against a real database. Every test returns early when
//! postgres from `configuration.yaml` is not reachable.
mod common;

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    for (id, username, full_name, role) in [
        (1, "ada", "Ada Lovelace", "TEACHER"),
        (2, "grace", "Grace Hopper", "STUDENT"),
        (3, "alan", "", "STUDENT"),
        (4, "edsger", "Edsger Dijkstra", "STUDENT"),
    ] {
        sqlx::query("INSERT INTO users (id, username, full_name, role) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(username)
            .bind(full_name)
            .bind(role)
            .execute(pool)
            .await
            .expect("Failed to seed user");
    }

    sqlx::query("INSERT INTO classes (id, name, teacher_id) VALUES (7, 'Computing 101', 1)")
        .execute(pool)
        .await
        .expect("Failed to seed class");
    sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES (7, 2), (7, 3)")
        .execute(pool)
        .await
        .expect("Failed to seed roster");
}

async fn unread_counts(pool: &PgPool, conversation_id: i64) -> Vec<(i32, i32)> {
    sqlx::query_as::<_, (i32, i32)>(
        "SELECT user_id, unread_count FROM conversation_participants WHERE conversation_id = $1 ORDER BY user_id",
    )
    .bind(conversation_id as i32)
    .fetch_all(pool)
    .await
    .expect("Failed to read counters")
}

#[tokio::test]
async fn class_conversation_round_trip() {
    let Some((app, pool)) = common::spawn_pg_app().await else {
        return;
    };
    seed(&pool).await;

    let response = app
        .post("/conversations/class", json!({"creator_id": 1, "class_id": 7}))
        .await;
    assert!(response.status().is_success());
    let id = common::body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/conversations/{}/messages", id),
            json!({"sender_id": 1, "content": "hello", "file_paths": ["uploads/7/syllabus.pdf"]}),
        )
        .await;
    assert!(response.status().is_success());
    let message = common::body(response).await;
    assert_eq!(message["item"]["sender_name"], "Ada Lovelace");
    assert_eq!(message["item"]["attachments"][0]["name"], "syllabus.pdf");

    assert_eq!(unread_counts(&pool, id).await, vec![(1, 0), (2, 1), (3, 1)]);

    let response = app
        .post(&format!("/conversations/{}/read", id), json!({"user_id": 3}))
        .await;
    assert!(response.status().is_success());
    assert_eq!(unread_counts(&pool, id).await, vec![(1, 0), (2, 1), (3, 0)]);

    // user 3 has no full name, so the username is shown
    let response = app
        .get(&format!("/conversations/{}?user_id=3", id))
        .await;
    let conversation = common::body(response).await;
    let names: Vec<&str> = conversation["item"]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"alan"));
}

#[tokio::test]
async fn concurrent_sends_do_not_lose_increments() {
    let Some((app, pool)) = common::spawn_pg_app().await else {
        return;
    };
    seed(&pool).await;

    let response = app
        .post(
            "/conversations/group",
            json!({"creator_id": 1, "name": "Race", "participant_ids": [2, 3, 4]}),
        )
        .await;
    let id = common::body(response).await["id"].as_i64().unwrap();

    let handles: Vec<_> = (0..20)
        .map(|n| {
            let client = app.client.clone();
            let url = format!("{}/conversations/{}/messages", app.address, id);
            let sender = if n % 2 == 0 { 1 } else { 2 };
            tokio::spawn(async move {
                client
                    .post(&url)
                    .json(&json!({"sender_id": sender, "content": format!("message {}", n)}))
                    .send()
                    .await
                    .expect("Failed to execute request.")
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().status().is_success());
    }

    assert_eq!(
        unread_counts(&pool, id).await,
        vec![(1, 10), (2, 10), (3, 20), (4, 20)]
    );
}

#[tokio::test]
async fn direct_conversation_is_unique_in_database() {
    let Some((app, pool)) = common::spawn_pg_app().await else {
        return;
    };
    seed(&pool).await;

    let first = app
        .post("/conversations/direct", json!({"user_id": 2, "other_username": "alan"}))
        .await;
    let second = app
        .post("/conversations/direct", json!({"user_id": 3, "other_user_id": 2}))
        .await;

    assert_eq!(
        common::body(first).await["id"],
        common::body(second).await["id"]
    );
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

async fn send_concurrently(app: &common::TestApp, id: i64, senders: &[i32]) {
    let handles: Vec<_> = senders
        .iter()
        .enumerate()
        .map(|(n, sender)| {
            let client = app.client.clone();
            let url = format!("{}/conversations/{}/messages", app.address, id);
            let body = json!({"sender_id": sender, "content": format!("message {}", n)});
            tokio::spawn(async move {
                client
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .expect("Failed to execute request.")
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().status().is_success());
    }
}

#[tokio::test]
async fn concurrent_sends_keep_timestamps_in_commit_order() {
    let Some((app, pool)) = common::spawn_pg_app().await else {
        return;
    };
    seed(&pool).await;

    let response = app
        .post(
            "/conversations/group",
            json!({"creator_id": 1, "name": "Clock", "participant_ids": [2, 3, 4]}),
        )
        .await;
    let id = common::body(response).await["id"].as_i64().unwrap();

    let senders: Vec<i32> = (0..16).map(|n| n % 4 + 1).collect();
    for _ in 0..5 {
        send_concurrently(&app, id, &senders).await;

        let rows = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            "SELECT id, created_at FROM messages WHERE conversation_id = $1 ORDER BY id",
        )
        .bind(id as i32)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert!(rows.windows(2).all(|pair| pair[0].1 <= pair[1].1));

        let updated_at: DateTime<Utc> =
            sqlx::query_scalar("SELECT updated_at FROM conversations WHERE id = $1")
                .bind(id as i32)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(Some(updated_at), rows.last().map(|row| row.1));
    }

    // the preview is the message committed last
    let response = app
        .get(&format!("/conversations/{}/messages?user_id=1&order=desc&limit=1", id))
        .await;
    let preview = common::body(response).await;
    let last_id: i32 = sqlx::query_scalar("SELECT MAX(id) FROM messages")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(preview["list"][0]["id"], last_id);
}

#[tokio::test]
async fn concurrent_leaves_never_empty_a_group() {
    let Some((app, pool)) = common::spawn_pg_app().await else {
        return;
    };
    seed(&pool).await;

    for _ in 0..10 {
        let response = app
            .post(
                "/conversations/group",
                json!({"creator_id": 1, "name": "Pair", "participant_ids": [2]}),
            )
            .await;
        let id = common::body(response).await["id"].as_i64().unwrap();

        let leaves: Vec<_> = [1, 2]
            .into_iter()
            .map(|user_id| {
                let client = app.client.clone();
                let url = format!(
                    "{}/conversations/{}/participants/{}?user_id={}",
                    app.address, id, user_id, user_id
                );
                tokio::spawn(async move {
                    client
                        .delete(&url)
                        .send()
                        .await
                        .expect("Failed to execute request.")
                        .status()
                        .as_u16()
                })
            })
            .collect();
        let mut statuses = vec![];
        for leave in leaves {
            statuses.push(leave.await.unwrap());
        }
        statuses.sort();

        assert_eq!(statuses, vec![200, 400]);
        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM conversation_participants WHERE conversation_id = $1",
        )
        .bind(id as i32)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, 1);
    }
}
