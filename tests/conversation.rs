mod common;

use serde_json::json;

// test me: cargo t --test conversation -- --nocapture --show-output
#[tokio::test]
async fn opening_direct_twice_reuses_conversation() {
    let app = common::spawn_app().await;

    let first = app
        .post("/conversations/direct", json!({"user_id": 1, "other_user_id": 2}))
        .await;
    assert!(first.status().is_success());
    let first = common::body(first).await;

    let second = app
        .post("/conversations/direct", json!({"user_id": 2, "other_username": "user1"}))
        .await;
    assert!(second.status().is_success());
    let second = common::body(second).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["item"]["type"], "DIRECT");
    assert_eq!(first["item"]["title"], "User 2");
    assert_eq!(second["item"]["title"], "User 1");
    assert_eq!(first["item"]["participants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn direct_requires_the_other_side() {
    let app = common::spawn_app().await;

    let response = app
        .post("/conversations/direct", json!({"user_id": 1}))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .post("/conversations/direct", json!({"user_id": 1, "other_user_id": 1}))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .post("/conversations/direct", json!({"user_id": 1, "other_user_id": 99}))
        .await;
    assert_eq!(response.status().as_u16(), 404);
    let body = common::body(response).await;
    assert_eq!(body["message"], "User 99 not found");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = common::spawn_app().await;

    let response = app
        .post("/conversations/group", json!({"creator_id": "one"}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = common::body(response).await;
    assert!(body["message"].as_str().unwrap().contains("Invalid JSON"));
}

#[tokio::test]
async fn group_lifecycle() {
    let app = common::spawn_app().await;

    let response = app
        .post(
            "/conversations/group",
            json!({"creator_id": 1, "name": "Robotics club", "participant_ids": [2]}),
        )
        .await;
    assert!(response.status().is_success());
    let group = common::body(response).await;
    let id = group["id"].as_i64().unwrap();
    assert_eq!(group["item"]["type"], "GROUP");

    let response = app
        .post(
            &format!("/conversations/{}/participants", id),
            json!({"user_id": 1, "participant_id": 4}),
        )
        .await;
    assert!(response.status().is_success());
    let group = common::body(response).await;
    assert_eq!(group["item"]["participants"].as_array().unwrap().len(), 3);

    // outsiders can neither look nor leave
    let response = app
        .get(&format!("/conversations/{}?user_id=5", id))
        .await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app
        .delete(&format!("/conversations/{}/participants/4?user_id=4", id))
        .await;
    assert!(response.status().is_success());

    let response = app.delete(&format!("/conversations/{}?user_id=2", id)).await;
    assert!(response.status().is_success());

    let response = app
        .get(&format!("/conversations/{}?user_id=1", id))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn class_group_requires_membership() {
    let app = common::spawn_app().await;

    let response = app
        .post("/conversations/class", json!({"creator_id": 5, "class_id": 7}))
        .await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app
        .post("/conversations/class", json!({"creator_id": 3, "class_id": 7}))
        .await;
    assert!(response.status().is_success());
    let group = common::body(response).await;
    assert_eq!(group["item"]["name"], "Biology");
    assert_eq!(group["item"]["class_id"], 7);
    assert_eq!(group["item"]["participants"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn inbox_requires_user_id() {
    let app = common::spawn_app().await;

    let response = app.get("/conversations").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.get("/conversations?user_id=1").await;
    assert!(response.status().is_success());
    let body = common::body(response).await;
    assert!(body.get("list").map(|l| l.as_array().unwrap().is_empty()).unwrap_or(true));
}

#[tokio::test]
async fn zero_user_id_is_rejected_everywhere() {
    let app = common::spawn_app().await;
    let response = app
        .post(
            "/conversations/group",
            json!({"creator_id": 1, "name": "Chess", "participant_ids": [2]}),
        )
        .await;
    let id = common::body(response).await["id"].as_i64().unwrap();

    let responses = vec![
        app.get(&format!("/conversations/{}?user_id=0", id)).await,
        app.delete(&format!("/conversations/{}?user_id=0", id)).await,
        app.delete(&format!("/conversations/{}/participants/2?user_id=0", id))
            .await,
        app.post(&format!("/conversations/{}/read", id), json!({"user_id": 0}))
            .await,
    ];
    for response in responses {
        assert_eq!(response.status().as_u16(), 400);
    }

    // nothing was changed by the rejected calls
    let response = app.get(&format!("/conversations/{}?user_id=1", id)).await;
    let group = common::body(response).await;
    assert_eq!(group["item"]["participants"].as_array().unwrap().len(), 2);
}
