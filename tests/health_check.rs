mod common;

#[tokio::test]
async fn health_check_works() {
    let app = common::spawn_app().await;

    let response = app.get("/health_check").await;

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn component_report_lists_database() {
    let app = common::spawn_app().await;

    let response = app.get("/health_check/components").await;
    assert!(response.status().is_success());

    let report = common::body(response).await;
    assert_eq!(report["status"], "healthy");
    assert_eq!(report["components"]["database"]["status"], "healthy");
}
