use lms_messaging::configuration::{get_configuration, DatabaseSettings, FileSettings, Settings};
use lms_messaging::connectors::{LinkFileStorage, MockClassDirectory, MockUserDirectory};
use lms_messaging::services::MessagingService;
use lms_messaging::startup;
use lms_messaging::store::InMemoryConversationStore;
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn bind_random_port() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    (listener, format!("http://127.0.0.1:{}", port))
}

/// Server backed by the in-memory store. Users 1..=5 exist; class 7
/// ("Biology") is taught by user 1 with students 2 and 3.
pub async fn spawn_app() -> TestApp {
    let (listener, address) = bind_random_port();

    let store = Arc::new(InMemoryConversationStore::new());
    let classes = MockClassDirectory::default().with_class(7, "Biology", 1, vec![2, 3]);
    let messaging = MessagingService::new(
        store.clone(),
        Arc::new(MockUserDirectory::with_ids(1..=5)),
        Arc::new(classes),
        Arc::new(LinkFileStorage::new(&FileSettings {
            download_base_url: "http://files.test/download".to_string(),
        })),
    );

    let server = startup::serve(listener, store, messaging).expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

/// Server backed by a fresh postgres database, `None` when postgres is unreachable.
pub async fn spawn_pg_app() -> Option<(TestApp, PgPool)> {
    let mut configuration: Settings = get_configuration().expect("Failed to get configuration");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    let connection_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let (listener, address) = bind_random_port();
    let server = startup::run(listener, connection_pool.clone(), configuration)
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    Some((
        TestApp {
            address,
            client: reqwest::Client::new(),
        },
        connection_pool,
    ))
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await?;

    Ok(connection_pool)
}

pub async fn body(response: reqwest::Response) -> Value {
    response.json::<Value>().await.expect("Response is not JSON")
}
