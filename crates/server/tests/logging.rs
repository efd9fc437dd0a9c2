use std::{
    io,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use engine::Engine;
use migration::MigratorTrait;
use server::ServerState;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().unwrap();
    server::router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn read_handlers_log_entry_and_exit() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = app().await;
    let user = uuid::Uuid::new_v4();
    let (status, body) = call(
        &app,
        "POST",
        "/api/categories",
        Some(&format!(
            r#"{{"name":"Food","type":"Expense","user_uuid":"{user}"}}"#
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let category = created["uuid"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        "/api/operations",
        Some(&format!(r#"{{"category_uuid":"{category}","money_sum":3.5}}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let operation = created["uuid"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "GET", &format!("/api/categories/one/{category}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/categories/user_uuid/{user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/categories/name/food?user_uuid={user}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/operations/one/{operation}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let logs = logs.contents();
    for line in [
        format!("get category {category}"),
        format!("category {category} found"),
        format!("get categories of user {user}"),
        format!("1 categories found for user {user}"),
        "get category by name \"food\"".to_string(),
        format!("category {category} found by name"),
        format!("get operation {operation}"),
        format!("operation {operation} found"),
    ] {
        assert!(logs.contains(&line), "missing log line {line:?} in:\n{logs}");
    }
}
