use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    books::{book_pricing, create_book, get_book, list_books, update_book},
    calculator::{add, calculate_handler, divide, multiply, subtract},
    error::AppError,
    presence::ws_handler,
    state::AppState,
    tasks::{create_task, delete_task, get_task, list_tasks, update_task},
};

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/pricing", get(book_pricing))
        .route("/api/books/{id}", get(get_book).put(update_book))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/add", get(add))
        .route("/api/subtract", get(subtract))
        .route("/api/multiply", get(multiply))
        .route("/api/divide", get(divide))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/status", get(status_handler))
        .route("/api/integrity-check42", get(integrity_handler))
        .route("/ws", get(ws_handler))
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "Server running",
        "onlineUsers": state.presence.online_count().await,
    }))
}

pub async fn integrity_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn not_found_handler() -> AppError {
    AppError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{config::Config, test_utils::TestApp};

    #[tokio::test]
    async fn test_integrity_check() {
        let app = TestApp::new().await;

        for _ in 0..2 {
            let (status, body) = app.get("/api/integrity-check42").await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert!(body.is_null());
        }
    }

    #[tokio::test]
    async fn test_status_reports_online_users() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "Server running", "onlineUsers": 0 }));
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let app = TestApp::new().await;

        for uri in ["/api/nonexistent", "/random/path/that/does/not/exist"] {
            let (status, body) = app.get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(
                body,
                json!({ "statusCode": 404, "data": null, "message": "Route not found" })
            );
        }
    }

    #[tokio::test]
    async fn test_static_dir_fallback() {
        let dir = std::env::temp_dir().join(format!("coursework-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>Books</h1>").unwrap();

        let config = Config {
            static_dir: dir.to_string_lossy().into_owned(),
            ..Config::default()
        };
        let app = TestApp::with_config(config).await;

        let (status, body) = app.get("/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("<h1>Books</h1>"));

        let not_found = json!({ "statusCode": 404, "data": null, "message": "Route not found" });

        let (status, body) = app.get("/missing.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found);

        let (status, body) = app.post("/random/path", json!({ "a": 1 })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found);

        let (status, body) = app.delete("/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let app = TestApp::new().await;

        let (status, _) = app.get("/ws").await;
        assert!(status.is_client_error());
    }
}
