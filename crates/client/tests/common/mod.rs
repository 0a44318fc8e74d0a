//! In-process stand-ins for the backend used by the client tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use futures::SinkExt;
use promptcubic_db::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

/// Prompt store behind the mock REST routes.
#[derive(Default)]
pub struct MockBackend {
    pub prompts: Vec<Prompt>,
    /// When set, every route answers 500.
    pub failing: bool,
}

pub type Shared = Arc<Mutex<MockBackend>>;

pub fn prompt(title: &str, content: &str) -> Prompt {
    Prompt {
        id: Uuid::new_v4(),
        title: title.into(),
        content: content.into(),
        user_id: Uuid::nil(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn internal() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "An internal error occurred", "code": "INTERNAL_ERROR" })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Prompt not found", "code": "NOT_FOUND" })),
    )
        .into_response()
}

async fn list(State(db): State<Shared>) -> Response {
    let db = db.lock().unwrap();
    if db.failing {
        return internal();
    }
    Json(db.prompts.clone()).into_response()
}

async fn create(State(db): State<Shared>, Json(input): Json<CreatePrompt>) -> Response {
    let mut db = db.lock().unwrap();
    if db.failing {
        return internal();
    }
    let created = prompt(&input.title, &input.content);
    db.prompts.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(db): State<Shared>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePrompt>,
) -> Response {
    let mut db = db.lock().unwrap();
    if db.failing {
        return internal();
    }
    match db.prompts.iter_mut().find(|p| p.id == id) {
        Some(p) => {
            p.title = input.title;
            p.content = input.content;
            p.updated_at = Utc::now();
            Json(p.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn remove(State(db): State<Shared>, Path(id): Path<Uuid>) -> Response {
    let mut db = db.lock().unwrap();
    if db.failing {
        return internal();
    }
    let before = db.prompts.len();
    db.prompts.retain(|p| p.id != id);
    if db.prompts.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Prompt deleted successfully" })).into_response()
}

/// Serve the mock REST API on an ephemeral port. Returns the base URL and
/// the shared store.
pub async fn spawn_backend() -> (String, Shared) {
    let db: Shared = Arc::default();
    let app = Router::new()
        .route("/api/prompts", get(list).post(create))
        .route("/api/prompts/{id}", put(update).delete(remove))
        .with_state(Arc::clone(&db));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}"), db)
}

/// Build a change frame as the server sends it.
pub fn change_frame(event: &str, id: Uuid) -> String {
    json!({
        "type": "postgres_changes",
        "event": event,
        "table": "prompts",
        "id": id,
        "timestamp": Utc::now(),
    })
    .to_string()
}

/// Accept WebSocket connections on an ephemeral port. Each accepted
/// connection gets the next script from `scripts`: its frames are sent in
/// order and then the socket is closed.
pub async fn spawn_feed(scripts: Vec<Vec<String>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for frames in scripts {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            for frame in frames {
                ws.send(Message::Text(frame)).await.unwrap();
            }
            let _ = ws.close(None).await;
        }
    });

    format!("http://{addr}")
}
