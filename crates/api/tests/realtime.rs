//! Tests for realtime delivery: connection registry, change routing, and
//! the upgrade endpoint's authentication.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use axum::http::StatusCode;
use common::{body_json, get, token_for};
use futures::{SinkExt, StreamExt};
use promptcubic_api::realtime::ChangeRouter;
use promptcubic_api::ws::WsManager;
use promptcubic_core::change::{ChangeKind, FeedMessage, TABLE_PROMPTS};
use promptcubic_events::{ChangeEvent, EventBus};
use sqlx::PgPool;
use tokio_tungstenite::tungstenite;
use uuid::Uuid;

fn decode(message: Message) -> FeedMessage {
    match message {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn manager_tracks_connections() {
    let manager = WsManager::new();
    let user = Uuid::new_v4();

    let _rx1 = manager.add("a".into(), user).await;
    let _rx2 = manager.add("b".into(), user).await;
    let _rx3 = manager.add("c".into(), Uuid::new_v4()).await;

    assert_eq!(manager.connection_count().await, 3);
    let mut mine = manager.get_by_user(user).await;
    mine.sort();
    assert_eq!(mine, vec!["a".to_string(), "b".to_string()]);

    manager.remove("a").await;
    assert_eq!(manager.connection_count().await, 2);
    assert!(!manager.send_to_conn("a", Message::Text("x".into())).await);
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx = manager.add("a".into(), Uuid::new_v4()).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert_matches!(rx.recv().await, Some(Message::Close(None)));
}

#[tokio::test]
async fn router_delivers_only_to_owner() {
    let manager = Arc::new(WsManager::new());
    let owner = Uuid::new_v4();
    let mut owner_a = manager.add("owner-a".into(), owner).await;
    let mut owner_b = manager.add("owner-b".into(), owner).await;
    let mut stranger = manager.add("stranger".into(), Uuid::new_v4()).await;

    let router = ChangeRouter::new(Arc::clone(&manager));
    let record_id = Uuid::new_v4();
    router
        .route(&ChangeEvent::new(
            TABLE_PROMPTS,
            ChangeKind::Update,
            record_id,
            owner,
        ))
        .await;

    for rx in [&mut owner_a, &mut owner_b] {
        match decode(rx.try_recv().unwrap()) {
            FeedMessage::PostgresChanges {
                event, table, id, ..
            } => {
                assert_eq!(event, ChangeKind::Update);
                assert_eq!(table, "prompts");
                assert_eq!(id, record_id);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
    assert!(stranger.try_recv().is_err());
}

#[tokio::test]
async fn router_loop_stops_when_bus_is_dropped() {
    let manager = Arc::new(WsManager::new());
    let owner = Uuid::new_v4();
    let mut rx = manager.add("conn".into(), owner).await;

    let bus = EventBus::default();
    let handle = tokio::spawn(ChangeRouter::new(Arc::clone(&manager)).run(bus.subscribe()));

    bus.publish(ChangeEvent::new(
        TABLE_PROMPTS,
        ChangeKind::Delete,
        Uuid::new_v4(),
        owner,
    ));
    let message = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
        .await
        .expect("event should be routed")
        .expect("channel open");
    assert_matches!(
        decode(message),
        FeedMessage::PostgresChanges {
            event: ChangeKind::Delete,
            ..
        }
    );

    drop(bus);
    tokio::time::timeout(std::time::Duration::from_secs(2), handle)
        .await
        .expect("router should exit")
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn realtime_endpoint_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/realtime").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn realtime_endpoint_rejects_bad_query_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/realtime?access_token=garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

type ClientSocket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Read the next text frame as a feed message, skipping control frames.
async fn next_feed_message(socket: &mut ClientSocket) -> FeedMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("frame should arrive")
            .expect("socket open")
            .expect("valid frame");
        if let tungstenite::Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn websocket_session_confirms_answers_pings_and_delivers_changes(pool: PgPool) {
    let manager = Arc::new(WsManager::new());
    let app = common::build_test_app_with_ws(pool, Arc::clone(&manager));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let user_id = Uuid::new_v4();
    let url = format!("ws://{addr}/api/realtime?access_token={}", token_for(user_id));
    let (mut socket, _) = tokio_tungstenite::connect_async(url).await.unwrap();

    assert_eq!(
        next_feed_message(&mut socket).await,
        FeedMessage::Subscribed {
            channel: "prompts_changes".to_string()
        }
    );
    assert_eq!(manager.get_by_user(user_id).await.len(), 1);

    socket
        .send(tungstenite::Message::Text(r#"{"type":"ping"}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(next_feed_message(&mut socket).await, FeedMessage::Pong);

    let record_id = Uuid::new_v4();
    ChangeRouter::new(Arc::clone(&manager))
        .route(&ChangeEvent::new(
            TABLE_PROMPTS,
            ChangeKind::Insert,
            record_id,
            user_id,
        ))
        .await;
    assert_matches!(
        next_feed_message(&mut socket).await,
        FeedMessage::PostgresChanges { event: ChangeKind::Insert, id, .. } if id == record_id
    );
}
