//! End-to-end tests of the dashboard sync loop against a mock backend.

mod common;

use assert_matches::assert_matches;
use common::{prompt, spawn_backend};
use promptcubic_client::sync::{CREATE_FAILED, DELETE_FAILED, FETCH_FAILED, UPDATE_FAILED};
use promptcubic_client::{ChangeNotice, ClientError, PromptApi, PromptForm, PromptSync};
use promptcubic_core::change::ChangeKind;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

async fn setup() -> (PromptSync, common::Shared) {
    let (base_url, db) = spawn_backend().await;
    (PromptSync::new(PromptApi::new(base_url, "token")), db)
}

#[tokio::test]
async fn refresh_replaces_board() {
    let (mut sync, db) = setup().await;
    db.lock().unwrap().prompts = vec![prompt("A", "a"), prompt("B", "b")];

    sync.refresh().await.unwrap();

    let titles: Vec<_> = sync.board().prompts().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert_eq!(sync.board().last_error(), None);
}

#[tokio::test]
async fn failed_refresh_keeps_list_and_sets_error() {
    let (mut sync, db) = setup().await;
    db.lock().unwrap().prompts = vec![prompt("A", "a")];
    sync.refresh().await.unwrap();

    db.lock().unwrap().failing = true;
    let err = sync.refresh().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(sync.board().len(), 1);
    assert_eq!(sync.board().last_error(), Some(FETCH_FAILED));
}

#[tokio::test]
async fn submit_creates_and_clears_form() {
    let (mut sync, db) = setup().await;
    let mut form = PromptForm::new();
    form.title = "T".into();
    form.content = "C".into();

    let created = sync.submit(&mut form).await.unwrap();

    assert_eq!(created.title, "T");
    assert_eq!(sync.board().prompts(), &[created]);
    assert!(form.title.is_empty() && form.content.is_empty());
    assert_eq!(db.lock().unwrap().prompts.len(), 1);
}

#[tokio::test]
async fn submit_with_blank_field_makes_no_request() {
    let (mut sync, db) = setup().await;
    let mut form = PromptForm::new();
    form.title = "T".into();

    assert_matches!(sync.submit(&mut form).await, Err(ClientError::Core(_)));
    assert!(db.lock().unwrap().prompts.is_empty());
    assert_eq!(form.title, "T");
}

#[tokio::test]
async fn failed_create_leaves_list_unchanged() {
    let (mut sync, db) = setup().await;
    db.lock().unwrap().failing = true;
    let mut form = PromptForm::new();
    form.title = "T".into();
    form.content = "C".into();

    assert!(sync.submit(&mut form).await.is_err());
    assert!(sync.board().is_empty());
    assert_eq!(sync.board().last_error(), Some(CREATE_FAILED));
}

#[tokio::test]
async fn submit_while_editing_updates_and_closes_dialog() {
    let (mut sync, db) = setup().await;
    let original = prompt("Old", "old body");
    db.lock().unwrap().prompts = vec![original.clone()];
    sync.refresh().await.unwrap();

    let mut form = PromptForm::new();
    let editing = sync.board_mut().begin_edit(original.id).cloned().unwrap();
    form.load(&editing);
    form.title = "New".into();

    let updated = sync.submit(&mut form).await.unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(sync.board().prompts()[0].title, "New");
    assert_eq!(sync.board().editing(), None);
    assert!(!form.is_editing());
}

#[tokio::test]
async fn failed_update_closes_dialog_and_keeps_old_values() {
    let (mut sync, db) = setup().await;
    let original = prompt("Old", "old body");
    db.lock().unwrap().prompts = vec![original.clone()];
    sync.refresh().await.unwrap();

    let mut form = PromptForm::new();
    form.load(sync.board_mut().begin_edit(original.id).unwrap());
    form.title = "New".into();
    db.lock().unwrap().failing = true;

    assert!(sync.submit(&mut form).await.is_err());
    assert_eq!(sync.board().prompts()[0].title, "Old");
    assert_eq!(sync.board().editing(), None);
    assert_eq!(sync.board().last_error(), Some(UPDATE_FAILED));
}

#[tokio::test]
async fn confirm_delete_removes_pending_prompt() {
    let (mut sync, db) = setup().await;
    let doomed = prompt("Doomed", "x");
    db.lock().unwrap().prompts = vec![doomed.clone(), prompt("Kept", "y")];
    sync.refresh().await.unwrap();

    sync.board_mut().request_delete(doomed.id);
    sync.confirm_delete().await.unwrap();

    assert_eq!(sync.board().len(), 1);
    assert_eq!(sync.board().pending_delete(), None);
    assert_eq!(db.lock().unwrap().prompts.len(), 1);
}

#[tokio::test]
async fn failed_delete_clears_pending_and_keeps_prompt() {
    let (mut sync, db) = setup().await;
    db.lock().unwrap().prompts = vec![prompt("A", "a")];
    sync.refresh().await.unwrap();

    sync.board_mut().request_delete(Uuid::new_v4());
    let err = sync.confirm_delete().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(sync.board().len(), 1);
    assert_eq!(sync.board().pending_delete(), None);
    assert_eq!(sync.board().last_error(), Some(DELETE_FAILED));
}

#[tokio::test]
async fn confirm_delete_without_pending_is_a_noop() {
    let (mut sync, _db) = setup().await;
    sync.confirm_delete().await.unwrap();
}

#[tokio::test]
async fn run_live_refetches_on_notice() {
    let (mut sync, db) = setup().await;
    let (tx, rx) = mpsc::channel(4);

    // Another session wrote a prompt; only the notice tells us.
    let remote = prompt("From elsewhere", "body");
    db.lock().unwrap().prompts.push(remote.clone());
    tx.send(ChangeNotice {
        event: ChangeKind::Insert,
        table: "prompts".into(),
        id: remote.id,
        timestamp: chrono::Utc::now(),
    })
    .await
    .unwrap();
    drop(tx);

    sync.run_live(rx, CancellationToken::new()).await;

    assert_eq!(sync.board().prompts(), &[remote]);
}

#[tokio::test]
async fn run_live_stops_on_cancel() {
    let (mut sync, _db) = setup().await;
    let (_tx, rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(2), sync.run_live(rx, cancel))
        .await
        .expect("run_live should return once cancelled");
}

#[tokio::test]
async fn edit_form_updates_even_without_open_dialog() {
    let (mut sync, db) = setup().await;
    let original = prompt("Old", "old body");
    db.lock().unwrap().prompts = vec![original.clone()];
    sync.refresh().await.unwrap();

    let mut form = PromptForm::new();
    form.load(&original);
    form.title = "New".into();

    let saved = sync.submit(&mut form).await.unwrap();

    assert_eq!(saved.id, original.id);
    let titles: Vec<_> = db
        .lock()
        .unwrap()
        .prompts
        .iter()
        .map(|p| p.title.clone())
        .collect();
    assert_eq!(titles, ["New"]);
    assert_eq!(sync.board().len(), 1);
}

#[tokio::test]
async fn create_form_creates_while_dialog_is_open() {
    let (mut sync, db) = setup().await;
    let original = prompt("Old", "old body");
    db.lock().unwrap().prompts = vec![original.clone()];
    sync.refresh().await.unwrap();
    assert!(sync.board_mut().begin_edit(original.id).is_some());

    let mut form = PromptForm::new();
    form.title = "Brand new".into();
    form.content = "fresh".into();

    let saved = sync.submit(&mut form).await.unwrap();

    assert_ne!(saved.id, original.id);
    let titles: Vec<_> = db
        .lock()
        .unwrap()
        .prompts
        .iter()
        .map(|p| p.title.clone())
        .collect();
    assert_eq!(titles, ["Old", "Brand new"]);
    // The edit dialog stays open on the untouched prompt.
    assert_eq!(sync.board().editing(), Some(original.id));
    assert_eq!(sync.board().get(original.id).unwrap().title, "Old");
}
