use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use client_core::{
    HttpPetClient, InteractionDispatch, NoopHost, PetSession, StaticCredential, ViewState,
    MISSING_AUTH_REASON,
};
use shared::domain::{Mood, PetAction, PetState};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Backend {
    fetch: (StatusCode, &'static str),
    interact: (StatusCode, &'static str),
    hits: Arc<AtomicUsize>,
}

async fn fetch(State(backend): State<Backend>) -> (StatusCode, &'static str) {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    backend.fetch
}

async fn interact(State(backend): State<Backend>) -> (StatusCode, &'static str) {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    backend.interact
}

async fn spawn_backend(
    fetch_reply: (StatusCode, &'static str),
    interact_reply: (StatusCode, &'static str),
) -> (String, Arc<AtomicUsize>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/pet", get(fetch))
        .route("/api/pet/interact", post(interact))
        .with_state(Backend {
            fetch: fetch_reply,
            interact: interact_reply,
            hits: hits.clone(),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), hits)
}

const REX: &str = r#"{"name":"Rex","hunger":90,"thirst":85,"happiness":95}"#;

fn session(base: &str, credential: Option<&str>) -> PetSession {
    let api = Arc::new(HttpPetClient::new(base).expect("client"));
    PetSession::new(
        api,
        &StaticCredential::new(credential.map(str::to_string)),
        Arc::new(NoopHost),
    )
}

#[tokio::test]
async fn rex_renders_in_best_tier() {
    let (base, _) = spawn_backend((StatusCode::OK, REX), (StatusCode::OK, REX)).await;
    let session = session(&base, Some("init-data"));

    let state = session.start().await.expect("start");
    let pet = state.pet().expect("ready");
    assert_eq!(pet.name(), "Rex");
    assert_eq!(pet.mood(), Mood::Joyful);
}

#[tokio::test]
async fn missing_pet_is_no_pet_state() {
    let (base, _) = spawn_backend(
        (StatusCode::NOT_FOUND, "Pet not found"),
        (StatusCode::OK, REX),
    )
    .await;
    let session = session(&base, Some("init-data"));

    let state = session.start().await.expect("start");
    assert_eq!(state, ViewState::NoPet);
    assert!(state.notification().is_none());
}

#[tokio::test]
async fn failing_feed_keeps_rex_and_surfaces_server_text() {
    let (base, _) = spawn_backend(
        (StatusCode::OK, REX),
        (StatusCode::INTERNAL_SERVER_ERROR, "db down"),
    )
    .await;
    let session = session(&base, Some("init-data"));
    session.start().await.expect("start");

    let dispatch = session.interact(PetAction::Feed).await;
    assert_eq!(dispatch, InteractionDispatch::Failed("db down".to_string()));

    let state = session.snapshot();
    assert_eq!(
        state.pet(),
        Some(&PetState::new("Rex", 90, 85, 95).expect("pet"))
    );
    assert_eq!(
        state.notification().map(|n| n.reason.as_str()),
        Some("db down")
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn absent_credential_never_touches_backend() {
    let (base, hits) = spawn_backend((StatusCode::OK, REX), (StatusCode::OK, REX)).await;
    let session = session(&base, None);

    let state = session.start().await.expect("start");
    assert_eq!(state, ViewState::Error(MISSING_AUTH_REASON.to_string()));
    let _ = session.interact(PetAction::Play).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn server_error_on_fetch_is_terminal_error() {
    let (base, _) = spawn_backend(
        (StatusCode::UNAUTHORIZED, "Invalid initData"),
        (StatusCode::OK, REX),
    )
    .await;
    let session = session(&base, Some("forged"));

    let state = session.start().await.expect("start");
    assert_eq!(state, ViewState::Error("Invalid initData".to_string()));
    assert!(state.is_terminal());
}
