#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use tinylink::application::services::LinkService;
use tinylink::domain::entities::NewLink;
use tinylink::domain::repositories::LinkRepository;
use tinylink::infrastructure::persistence::InMemoryLinkRepository;
use tinylink::routes::app_router;
use tinylink::state::AppState;
use tinylink::utils::code_generator::{ALPHABET, generate_code_with};

pub const BASE_URL: &str = "https://s.example.com";

/// Builds application state over a fresh in-memory store.
pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let link_service = Arc::new(LinkService::new(repo.clone(), BASE_URL));

    (AppState::new(link_service), repo)
}

/// Builds a test server over the full application router.
pub fn create_test_server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let (state, repo) = create_test_state();
    let app = app_router(state, &[]);

    (TestServer::new(app).unwrap(), repo)
}

/// Inserts a link directly into the store, bypassing the service.
pub async fn seed_link(repo: &InMemoryLinkRepository, code: &str, url: &str) {
    repo.create(NewLink {
        code: code.to_string(),
        target_url: url.to_string(),
    })
    .await
    .unwrap();
}

/// Connects to `DATABASE_URL` and applies migrations.
///
/// Returns `None` when the variable is unset, letting PostgreSQL tests pass
/// as no-ops on machines without a database.
pub async fn pg_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };

    let pool = PgPool::connect(&url)
        .await
        .expect("DATABASE_URL is set but the database is unreachable");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations should apply");

    Some(pool)
}

/// Random 8-character code, so tests sharing one database never collide
/// with each other or with 6-character generated codes.
pub fn unique_code() -> String {
    generate_code_with(&mut rand::rng(), ALPHABET, 8)
}

pub async fn delete_pg_links(pool: &PgPool, codes: &[&str]) {
    sqlx::query("DELETE FROM links WHERE code = ANY($1)")
        .bind(codes)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_pg_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, target_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}
