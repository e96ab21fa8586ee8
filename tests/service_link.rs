mod common;

use std::collections::HashSet;
use std::sync::Arc;

use tinylink::application::services::LinkService;
use tinylink::domain::repositories::LinkRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::InMemoryLinkRepository;
use tinylink::utils::code_generator::is_valid_code;

fn service() -> (Arc<LinkService>, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(repo.clone(), common::BASE_URL));
    (service, repo)
}

#[tokio::test]
async fn test_generated_codes_are_valid_and_unique() {
    let (service, repo) = service();
    let mut codes = HashSet::new();

    for i in 0..200 {
        let link = service
            .create_link(&format!("https://example.com/{i}"), None)
            .await
            .unwrap();

        assert!(is_valid_code(&link.code));
        assert!(codes.insert(link.code));
    }

    assert_eq!(repo.len(), 200);
}

#[tokio::test]
async fn test_find_after_create_has_fresh_stats() {
    let (service, repo) = service();

    let created = service
        .create_link("https://example.com", Some("fresh12".to_string()))
        .await
        .unwrap();

    let found = repo.find_by_code("fresh12").await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.click_count, 0);
    assert!(found.last_clicked_at.is_none());
}

#[tokio::test]
async fn test_visits_are_monotonic() {
    let (service, _repo) = service();
    service
        .create_link("https://example.com", Some("mono123".to_string()))
        .await
        .unwrap();

    let before = service.get_link("mono123").await.unwrap().click_count;

    for _ in 0..7 {
        let target = service.resolve_and_record_visit("mono123").await.unwrap();
        assert_eq!(target, "https://example.com/");
    }

    let after = service.get_link("mono123").await.unwrap();
    assert_eq!(after.click_count, before + 7);
    assert!(after.last_clicked_at.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_single_winner() {
    let (service, repo) = service();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_link(&format!("https://example.com/{i}"), Some("race123".to_string()))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                assert_eq!(link.code, "race123");
                successes += 1;
            }
            Err(AppError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(repo.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_visits_all_counted() {
    let (service, _repo) = service();
    service
        .create_link("https://example.com", Some("busy123".to_string()))
        .await
        .unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.resolve_and_record_visit("busy123").await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(service.get_link("busy123").await.unwrap().click_count, 50);
}

#[tokio::test]
async fn test_delete_then_lookup() {
    let (service, repo) = service();
    service
        .create_link("https://example.com", Some("gone123".to_string()))
        .await
        .unwrap();

    assert!(repo.delete_by_code("gone123").await.unwrap());
    assert!(repo.find_by_code("gone123").await.unwrap().is_none());
    assert!(!repo.delete_by_code("gone123").await.unwrap());

    assert!(matches!(
        service.resolve_and_record_visit("gone123").await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_link("gone123").await,
        Err(AppError::NotFound { .. })
    ));
}
