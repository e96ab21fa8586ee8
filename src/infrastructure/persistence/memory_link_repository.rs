//! In-process link repository.
//!
//! Honours the same contract as the PostgreSQL store: inserts are checked
//! against existing codes under one lock, so concurrent creators of the same
//! code see exactly one success. Used by integration tests and local
//! experiments that should not need a database.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    links: HashMap<String, (u64, Link)>,
    next_seq: u64,
}

/// A [`LinkRepository`] backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.links.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("Link store lock poisoned", json!({})))
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.lock()?;

        if inner.links.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Code already exists",
                json!({ "code": new_link.code }),
            ));
        }

        let link = Link::new(new_link.code, new_link.target_url, 0, None, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .links
            .insert(link.code.clone(), (seq, link.clone()));

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.lock()?.links.get(code).map(|(_, link)| link.clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.links.contains_key(code))
    }

    async fn record_visit(&self, code: &str) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        match inner.links.get_mut(code) {
            Some((_, link)) => {
                link.click_count += 1;
                link.last_clicked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.links.remove(code).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let inner = self.lock()?;
        let mut entries: Vec<_> = inner.links.values().cloned().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(entries.into_iter().map(|(_, link)| link).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}
