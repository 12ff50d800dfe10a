//! Library usage events service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::usage_event::{UsageEvent, UsageEventInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsageService {
    repository: Repository,
}

impl UsageService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<UsageEvent>> {
        self.repository.usage_events.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<UsageEvent> {
        self.repository.usage_events.get(id).await
    }

    pub async fn create(&self, input: UsageEventInput) -> AppResult<UsageEvent> {
        let data = input.into_data(Utc::now())?;
        self.repository.usage_events.create(&data).await
    }

    /// Replace the event's fields; `recorded_at` is refreshed as well
    pub async fn update(&self, id: &str, input: UsageEventInput) -> AppResult<UsageEvent> {
        let expected_version = input.expected_version;
        let data = input.into_data(Utc::now())?;
        self.repository
            .usage_events
            .update(id, &data, expected_version)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.usage_events.delete(id).await
    }
}
