//! Page-visit tracking service

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    error::AppResult,
    models::{
        optional_text,
        page_visit::{NewPageVisit, PageVisit, VisitRequest},
        required_text,
        session::Session,
    },
    repository::Repository,
};

const ANONYMOUS_PREFIX: &str = "anon_";
const ANONYMOUS_ID_LEN: usize = 26;

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
}

impl VisitsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a page view and return the stored visit
    pub async fn record(&self, request: VisitRequest, session: Option<&Session>) -> AppResult<PageVisit> {
        let path = required_text("path", &request.path)?;
        let visitor_id = resolve_visitor_id(session, request.visitor_id.as_deref());

        let data = NewPageVisit {
            path,
            visited_at: Utc::now(),
            visitor_id,
            visitor_email: session.map(|s| s.email.clone()),
            is_admin: session.map(|s| s.is_admin).unwrap_or(false),
        };
        let visit = self.repository.page_visits.create(&data).await?;
        tracing::debug!("Visit to {} by {}", visit.path, visit.visitor_id);
        Ok(visit)
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.repository.page_visits.count().await
    }
}

/// Session id when logged in, else the client's anonymous id, else a fresh one
pub fn resolve_visitor_id(session: Option<&Session>, supplied: Option<&str>) -> String {
    if let Some(session) = session {
        return session.sub.clone();
    }
    optional_text(supplied).unwrap_or_else(new_anonymous_id)
}

pub fn new_anonymous_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ANONYMOUS_ID_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", ANONYMOUS_PREFIX, suffix)
}
