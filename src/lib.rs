//! Biblioteca school library server
//!
//! REST JSON API behind a school library front desk: book inventory, loans
//! and returns, usage events, equipment inventory, reservations, visit
//! tracking, reports and a public-domain book search.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the services for `config` on top of an existing document store
    pub fn new(config: AppConfig, store: Arc<dyn store::DocumentStore>) -> AppResult<Self> {
        let repository = repository::Repository::new(store);
        let services = services::Services::new(
            repository,
            config.auth.clone(),
            config.search.clone(),
        )?;
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
