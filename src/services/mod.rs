//! Business logic services

pub mod auth;
pub mod books;
pub mod gutenberg;
pub mod inventory;
pub mod loans;
pub mod reports;
pub mod reservations;
pub mod usage;
pub mod visits;

use crate::{
    config::{AuthConfig, SearchConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub loans: loans::LoansService,
    pub usage: usage::UsageService,
    pub inventory: inventory::InventoryService,
    pub reservations: reservations::ReservationsService,
    pub visits: visits::VisitsService,
    pub reports: reports::ReportsService,
    pub gutenberg: gutenberg::GutendexClient,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        search_config: SearchConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(auth_config),
            books: books::BooksService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            usage: usage::UsageService::new(repository.clone()),
            inventory: inventory::InventoryService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            visits: visits::VisitsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone()),
            gutenberg: gutenberg::GutendexClient::new(search_config)?,
            repository,
        })
    }
}
