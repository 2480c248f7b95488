//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod sessions;
pub mod stats;

use crate::{
    config::{AuthConfig, CatalogConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    pub sessions: sessions::SessionService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        catalog_config: CatalogConfig,
        session_service: sessions::SessionService,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone(), catalog_config.clone()),
            loans: loans::LoansService::new(repository.clone(), catalog_config),
            stats: stats::StatsService::new(repository),
            sessions: session_service,
        }
    }
}
