//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, EntityService, FeedService, PressReleaseService,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{
    PgEntityRepository, PgPressReleaseRepository, PgTokenRepository,
};

/// Services wired to their PostgreSQL repositories.
#[derive(Clone)]
pub struct AppState {
    pub entity_service: Arc<EntityService<PgEntityRepository>>,
    pub press_release_service:
        Arc<PressReleaseService<PgPressReleaseRepository, PgEntityRepository>>,
    pub feed_service: Arc<FeedService<PgPressReleaseRepository, PgEntityRepository>>,
    pub auth_service: Arc<AuthService<PgTokenRepository>>,
    pub cache: Arc<dyn CacheService>,
    pub db: Arc<PgPool>,
}
