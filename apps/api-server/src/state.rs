//! Application state - shared across all handlers.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use blogicum_core::pagination::Paginator;
use blogicum_core::ports::TokenService;
use blogicum_core::services::{AccountService, BlogRepositories, BlogService, CatalogueService};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "rate-limit")]
use blogicum_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use blogicum_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub accounts: AccountService,
    pub catalogue: CatalogueService,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Arc<dyn RateLimiter>,
}

fn in_memory_repositories(store: &InMemoryStore) -> BlogRepositories {
    BlogRepositories {
        users: Arc::new(store.users()),
        posts: Arc::new(store.posts()),
        comments: Arc::new(store.comments()),
        categories: Arc::new(store.categories()),
        locations: Arc::new(store.locations()),
    }
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> BlogRepositories {
    use blogicum_infra::database::{
        self, DatabaseConfig, PostgresCategoryRepository, PostgresCommentRepository,
        PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository,
    };

    let Some(settings) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories(&InMemoryStore::new());
    };

    let db_config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    };

    match database::connect(&db_config).await {
        Ok(conn) => BlogRepositories {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
            locations: Arc::new(PostgresLocationRepository::new(conn)),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            in_memory_repositories(&InMemoryStore::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> BlogRepositories {
    tracing::info!("Running without postgres feature - using in-memory store");
    in_memory_repositories(&InMemoryStore::new())
}

impl AppState {
    /// Build the state on PostgreSQL when configured and reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = repositories(config).await;
        let state = Self::assemble(config, repos, Arc::new(DefaultClock));
        tracing::info!("Application state initialized");
        state
    }

    /// State over an existing in-memory store.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig, store: &InMemoryStore, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(config, in_memory_repositories(store), clock)
    }

    fn assemble(config: &AppConfig, repos: BlogRepositories, clock: Arc<dyn Clock>) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let accounts = AccountService::new(
            repos.users.clone(),
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
            clock.clone(),
        )
        .with_staff(config.staff_usernames.clone());
        let catalogue = CatalogueService::new(
            repos.categories.clone(),
            repos.locations.clone(),
            clock.clone(),
        );
        let blog = BlogService::new(repos, Paginator::new(config.posts_per_page), clock);

        Self {
            blog,
            accounts,
            catalogue,
            tokens,
            #[cfg(feature = "rate-limit")]
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        }
    }
}
