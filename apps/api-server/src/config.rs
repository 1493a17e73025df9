//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blogicum_core::pagination::POSTS_PER_PAGE;
use blogicum_infra::JwtConfig;

#[cfg(feature = "rate-limit")]
use blogicum_infra::RateLimitConfig;

/// Connection settings for PostgreSQL.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseSettings>,
    pub posts_per_page: u64,
    pub jwt: JwtConfig,
    /// Accounts that receive the staff role on registration or login.
    pub staff_usernames: Vec<String>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list, blanks dropped.
fn username_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            posts_per_page: parsed("POSTS_PER_PAGE", POSTS_PER_PAGE).max(1),
            jwt: JwtConfig::from_env(),
            staff_usernames: env::var("STAFF_USERNAMES")
                .map(|raw| username_list(&raw))
                .unwrap_or_default(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_usernames_are_trimmed() {
        assert_eq!(username_list(" anna, boris ,,"), vec!["anna", "boris"]);
        assert!(username_list("").is_empty());
    }
}
