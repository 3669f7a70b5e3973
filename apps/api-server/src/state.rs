//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use quill_core::PostService;
use quill_core::ports::PostRepository;
use quill_infra::InMemoryPostRepository;

#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Which post store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub store: StoreKind,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let repo: Arc<dyn PostRepository> =
                            Arc::new(PostgresPostRepository::new(conn.main.clone()));
                        tracing::info!("Application state initialized (postgres store)");
                        return Self {
                            posts: PostService::new(repo).with_timeout(config.store_timeout),
                            store: StoreKind::Postgres,
                            db: Some(conn),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        Self::in_memory(config.store_timeout)
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(store_timeout: Duration) -> Self {
        let repo: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        Self {
            posts: PostService::new(repo).with_timeout(store_timeout),
            store: StoreKind::Memory,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
