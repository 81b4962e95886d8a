//! Service wiring: picks the store backend and builds the token signer.

use std::sync::Arc;

use thiserror::Error;

use worksphere_auth::{JwtValidator, TokenIssuer};
use worksphere_infra::{Argon2Hasher, InMemoryWorkspaceStore, WorkspaceService, WorkspaceStore};

use crate::config::ApiConfig;
use crate::token::Hs256Tokens;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,

    #[error("database unavailable: {0}")]
    Database(String),
}

/// Everything the handlers share.
#[derive(Clone)]
pub struct AppServices {
    pub workspace: WorkspaceService,
    pub tokens: Arc<dyn TokenIssuer>,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    pub fn new(workspace: WorkspaceService, tokens: Arc<Hs256Tokens>) -> Self {
        Self {
            workspace,
            tokens: tokens.clone(),
            jwt: tokens,
        }
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StartupError> {
    let tokens = Arc::new(Hs256Tokens::new(config.jwt_secret.as_bytes(), config.token_ttl));
    let store = build_store(config).await?;
    let workspace = WorkspaceService::new(store, Arc::new(Argon2Hasher::default()));
    Ok(AppServices::new(workspace, tokens))
}

#[cfg(feature = "postgres")]
async fn build_store(config: &ApiConfig) -> Result<Arc<dyn WorkspaceStore>, StartupError> {
    use sqlx::PgPool;
    use worksphere_infra::PostgresWorkspaceStore;

    if !config.use_persistent_stores {
        tracing::info!("using in-memory store");
        return Ok(Arc::new(InMemoryWorkspaceStore::new()));
    }

    let url = config.database_url.as_deref().ok_or(StartupError::MissingDatabaseUrl)?;
    let pool = PgPool::connect(url)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let store = PostgresWorkspaceStore::new(pool);
    store
        .apply_schema()
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    tracing::info!("using postgres store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_store(config: &ApiConfig) -> Result<Arc<dyn WorkspaceStore>, StartupError> {
    if config.use_persistent_stores {
        tracing::warn!("USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory");
    }
    Ok(Arc::new(InMemoryWorkspaceStore::new()))
}
