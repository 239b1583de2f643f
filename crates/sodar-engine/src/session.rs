//! Session-scoped resolution: one browser session per attempt, torn down
//! on every exit path.

use tracing::warn;

use sodar_core::backend::Backend;
use sodar_core::config::SessionConfig;

use crate::resolver::{ResolveError, Resolver};

/// Launch the backend, run one resolution, and close the backend exactly
/// once whether resolution succeeded or not. A close failure is logged and
/// never overrides the resolution outcome. A launch failure closes nothing
/// (no session exists yet).
pub async fn resolve_with_session<B: Backend + ?Sized>(
    backend: &mut B,
    session: &SessionConfig,
    resolver: &Resolver,
    query: &str,
    app_token: &str,
) -> Result<String, ResolveError> {
    backend
        .launch(session)
        .await
        .map_err(ResolveError::Launch)?;

    let outcome = resolver.resolve(backend, query, app_token).await;

    if let Err(error) = backend.close().await {
        warn!(%error, "browser shutdown failed");
    }
    outcome
}
