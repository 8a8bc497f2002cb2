use crate::analysis::roles::RoleCatalog;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: every analysis is independent.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Roles a resume can be scored against. Default: the built-in catalog.
    pub catalog: RoleCatalog,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: RoleCatalog::builtin(),
        }
    }
}
