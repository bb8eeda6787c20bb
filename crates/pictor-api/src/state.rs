//! Application state shared across HTTP handlers.

use std::sync::Arc;

use pictor_catalog::Catalog;
use pictor_core::Config;
use pictor_storage::ObjectStorage;

use crate::auth::verifier::IdentityVerifier;

/// Everything a handler needs, behind one `Arc` in the router state.
///
/// The catalog owns its own worker pool and connection pool; the storage
/// backend is stateless apart from its client. Both are cheap to clone
/// through the `Arc`.
pub struct AppState {
    pub catalog: Catalog,
    pub storage: Arc<dyn ObjectStorage>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub config: Config,
}
