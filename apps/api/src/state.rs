use std::sync::Arc;

use crate::config::Config;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Uploaded background images, keyed by `{uuid}_{original_name}`.
    pub backgrounds: Arc<dyn BlobStore>,
    /// Generated posters and moodboards, keyed by `quote_{uuid}.png` /
    /// `moodboard_{uuid}.png`.
    pub outputs: Arc<dyn BlobStore>,
    /// Staging area for in-flight uploads; bootstrapped but not yet written
    /// to by any operation.
    #[allow(dead_code)]
    pub uploads: Arc<dyn BlobStore>,
    pub config: Config,
}
