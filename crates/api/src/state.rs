use std::sync::Arc;

use rocketlab_db::DbPool;

use crate::config::ServerConfig;

/// Handler state. Cloned into every request, so its contents are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}
