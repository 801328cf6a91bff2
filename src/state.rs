use std::sync::Arc;

use crate::access::AccessResolver;
use crate::service::DropService;
use crate::store::DropStore;

/// Shared handler state. The two external collaborators are constructed
/// once at process start and injected here; handlers reach the store
/// only through the service.
#[derive(Clone)]
pub struct AppState {
    pub drops: Arc<DropService>,
    pub store: Arc<dyn DropStore>,
}

impl AppState {
    pub fn new(access: Arc<dyn AccessResolver>, store: Arc<dyn DropStore>) -> Self {
        Self {
            drops: Arc::new(DropService::new(access, store.clone())),
            store,
        }
    }
}
