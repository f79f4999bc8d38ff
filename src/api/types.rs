use std::sync::Arc;

use crate::service::RecordService;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<RecordService>,
}

impl ApiContext {
    pub fn new(service: Arc<RecordService>) -> Self {
        Self { service }
    }
}
