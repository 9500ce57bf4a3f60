use crate::client::DashboardApi;
use crate::config::DashboardConfig;
use crate::controller::Dashboard;
use std::sync::Arc;

/// Request bodies on the upload route may carry a few dropped files even
/// though only the first is forwarded.
const DROP_BODY_FACTOR: usize = 4;
const BODY_SLACK: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub upload_body_limit: usize,
}

impl AppState {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        Self {
            dashboard: Arc::new(Dashboard::new(api, config)),
            upload_body_limit: config
                .max_upload_bytes
                .saturating_mul(DROP_BODY_FACTOR)
                .saturating_add(BODY_SLACK),
        }
    }
}
