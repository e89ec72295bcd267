use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use railplan_notify::NotificationChannel;
use railplan_storage::RailStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RailStore>,
    /// `None` when the SMTP transport could not be configured at startup
    pub mailer: Option<Arc<dyn NotificationChannel>>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn locale(&self) -> &str {
        &self.config.locale
    }
}
