pub mod alert_config;
pub mod train;
