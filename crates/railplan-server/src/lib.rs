pub mod api;
pub mod app;
pub mod config;
pub mod export;
pub mod logging;
pub mod seed;
pub mod state;
