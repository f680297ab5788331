pub mod analytics;
pub mod auth;
pub mod config;
pub mod database;
pub mod layout;
pub mod metering;
pub mod pdf;
pub mod types;
pub mod utils;
pub mod web;

pub use config::ConfigManager;
pub use web::start_web_server;
