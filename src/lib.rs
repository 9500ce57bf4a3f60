pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod html;
pub mod models;
pub mod plot;
pub mod preview;
pub mod session;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use client::{DashboardApi, HttpBackend};
pub use config::DashboardConfig;
pub use controller::Dashboard;
pub use state::AppState;
