pub mod api;
pub mod app;
pub mod config;
pub mod events;
pub mod logging;
pub mod report;
pub mod state;
pub mod time;
