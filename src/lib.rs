// Library module for lacuna
// Re-exports modules for use in integration tests and the binary

pub mod actions;
pub mod app;
pub mod config;
pub mod events;
pub mod logging;
pub mod scan;
pub mod ui;
