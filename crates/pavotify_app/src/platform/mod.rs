mod app;
mod config;
mod effects;
mod folder;
pub(crate) mod logging;
mod ui;

pub use app::run_app;
