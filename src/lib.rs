pub mod app;
pub mod collection;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod library;
pub mod logging;
pub mod model;
pub mod player;
pub mod ui;
