// Core library plus the terminal front-end. main.rs only wires up the
// terminal, logging and CLI around `app::App`.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod session;
pub mod store;
pub mod ui;
