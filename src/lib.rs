pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod models;
pub mod profile;
pub mod prompts;
pub mod repl;
pub mod session;
pub mod settings;
pub mod speech;
pub mod storage;
pub mod ui;
pub mod whatsapp;
