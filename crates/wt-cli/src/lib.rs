//! Workspace time tracker CLI library.
//!
//! This crate is the presentation adapter around the core engine: it
//! forwards user intents as engine method calls and renders engine
//! outputs. No domain rules live here.

pub mod app;
mod cli;
pub mod commands;
mod config;
pub mod state;

pub use cli::{Cli, Commands, Period, WorkspacesAction};
pub use config::Config;
