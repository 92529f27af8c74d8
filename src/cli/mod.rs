//! CLI module for the quillnotes application
//!
//! This module hosts the interactive terminal front end and the argument
//! surface for launching it.
mod app;
mod args;

pub use app::App;
pub use args::Cli;
