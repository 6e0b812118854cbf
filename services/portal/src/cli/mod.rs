//! services/portal/src/cli/mod.rs
//!
//! The console front-end: command parsing, text rendering and the
//! interactive shell that drives the portal.

pub mod command;
pub mod console;
pub mod render;
pub mod shell;

pub use command::Command;
pub use console::Console;
pub use shell::Shell;
