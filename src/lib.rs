// Library surface shared by the `shastep` binary and the integration tests.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod render;
pub mod shell;
