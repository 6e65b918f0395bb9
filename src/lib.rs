pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod parser;
pub mod prompt;
pub mod toolchain;
pub mod version;
