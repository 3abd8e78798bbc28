pub mod config;
pub mod export;
pub mod logging;
pub mod output;
pub mod reference;
pub mod scoring;
pub mod session;
pub mod stderr_buffer;
pub mod tui;
