//! wbscope command line: catalog search, sales enrichment, and exports.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::RunContext;
pub use config::{CookieLookup, CookieOrigin};
pub use output::Format;
