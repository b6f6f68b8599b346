pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod prompt;
pub mod query;
pub mod stats;
pub mod trip;
