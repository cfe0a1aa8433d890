pub mod cache;
pub mod config;
pub mod error;
pub mod guardrail;
pub mod hook;
pub mod ids;
pub mod io;
pub mod paths;
pub mod reindex;
pub mod render;
pub mod resolve;
pub mod roadmap;
pub mod types;
pub mod workflow;

pub use error::{Result, WardenError};
